use hyper::{body, header, Body, Client, Uri};
use hyper_tls::HttpsConnector;

use crate::song::Song;

use super::Error;

/// Fetches a JSON array of songs from `uri`.
pub async fn fetch(uri: Uri) -> Result<Vec<Song>, Error> {
	let client = Client::builder().build::<_, Body>(HttpsConnector::new());

	log::debug!("GET {}", uri);
	let res = client.get(uri).await?;

	if !res.status().is_success() {
		return Err(Error::Status(res.status()));
	}

	let content_type = res
		.headers()
		.get(header::CONTENT_TYPE)
		.and_then(|value| value.to_str().ok());

	if !content_type.map_or(false, |ct| ct.contains("application/json")) {
		return Err(Error::ContentType(content_type.map(str::to_owned)));
	}

	let bytes = body::to_bytes(res.into_body()).await?;
	Ok(serde_json::from_slice(&bytes)?)
}

#[cfg(test)]
mod tests {
	use std::{convert::Infallible, net::SocketAddr};

	use hyper::{
		server::conn::AddrStream,
		service::{make_service_fn, service_fn},
		Request, Response, Server, StatusCode,
	};

	use super::*;

	async fn route(req: Request<Body>) -> hyper::http::Result<Response<Body>> {
		match req.uri().path() {
			"/api/music" => Response::builder()
				.header(header::CONTENT_TYPE, "application/json; charset=utf-8")
				.body(Body::from(
					r#"[
						{"title": "Money Trees", "artist": "Kendrick Lamar", "url": "/music/song11.mp3", "image": "/music/cover11.jpg"},
						{"title": "I Wonder", "artist": "YE", "url": "/music/song12.mp3"}
					]"#,
				)),
			"/" => Response::builder()
				.header(header::CONTENT_TYPE, "text/plain")
				.body(Body::from("Backend is running.")),
			_ => Response::builder()
				.status(StatusCode::NOT_FOUND)
				.header(header::CONTENT_TYPE, "text/plain")
				.body(Body::from("Invalid path")),
		}
	}

	/// Serves `route` on an ephemeral port and returns its address.
	fn serve() -> SocketAddr {
		let make_service = make_service_fn(|_: &AddrStream| async {
			Ok::<_, Infallible>(service_fn(route))
		});

		let server = Server::bind(&SocketAddr::from(([127, 0, 0, 1], 0))).serve(make_service);
		let addr = server.local_addr();

		tokio::spawn(async move {
			if let Err(e) = server.await {
				log::error!("Error running test server: {:?}", e);
			}
		});

		addr
	}

	fn uri(addr: SocketAddr, path: &str) -> Uri {
		format!("http://{addr}{path}").parse().unwrap()
	}

	#[tokio::test]
	async fn fetches_songs() {
		let addr = serve();

		let songs = fetch(uri(addr, "/api/music")).await.unwrap();

		assert_eq!(
			songs,
			[
				Song::new(
					"Money Trees",
					"Kendrick Lamar",
					"/music/song11.mp3",
					Some("/music/cover11.jpg".into())
				),
				Song::new("I Wonder", "YE", "/music/song12.mp3", None),
			]
		);
	}

	#[tokio::test]
	async fn rejects_error_status() {
		let addr = serve();

		let err = fetch(uri(addr, "/api/nothing")).await.unwrap_err();
		assert!(matches!(err, Error::Status(StatusCode::NOT_FOUND)));
	}

	#[tokio::test]
	async fn rejects_non_json() {
		let addr = serve();

		let err = fetch(uri(addr, "/")).await.unwrap_err();
		assert!(matches!(err, Error::ContentType(Some(ct)) if ct == "text/plain"));
	}
}
