use std::{convert::Infallible, io, path::PathBuf, str::FromStr};

use hyper::{StatusCode, Uri};

use crate::song::Song;

pub mod fs;
pub mod http;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("IO error: {0}")]
	Io(#[from] io::Error),
	#[error("HTTP error: {0}")]
	Http(#[from] hyper::Error),
	#[error("invalid URI: {0}")]
	Uri(#[from] hyper::http::uri::InvalidUri),
	#[error("HTTP error! status: {0}")]
	Status(StatusCode),
	#[error("expected JSON response, got {0:?}")]
	ContentType(Option<String>),
	#[error("invalid song catalog: {0}")]
	Json(#[from] serde_json::Error),
}

/// Where library songs come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
	/// A music directory, scanned with [`fs::scan`].
	Dir(PathBuf),
	/// A JSON array of songs on disk.
	File(PathBuf),
	/// A JSON array of songs served over HTTP(S).
	Url(String),
}

impl FromStr for Source {
	type Err = Infallible;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(if s.starts_with("http://") || s.starts_with("https://") {
			Self::Url(s.to_owned())
		} else if s.ends_with(".json") {
			Self::File(s.into())
		} else {
			Self::Dir(s.into())
		})
	}
}

impl Source {
	/// Loads every song from this source. `base_url` prefixes the URLs of
	/// songs found in a directory.
	pub async fn load(&self, base_url: &str) -> Result<Vec<Song>, Error> {
		match self {
			Self::Dir(dir) => Ok(fs::scan(dir, base_url).await?),
			Self::File(path) => {
				let data = tokio::fs::read(path).await?;
				Ok(serde_json::from_slice(&data)?)
			}
			Self::Url(url) => http::fetch(url.parse::<Uri>()?).await,
		}
	}
}

/// Loads all sources concurrently, in order.
///
/// A source that fails is logged and contributes nothing.
pub async fn load_all(sources: &[Source], base_url: &str) -> Vec<Song> {
	let results =
		futures::future::join_all(sources.iter().map(|source| source.load(base_url))).await;

	sources
		.iter()
		.zip(results)
		.flat_map(|(source, res)| match res {
			Ok(songs) => {
				log::debug!("Loaded {} songs from {:?}", songs.len(), source);
				songs
			}
			Err(e) => {
				log::error!("Error loading songs from {:?}: {}", source, e);
				Vec::new()
			}
		})
		.collect()
}
