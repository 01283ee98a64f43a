use std::path::PathBuf;

use catalog::Source;
use clap::Parser;
use player::Session;
use playlist::Playlist;
use tokio::io::BufReader;

mod catalog;
mod console;
mod player;
mod playlist;
mod song;

#[derive(Parser, Debug)]
#[command(name = "playhead")]
#[command(about = "Console music player with a linked playlist", long_about = None)]
struct Args {
	/// Music directory the initial playlist is built from
	#[arg(short = 'm', long, default_value = "./music")]
	music_dir: PathBuf,

	/// URL the music directory is served under
	#[arg(short = 'b', long, default_value = "http://localhost:3000/music")]
	base_url: String,

	/// Library source: a music directory, a .json file or an http(s) URL
	/// (can be specified multiple times; defaults to the music directory)
	#[arg(short = 'c', long = "catalog")]
	catalogs: Vec<Source>,

	/// Verbose logging
	#[arg(short = 'v', long)]
	verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
	let args = Args::parse();

	let log_level = if args.verbose { "debug" } else { "info" };
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

	let seed = match catalog::fs::scan(&args.music_dir, &args.base_url).await {
		Ok(songs) => songs,
		Err(e) => {
			log::warn!(
				"Could not read music directory {}: {}",
				args.music_dir.display(),
				e
			);
			Vec::new()
		}
	};

	let library = if args.catalogs.is_empty() {
		seed.clone()
	} else {
		catalog::load_all(&args.catalogs, &args.base_url).await
	};

	log::info!(
		"Playlist has {} songs, library has {}",
		seed.len(),
		library.len()
	);

	let mut session = Session::new(seed.into_iter().collect::<Playlist>());
	session.set_library(library);

	if let Some(song) = session.current() {
		log::info!("Now selected: {}", song);
	}

	console::run_loop(
		&mut session,
		BufReader::new(tokio::io::stdin()),
		tokio::io::stdout(),
	)
	.await?;

	Ok(())
}
