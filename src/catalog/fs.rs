use std::{io, path::Path};

use crate::song::Song;

const AUDIO_EXTENSIONS: &[&str] = &["mp3", "flac", "ogg", "wav", "m4a"];
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Artist given to files at the top of the music directory.
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// Collects the songs in `dir`.
///
/// Files at the top level and one directory down are considered; a
/// subdirectory's name is the artist of the files inside it. Song and
/// cover URLs are built from `base_url` plus the path relative to `dir`.
pub async fn scan(dir: impl AsRef<Path>, base_url: &str) -> io::Result<Vec<Song>> {
	let dir = dir.as_ref();
	if !dir.is_dir() {
		return Err(io::Error::new(
			io::ErrorKind::InvalidInput,
			"Not valid directory",
		));
	}

	let mut songs = Vec::new();
	collect(dir, dir, UNKNOWN_ARTIST, base_url, &mut songs)?;

	for entry in dir.read_dir()? {
		let entry = entry?;
		if !entry.file_type()?.is_dir() {
			continue;
		}
		let artist = entry.file_name().to_string_lossy().into_owned();
		// hidden directories such as .git or .thumbnails
		if artist.starts_with('.') {
			continue;
		}

		collect(dir, &entry.path(), &artist, base_url, &mut songs)?;
	}

	songs.sort_by(|a, b| (&a.artist, &a.title).cmp(&(&b.artist, &b.title)));
	log::debug!("Found {} songs in {}", songs.len(), dir.display());

	Ok(songs)
}

fn collect(
	root: &Path,
	dir: &Path,
	artist: &str,
	base_url: &str,
	songs: &mut Vec<Song>,
) -> io::Result<()> {
	let mut files = Vec::new();
	for entry in dir.read_dir()? {
		let entry = entry?;
		if entry.file_type()?.is_file() {
			files.push(entry.path());
		}
	}
	files.sort();

	let cover = files.iter().find(|path| {
		path.file_stem() == Some("cover".as_ref()) && has_extension(path, IMAGE_EXTENSIONS)
	});

	for path in files.iter().filter(|path| has_extension(path, AUDIO_EXTENSIONS)) {
		let title = path
			.file_stem()
			.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Invalid file name"))?
			.to_string_lossy()
			.into_owned();

		let image = files
			.iter()
			.find(|other| {
				other.file_stem() == path.file_stem() && has_extension(other, IMAGE_EXTENSIONS)
			})
			.or(cover)
			.map(|image| url_for(root, image, base_url));

		songs.push(Song::new(title, artist, url_for(root, path, base_url), image));
	}

	Ok(())
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
	path.extension()
		.and_then(|ext| ext.to_str())
		.map_or(false, |ext| {
			extensions.iter().any(|x| x.eq_ignore_ascii_case(ext))
		})
}

fn url_for(root: &Path, path: &Path, base_url: &str) -> String {
	let relative = path.strip_prefix(root).unwrap_or(path);

	let mut url = base_url.trim_end_matches('/').to_owned();
	for component in relative.components() {
		url.push('/');
		url.push_str(&urlencoding::encode(&component.as_os_str().to_string_lossy()));
	}

	url
}
