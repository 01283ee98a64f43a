use std::fmt::Write;

use crate::song::Song;

/// Renders `songs` as an extended M3U playlist.
///
/// Durations are not known, so every entry is written as `-1`.
pub fn generate_m3u8<'a>(songs: impl IntoIterator<Item = &'a Song>) -> String {
	let mut m3u8 = String::from("#EXTM3U\r\n");
	for song in songs {
		write!(
			&mut m3u8,
			"#EXTINF:-1,{} - {}\r\n{}\r\n",
			song.artist, song.title, song.url,
		)
		.expect("Error writing to string!");
	}

	m3u8
}
