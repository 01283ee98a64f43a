use std::fmt;

use serde::{Deserialize, Serialize};

/// A playable track.
///
/// Songs have no identity beyond their fields: two songs with the same
/// title, artist, url and image compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Song {
	pub title: String,
	pub artist: String,
	/// Location of the audio resource.
	pub url: String,
	/// Location of the cover art, if any.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub image: Option<String>,
}

impl Song {
	pub fn new(
		title: impl Into<String>,
		artist: impl Into<String>,
		url: impl Into<String>,
		image: Option<String>,
	) -> Self {
		Self {
			title: title.into(),
			artist: artist.into(),
			url: url.into(),
			image,
		}
	}
}

impl fmt::Display for Song {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} - {}", self.artist, self.title)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn image_is_optional_in_json() {
		let songs: Vec<Song> = serde_json::from_str(
			r#"[
				{"title": "Doomsday", "artist": "MF DOOM", "url": "/music/song1.mp3", "image": "/music/cover1.jpg"},
				{"title": "1985", "artist": "The Alchemist", "url": "/music/song9.mp3"}
			]"#,
		)
		.unwrap();

		assert_eq!(songs[0].image.as_deref(), Some("/music/cover1.jpg"));
		assert_eq!(songs[1].image, None);

		let json = serde_json::to_string(&songs[1]).unwrap();
		assert!(!json.contains("image"));
	}

	#[test]
	fn equality_is_structural() {
		let a = Song::new("Runaway", "YE", "/music/song13.mp3", None);
		let b = Song::new("Runaway", "YE", "/music/song13.mp3", None);
		let c = Song::new("Runaway", "YE", "/music/song13.mp3", Some("/c.jpg".into()));

		assert_eq!(a, b);
		assert_ne!(a, c);
		assert_eq!(a.to_string(), "YE - Runaway");
	}
}
