use std::time::Duration;

use crate::{
	playlist::{Playlist, PlaylistError},
	song::Song,
};

/// Where [`Session::add_song`] puts a new song.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Placement {
	Start,
	#[default]
	End,
	/// Clamped to the playlist length.
	At(usize),
}

/// One player: a playlist, whether it is playing, and how far into the
/// current song it is.
#[derive(Debug, Default)]
pub struct Session {
	playlist: Playlist<Song>,
	playing: bool,
	elapsed: Duration,
	library: Vec<Song>,
}

impl Session {
	pub fn new(playlist: Playlist<Song>) -> Self {
		Self {
			playlist,
			..Default::default()
		}
	}

	pub fn playlist(&self) -> &Playlist<Song> {
		&self.playlist
	}

	pub fn current(&self) -> Option<&Song> {
		self.playlist.current()
	}

	pub fn is_playing(&self) -> bool {
		self.playing
	}

	pub fn elapsed(&self) -> Duration {
		self.elapsed
	}

	pub fn library(&self) -> &[Song] {
		&self.library
	}

	pub fn set_library(&mut self, library: Vec<Song>) {
		self.library = library;
	}

	/// Adds `song` to the playlist and returns the position it landed at.
	/// If nothing was playing before, the new song starts from the
	/// beginning.
	pub fn add_song(&mut self, song: Song, placement: Placement) -> Result<usize, PlaylistError> {
		let was_empty = self.playlist.is_empty();

		log::debug!("Adding {} ({:?})", song, placement);
		let position = match placement {
			Placement::Start => {
				self.playlist.insert_at_start(song);
				0
			}
			Placement::End => {
				self.playlist.append(song);
				self.playlist.len() - 1
			}
			Placement::At(position) => {
				let position = position.min(self.playlist.len());
				self.playlist.insert_at(position, song)?;
				position
			}
		};

		if was_empty {
			self.restart();
		}

		Ok(position)
	}

	/// Removes the entry at `index`.
	///
	/// Removing the current song moves playback to the head of the
	/// playlist from 0:00; removing the last song stops playback.
	pub fn remove(&mut self, index: usize) -> Result<Song, PlaylistError> {
		let before = self.playlist.position();
		let song = self.playlist.remove_at(index)?;

		if self.playlist.is_empty() {
			self.playing = false;
			self.elapsed = Duration::ZERO;
		} else if before == Some(index) {
			self.elapsed = Duration::ZERO;
		}

		Ok(song)
	}

	/// Starts playing, if there is anything to play.
	pub fn play(&mut self) -> bool {
		self.playing = self.current().is_some();
		self.playing
	}

	pub fn pause(&mut self) {
		self.playing = false;
	}

	pub fn toggle(&mut self) -> bool {
		if self.playing {
			self.pause();
			false
		} else {
			self.play()
		}
	}

	/// Skips to the next song. At the end of the playlist nothing changes.
	pub fn next(&mut self) -> Option<&Song> {
		self.playlist.advance()?;
		self.restart();
		self.current()
	}

	/// Goes back to the previous song. At the start of the playlist
	/// nothing changes.
	pub fn prev(&mut self) -> Option<&Song> {
		self.playlist.retreat()?;
		self.restart();
		self.current()
	}

	/// Advances the elapsed time of the current song while playing.
	pub fn tick(&mut self, dt: Duration) {
		if self.playing {
			self.elapsed += dt;
		}
	}

	/// Playlist position of a library song.
	pub fn find(&self, song: &Song) -> Option<usize> {
		self.playlist.index_of(song)
	}

	fn restart(&mut self) {
		self.elapsed = Duration::ZERO;
		self.playing = true;
	}
}

/// Formats seconds as `m:ss`.
pub fn format_time(secs: f64) -> String {
	if secs.is_nan() || secs < 0. {
		return "0:00".to_owned();
	}

	let secs = secs as u64;
	format!("{}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn song(title: &str) -> Song {
		Song::new(title, "Kendrick Lamar", format!("/music/{title}.mp3"), None)
	}

	fn session(titles: &[&str]) -> Session {
		Session::new(titles.iter().copied().map(song).collect())
	}

	#[test]
	fn first_song_starts_playing() {
		let mut session = Session::default();
		assert!(!session.play());

		session.add_song(song("PRIDE"), Placement::End).unwrap();
		assert!(session.is_playing());
		assert_eq!(session.current(), Some(&song("PRIDE")));

		session.pause();
		session.add_song(song("Money Trees"), Placement::Start).unwrap();
		assert!(!session.is_playing());
		assert_eq!(session.current(), Some(&song("PRIDE")));
	}

	#[test]
	fn position_is_clamped() {
		let mut session = session(&["A", "B"]);

		assert_eq!(session.add_song(song("far"), Placement::At(99)), Ok(2));
		assert_eq!(session.add_song(song("mid"), Placement::At(1)), Ok(1));
		assert_eq!(session.add_song(song("last"), Placement::End), Ok(4));
		assert_eq!(session.add_song(song("first"), Placement::Start), Ok(0));

		assert_eq!(session.find(&song("far")), Some(4));
		assert_eq!(session.find(&song("mid")), Some(2));
		assert_eq!(session.find(&song("last")), Some(5));
		assert_eq!(session.playlist().len(), 6);
	}

	#[test]
	fn next_and_prev() {
		let mut session = session(&["A", "B"]);
		session.tick(Duration::from_secs(5));
		assert_eq!(session.elapsed(), Duration::ZERO);

		assert_eq!(session.next(), Some(&song("B")));
		assert!(session.is_playing());
		session.tick(Duration::from_secs(5));
		assert_eq!(session.elapsed(), Duration::from_secs(5));

		// boundary keeps the song and its progress
		assert_eq!(session.next(), None);
		assert_eq!(session.current(), Some(&song("B")));
		assert_eq!(session.elapsed(), Duration::from_secs(5));

		assert_eq!(session.prev(), Some(&song("A")));
		assert_eq!(session.elapsed(), Duration::ZERO);
		assert_eq!(session.prev(), None);
	}

	#[test]
	fn removing_current_restarts_from_head() {
		let mut session = session(&["A", "B", "C"]);
		session.next();
		session.next();
		session.tick(Duration::from_secs(30));

		assert_eq!(session.remove(0), Ok(song("A")));
		assert_eq!(session.elapsed(), Duration::from_secs(30));

		assert_eq!(session.remove(1), Ok(song("C")));
		assert_eq!(session.current(), Some(&song("B")));
		assert_eq!(session.elapsed(), Duration::ZERO);

		assert!(session.remove(5).is_err());

		session.remove(0).unwrap();
		assert_eq!(session.current(), None);
		assert!(!session.is_playing());
	}

	#[test]
	fn toggle() {
		let mut session = session(&["A"]);
		assert!(session.toggle());
		assert!(!session.toggle());
		assert!(!session.is_playing());
	}

	#[test]
	fn format() {
		assert_eq!(format_time(0.), "0:00");
		assert_eq!(format_time(9.7), "0:09");
		assert_eq!(format_time(61.), "1:01");
		assert_eq!(format_time(600.), "10:00");
		assert_eq!(format_time(f64::NAN), "0:00");
		assert_eq!(format_time(-3.), "0:00");
	}
}
