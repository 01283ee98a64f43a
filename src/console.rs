use std::{fmt::Write as _, io, path::PathBuf, str::FromStr, time::Duration};

use tokio::{
	io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt},
	time::MissedTickBehavior,
};

use crate::{
	player::{format_time, Placement, Session},
	playlist::{m3u, PlaylistError},
};

const TICK: Duration = Duration::from_secs(1);

const HELP: &str = "\
now                          show the current song
queue                        list the playlist
library                      list the library
play | pause | toggle        control playback
next | prev                  skip forwards or backwards
add <entry> [start|end|at <n>]
                             add a library entry to the playlist
remove <index>               remove a playlist entry
find <entry>                 playlist position of a library entry
save <path>                  write the playlist as M3U
quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
	Now,
	Queue,
	Library,
	Play,
	Pause,
	Toggle,
	Next,
	Prev,
	Add { entry: usize, placement: Placement },
	Remove(usize),
	Find(usize),
	Save(PathBuf),
	Help,
	Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
	#[error("empty command")]
	Empty,
	#[error("unknown command `{0}`, try `help`")]
	Unknown(String),
	#[error("`{0}` expects {1}")]
	Missing(&'static str, &'static str),
	#[error("`{0}` is not a valid index")]
	Index(String),
	#[error("unexpected `{0}`")]
	Unexpected(String),
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Parse(#[from] ParseError),
	#[error(transparent)]
	Playlist(#[from] PlaylistError),
	#[error("library has no entry {0}")]
	NoEntry(usize),
	#[error("IO error: {0}")]
	Io(#[from] io::Error),
}

fn index(word: Option<&str>, cmd: &'static str) -> Result<usize, ParseError> {
	let word = word.ok_or(ParseError::Missing(cmd, "an index"))?;
	word.parse().map_err(|_| ParseError::Index(word.to_owned()))
}

fn end(mut words: std::str::SplitWhitespace<'_>) -> Result<(), ParseError> {
	match words.next() {
		Some(word) => Err(ParseError::Unexpected(word.to_owned())),
		None => Ok(()),
	}
}

impl FromStr for Command {
	type Err = ParseError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let s = s.trim();
		let mut words = s.split_whitespace();
		let name = words.next().ok_or(ParseError::Empty)?;

		let cmd = match name {
			"now" => Self::Now,
			"queue" => Self::Queue,
			"library" => Self::Library,
			"play" => Self::Play,
			"pause" => Self::Pause,
			"toggle" => Self::Toggle,
			"next" => Self::Next,
			"prev" => Self::Prev,
			"help" => Self::Help,
			"quit" | "exit" => Self::Quit,
			"remove" => Self::Remove(index(words.next(), "remove")?),
			"find" => Self::Find(index(words.next(), "find")?),
			"add" => {
				let entry = index(words.next(), "add")?;
				let placement = match words.next() {
					None | Some("end") => Placement::End,
					Some("start") => Placement::Start,
					Some("at") => Placement::At(index(words.next(), "at")?),
					Some(word) => return Err(ParseError::Unexpected(word.to_owned())),
				};
				Self::Add { entry, placement }
			}
			"save" => {
				// the rest of the line, so paths may contain spaces
				let path = s[name.len()..].trim();
				if path.is_empty() {
					return Err(ParseError::Missing("save", "a path"));
				}
				return Ok(Self::Save(path.into()));
			}
			other => return Err(ParseError::Unknown(other.to_owned())),
		};

		end(words)?;
		Ok(cmd)
	}
}

fn now(session: &Session) -> String {
	match session.current() {
		Some(song) => format!(
			"[{}] {} {}",
			if session.is_playing() { "playing" } else { "paused" },
			song,
			format_time(session.elapsed().as_secs_f64()),
		),
		None => "Nothing playing".to_owned(),
	}
}

fn queue(session: &Session) -> String {
	let playlist = session.playlist();
	if playlist.is_empty() {
		return "Playlist is empty".to_owned();
	}

	let current = playlist.position();
	let mut writer = String::new();
	for (i, song) in playlist.iter().enumerate() {
		let marker = if Some(i) == current { '>' } else { ' ' };
		writeln!(&mut writer, "{marker} {i}: {song}").expect("Error writing to buffer");
	}
	writer.pop();

	writer
}

fn library(session: &Session) -> String {
	if session.library().is_empty() {
		return "Library is empty".to_owned();
	}

	let mut writer = String::new();
	for (i, song) in session.library().iter().enumerate() {
		writeln!(&mut writer, "{i}: {song}").expect("Error writing to buffer");
	}
	writer.pop();

	writer
}

/// Runs `cmd` against `session` and describes the outcome.
pub async fn execute(session: &mut Session, cmd: Command) -> Result<String, Error> {
	Ok(match cmd {
		Command::Now => now(session),
		Command::Queue => queue(session),
		Command::Library => library(session),
		Command::Play => {
			if session.play() {
				now(session)
			} else {
				"Nothing to play".to_owned()
			}
		}
		Command::Pause => {
			session.pause();
			now(session)
		}
		Command::Toggle => {
			if session.toggle() || session.current().is_some() {
				now(session)
			} else {
				"Nothing to play".to_owned()
			}
		}
		Command::Next => match session.next() {
			Some(_) => now(session),
			None => "End of playlist".to_owned(),
		},
		Command::Prev => match session.prev() {
			Some(_) => now(session),
			None => "Start of playlist".to_owned(),
		},
		Command::Add { entry, placement } => {
			let song = session
				.library()
				.get(entry)
				.cloned()
				.ok_or(Error::NoEntry(entry))?;

			let reply = format!("Added {song}");
			let position = session.add_song(song, placement)?;
			format!("{reply} at {position}")
		}
		Command::Remove(index) => {
			let song = session.remove(index)?;
			format!("Removed {song}")
		}
		Command::Find(entry) => {
			let song = session.library().get(entry).ok_or(Error::NoEntry(entry))?;
			match session.find(song) {
				Some(position) => format!("{song} is at {position}"),
				None => format!("{song} is not in the playlist"),
			}
		}
		Command::Save(path) => {
			let playlist = session.playlist();
			tokio::fs::write(&path, m3u::generate_m3u8(playlist)).await?;
			log::info!("Saved playlist to {}", path.display());
			format!("Saved {} songs to {}", playlist.len(), path.display())
		}
		Command::Help => HELP.to_owned(),
		Command::Quit => String::new(),
	})
}

/// Reads commands from `input` line by line and writes replies to
/// `output` until EOF or `quit`. Elapsed time advances once per second
/// while playing.
pub async fn run_loop<R, W>(session: &mut Session, input: R, mut output: W) -> io::Result<()>
where
	R: AsyncBufRead + Unpin,
	W: AsyncWrite + Unpin,
{
	let mut lines = input.lines();
	let mut ticker = tokio::time::interval(TICK);
	ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

	loop {
		tokio::select! {
			line = lines.next_line() => {
				let Some(line) = line? else { break };
				if line.trim().is_empty() {
					continue;
				}

				let reply = match line.parse::<Command>() {
					Ok(Command::Quit) => break,
					Ok(cmd) => match execute(session, cmd).await {
						Ok(reply) => reply,
						Err(e) => format!("error: {e}"),
					},
					Err(e) => format!("error: {e}"),
				};

				output.write_all(reply.as_bytes()).await?;
				output.write_all(b"\n").await?;
				output.flush().await?;
			}
			_ = ticker.tick() => session.tick(TICK),
		}
	}

	log::debug!("Console closed");
	Ok(())
}
