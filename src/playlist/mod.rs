use std::{fmt, iter::FusedIterator};

use crate::song::Song;

pub mod m3u;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PlaylistError {
	#[error("position {index} is out of bounds for a playlist of {len} songs")]
	OutOfBounds { index: usize, len: usize },
}

#[derive(Debug, Clone)]
struct Node<T> {
	value: T,
	prev: Option<usize>,
	next: Option<usize>,
}

/// Doubly linked list with a cursor pointing at the current entry.
///
/// Nodes live in an arena and link to each other by slot index, so `prev`
/// never owns anything. Slots freed by [`Playlist::remove_at`] are reused
/// by later insertions.
///
/// The cursor is `None` exactly when the list is empty. Inserting
/// elsewhere never moves it; removing the node under it moves it to the
/// head.
#[derive(Clone)]
pub struct Playlist<T = Song> {
	slots: Vec<Option<Node<T>>>,
	free: Vec<usize>,
	head: Option<usize>,
	tail: Option<usize>,
	cursor: Option<usize>,
	len: usize,
}

impl<T> Default for Playlist<T> {
	fn default() -> Self {
		Self {
			slots: Vec::new(),
			free: Vec::new(),
			head: None,
			tail: None,
			cursor: None,
			len: 0,
		}
	}
}

impl<T> Playlist<T> {
	pub fn new() -> Self {
		Self::default()
	}

	#[inline]
	pub fn len(&self) -> usize {
		self.len
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.len == 0
	}

	/// Adds `value` at the tail.
	pub fn append(&mut self, value: T) {
		let idx = self.alloc(Node {
			value,
			prev: self.tail,
			next: None,
		});

		match self.tail {
			Some(tail) => self.node_mut(tail).next = Some(idx),
			None => {
				self.head = Some(idx);
				self.cursor = Some(idx);
			}
		}

		self.tail = Some(idx);
		self.len += 1;
	}

	/// Adds `value` at index 0.
	pub fn insert_at_start(&mut self, value: T) {
		let idx = self.alloc(Node {
			value,
			prev: None,
			next: self.head,
		});

		match self.head {
			Some(head) => self.node_mut(head).prev = Some(idx),
			None => {
				self.tail = Some(idx);
				self.cursor = Some(idx);
			}
		}

		self.head = Some(idx);
		self.len += 1;
	}

	/// Inserts `value` so that it ends up at `position`.
	///
	/// `position == len()` appends. Anything past that is rejected and the
	/// list is left untouched.
	pub fn insert_at(&mut self, position: usize, value: T) -> Result<(), PlaylistError> {
		if position > self.len {
			return Err(PlaylistError::OutOfBounds {
				index: position,
				len: self.len,
			});
		}

		if position == 0 {
			self.insert_at_start(value);
			return Ok(());
		}

		if position == self.len {
			self.append(value);
			return Ok(());
		}

		let before = self.slot_at(position - 1);
		// interior position, so there is always a successor
		let after = self.node(before).next;

		let idx = self.alloc(Node {
			value,
			prev: Some(before),
			next: after,
		});

		self.node_mut(before).next = Some(idx);
		if let Some(after) = after {
			self.node_mut(after).prev = Some(idx);
		}

		self.len += 1;
		Ok(())
	}

	/// Removes and returns the value at `index`.
	///
	/// If that node was under the cursor, the cursor moves to the new head.
	/// Out-of-range indices are rejected without touching the list.
	pub fn remove_at(&mut self, index: usize) -> Result<T, PlaylistError> {
		if index >= self.len {
			return Err(PlaylistError::OutOfBounds {
				index,
				len: self.len,
			});
		}

		let idx = self.slot_at(index);
		let node = match self.slots[idx].take() {
			Some(node) => node,
			None => unreachable!("playlist slot {idx} reached through a link but empty"),
		};
		self.free.push(idx);

		match node.prev {
			Some(prev) => self.node_mut(prev).next = node.next,
			None => self.head = node.next,
		}

		match node.next {
			Some(next) => self.node_mut(next).prev = node.prev,
			None => self.tail = node.prev,
		}

		self.len -= 1;

		if self.cursor == Some(idx) {
			self.cursor = self.head;
		}

		Ok(node.value)
	}

	/// The value under the cursor.
	pub fn current(&self) -> Option<&T> {
		self.cursor.map(|idx| &self.node(idx).value)
	}

	/// Index of the cursor, counted from the head.
	pub fn position(&self) -> Option<usize> {
		let cursor = self.cursor?;
		self.links().position(|idx| idx == cursor)
	}

	/// Moves the cursor one step towards the tail.
	///
	/// Returns `None` without moving when the cursor is already at the tail.
	pub fn advance(&mut self) -> Option<&T> {
		let next = self.node(self.cursor?).next?;
		self.cursor = Some(next);
		Some(&self.node(next).value)
	}

	/// Moves the cursor one step towards the head.
	///
	/// Returns `None` without moving when the cursor is already at the head.
	pub fn retreat(&mut self) -> Option<&T> {
		let prev = self.node(self.cursor?).prev?;
		self.cursor = Some(prev);
		Some(&self.node(prev).value)
	}

	pub fn iter(&self) -> Iter<'_, T> {
		Iter {
			list: self,
			front: self.head,
			back: self.tail,
			remaining: self.len,
		}
	}

	fn alloc(&mut self, node: Node<T>) -> usize {
		match self.free.pop() {
			Some(idx) => {
				self.slots[idx] = Some(node);
				idx
			}
			None => {
				self.slots.push(Some(node));
				self.slots.len() - 1
			}
		}
	}

	#[inline]
	fn node(&self, idx: usize) -> &Node<T> {
		match &self.slots[idx] {
			Some(node) => node,
			None => unreachable!("dangling playlist link to slot {idx}"),
		}
	}

	#[inline]
	fn node_mut(&mut self, idx: usize) -> &mut Node<T> {
		match &mut self.slots[idx] {
			Some(node) => node,
			None => unreachable!("dangling playlist link to slot {idx}"),
		}
	}

	/// Slot indices from head to tail.
	fn links(&self) -> impl Iterator<Item = usize> + '_ {
		std::iter::successors(self.head, |&idx| self.node(idx).next)
	}

	/// Walks `index` steps from the head. Callers check `index < len`.
	fn slot_at(&self, index: usize) -> usize {
		match self.links().nth(index) {
			Some(idx) => idx,
			None => unreachable!("index {index} checked against len {}", self.len),
		}
	}
}

impl<T: PartialEq> Playlist<T> {
	/// Position of the first entry equal to `value`.
	pub fn index_of(&self, value: &T) -> Option<usize> {
		self.iter().position(|x| x == value)
	}
}

impl<T: fmt::Debug> fmt::Debug for Playlist<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Playlist")
			.field("entries", &DebugEntries(self))
			.field("position", &self.position())
			.finish()
	}
}

struct DebugEntries<'a, T>(&'a Playlist<T>);

impl<T: fmt::Debug> fmt::Debug for DebugEntries<'_, T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_list().entries(self.0.iter()).finish()
	}
}

impl<T> FromIterator<T> for Playlist<T> {
	fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
		let mut list = Self::new();
		list.extend(iter);
		list
	}
}

impl<T> Extend<T> for Playlist<T> {
	fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
		for value in iter {
			self.append(value);
		}
	}
}

impl<'a, T> IntoIterator for &'a Playlist<T> {
	type Item = &'a T;
	type IntoIter = Iter<'a, T>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

/// Borrowing iterator over a [`Playlist`], head to tail.
#[derive(Debug)]
pub struct Iter<'a, T> {
	list: &'a Playlist<T>,
	front: Option<usize>,
	back: Option<usize>,
	remaining: usize,
}

impl<T> Clone for Iter<'_, T> {
	fn clone(&self) -> Self {
		Self {
			list: self.list,
			front: self.front,
			back: self.back,
			remaining: self.remaining,
		}
	}
}

impl<'a, T> Iterator for Iter<'a, T> {
	type Item = &'a T;

	fn next(&mut self) -> Option<Self::Item> {
		if self.remaining == 0 {
			return None;
		}

		let node = self.list.node(self.front?);
		self.front = node.next;
		self.remaining -= 1;
		Some(&node.value)
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		(self.remaining, Some(self.remaining))
	}
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
	fn next_back(&mut self) -> Option<Self::Item> {
		if self.remaining == 0 {
			return None;
		}

		let node = self.list.node(self.back?);
		self.back = node.prev;
		self.remaining -= 1;
		Some(&node.value)
	}
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}
