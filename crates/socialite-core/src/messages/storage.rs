//! Message storage backends

use super::message::Message;
use crate::session::Session;
use std::collections::VecDeque;

/// Session key under which flash messages are kept
pub const FLASH_SESSION_KEY: &str = "_flash";

/// Storage for pending flash messages
pub trait MessageStorage {
	/// Queue a message
	fn add(&mut self, message: Message);

	/// Drain all queued messages
	fn get_all(&mut self) -> Vec<Message>;

	/// Inspect queued messages without consuming them
	fn peek(&self) -> Vec<Message>;

	/// Drop all queued messages
	fn clear(&mut self);
}

/// In-memory message storage
#[derive(Debug, Default)]
pub struct MemoryStorage {
	messages: VecDeque<Message>,
}

impl MemoryStorage {
	/// Create a new MemoryStorage
	pub fn new() -> Self {
		Self {
			messages: VecDeque::new(),
		}
	}
}

impl MessageStorage for MemoryStorage {
	fn add(&mut self, message: Message) {
		self.messages.push_back(message);
	}

	fn get_all(&mut self) -> Vec<Message> {
		self.messages.drain(..).collect()
	}

	fn peek(&self) -> Vec<Message> {
		self.messages.iter().cloned().collect()
	}

	fn clear(&mut self) {
		self.messages.clear();
	}
}

/// Session-backed message storage
///
/// Messages are stored as a JSON array under [`FLASH_SESSION_KEY`], so they
/// survive the redirect that follows a failed login.
///
/// # Examples
///
/// ```
/// use socialite_core::messages::{Message, MessageStorage, SessionStorage};
/// use socialite_core::session::Session;
///
/// let mut session = Session::new();
/// SessionStorage::new(&mut session).add(Message::error("Provider error"));
///
/// assert!(session.contains("_flash"));
/// ```
pub struct SessionStorage<'a> {
	session: &'a mut Session,
}

impl<'a> SessionStorage<'a> {
	/// Wrap a session
	pub fn new(session: &'a mut Session) -> Self {
		Self { session }
	}

	fn load(&self) -> Vec<Message> {
		self.session
			.get_as::<Vec<Message>>(FLASH_SESSION_KEY)
			.unwrap_or_default()
	}

	fn store(&mut self, messages: &[Message]) {
		if messages.is_empty() {
			self.session.remove(FLASH_SESSION_KEY);
			return;
		}
		if let Err(error) = self.session.put(FLASH_SESSION_KEY, messages) {
			tracing::warn!(%error, "failed to store flash messages");
		}
	}
}

impl MessageStorage for SessionStorage<'_> {
	fn add(&mut self, message: Message) {
		let mut messages = self.load();
		messages.push(message);
		self.store(&messages);
	}

	fn get_all(&mut self) -> Vec<Message> {
		let messages = self.load();
		self.session.remove(FLASH_SESSION_KEY);
		messages
	}

	fn peek(&self) -> Vec<Message> {
		self.load()
	}

	fn clear(&mut self) {
		self.session.remove(FLASH_SESSION_KEY);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::messages::levels::Level;
	use rstest::rstest;

	#[rstest]
	fn test_memory_storage_drains() {
		let mut storage = MemoryStorage::new();

		storage.add(Message::new(Level::Info, "Test message"));
		assert_eq!(storage.peek().len(), 1);

		let messages = storage.get_all();
		assert_eq!(messages.len(), 1);
		assert_eq!(storage.peek().len(), 0);
	}

	#[rstest]
	fn test_session_storage_keeps_order_across_wrappers() {
		// Arrange
		let mut session = Session::new();
		SessionStorage::new(&mut session).add(Message::warning("first"));
		SessionStorage::new(&mut session).add(Message::error("second"));

		// Act
		let messages = SessionStorage::new(&mut session).get_all();

		// Assert
		assert_eq!(
			messages.iter().map(|m| m.text.as_str()).collect::<Vec<_>>(),
			vec!["first", "second"]
		);
		assert!(!session.contains(FLASH_SESSION_KEY));
	}

	#[rstest]
	fn test_session_storage_peek_does_not_consume() {
		let mut session = Session::new();
		SessionStorage::new(&mut session).add(Message::error("Provider error"));

		let storage = SessionStorage::new(&mut session);
		assert_eq!(storage.peek().len(), 1);
		assert_eq!(storage.peek()[0].tag(), "danger");
	}

	#[rstest]
	fn test_session_storage_clear() {
		let mut session = Session::new();
		let mut storage = SessionStorage::new(&mut session);
		storage.add(Message::info("hello"));
		storage.clear();

		assert!(storage.peek().is_empty());
	}
}
