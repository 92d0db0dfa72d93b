//! Flash message type

use super::levels::Level;
use serde::{Deserialize, Serialize};

/// A single flash message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
	pub level: Level,
	pub text: String,
}

impl Message {
	/// Create a message with an explicit level
	pub fn new(level: Level, text: impl Into<String>) -> Self {
		Self {
			level,
			text: text.into(),
		}
	}

	pub fn info(text: impl Into<String>) -> Self {
		Self::new(Level::Info, text)
	}

	pub fn success(text: impl Into<String>) -> Self {
		Self::new(Level::Success, text)
	}

	pub fn warning(text: impl Into<String>) -> Self {
		Self::new(Level::Warning, text)
	}

	pub fn error(text: impl Into<String>) -> Self {
		Self::new(Level::Error, text)
	}

	/// Rendering tag of the message level
	pub fn tag(&self) -> &'static str {
		self.level.tag()
	}
}

impl std::fmt::Display for Message {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.text)
	}
}
