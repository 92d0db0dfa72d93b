//! Message levels

use serde::{Deserialize, Serialize};

/// Severity of a flash message
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
	Debug,
	Info,
	Success,
	Warning,
	Error,
}

impl Level {
	/// CSS-friendly tag used when rendering the message
	///
	/// Error messages render as `danger`, matching common alert styles.
	pub fn tag(&self) -> &'static str {
		match self {
			Level::Debug => "debug",
			Level::Info => "info",
			Level::Success => "success",
			Level::Warning => "warning",
			Level::Error => "danger",
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(Level::Debug, "debug")]
	#[case(Level::Info, "info")]
	#[case(Level::Success, "success")]
	#[case(Level::Warning, "warning")]
	#[case(Level::Error, "danger")]
	fn test_level_tag(#[case] level: Level, #[case] expected: &str) {
		assert_eq!(level.tag(), expected);
	}

	#[rstest]
	fn test_level_ordering() {
		assert!(Level::Error > Level::Warning);
		assert!(Level::Debug < Level::Info);
	}
}
