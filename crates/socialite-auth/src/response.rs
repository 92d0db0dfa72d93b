//! Redirect responses produced by the login flow

use http::StatusCode;

/// A browser redirect
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
	location: String,
	status: StatusCode,
}

impl Redirect {
	/// `302 Found` to `location`
	pub fn to(location: impl Into<String>) -> Self {
		Self {
			location: location.into(),
			status: StatusCode::FOUND,
		}
	}

	/// Redirect with an explicit status
	pub fn with_status(location: impl Into<String>, status: StatusCode) -> Self {
		Self {
			location: location.into(),
			status,
		}
	}

	pub fn location(&self) -> &str {
		&self.location
	}

	pub fn status(&self) -> StatusCode {
		self.status
	}
}
