//! Query string parameters of entry point requests

use serde::Deserialize;
use std::collections::BTreeMap;

/// Decoded query string of an entry point request
///
/// # Examples
///
/// ```
/// use socialite_auth::client::QueryParams;
///
/// let query = QueryParams::parse("success=%2Faccount&state=xyz");
///
/// assert_eq!(query.get("success"), Some("/account"));
/// assert_eq!(query.get("error"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(BTreeMap<String, String>);

impl QueryParams {
	pub fn new() -> Self {
		Self::default()
	}

	/// Decode a raw query string; malformed input yields no parameters
	pub fn parse(raw: &str) -> Self {
		match serde_urlencoded::from_str::<Vec<(String, String)>>(raw) {
			Ok(pairs) => Self(pairs.into_iter().collect()),
			Err(error) => {
				tracing::debug!(%error, "ignoring malformed query string");
				Self::default()
			}
		}
	}

	/// Add a parameter, replacing an earlier value
	pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.0.insert(key.into(), value.into());
		self
	}

	pub fn get(&self, key: &str) -> Option<&str> {
		self.0.get(key).map(String::as_str)
	}

	/// Parameters the provider sends to the callback
	pub fn callback(&self) -> CallbackQuery {
		CallbackQuery {
			code: self.0.get("code").cloned(),
			state: self.0.get("state").cloned(),
			error: self.0.get("error").cloned(),
			error_description: self.0.get("error_description").cloned(),
		}
	}
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
	fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
		Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
	}
}

/// OAuth2 authorization response parameters
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CallbackQuery {
	pub code: Option<String>,
	pub state: Option<String>,
	pub error: Option<String>,
	pub error_description: Option<String>,
}
