//! Built-in identity provider adapters

pub mod facebook;
pub mod google;
pub mod twitter;

pub use facebook::FacebookProvider;
pub use google::GoogleProvider;
pub use twitter::TwitterProvider;

use serde_json::Value;

/// Read a string (or number) out of a profile by JSON pointer
pub(crate) fn profile_str(profile: &Value, pointer: &str) -> Option<String> {
	match profile.pointer(pointer)? {
		Value::String(value) if !value.is_empty() => Some(value.clone()),
		Value::Number(value) => Some(value.to_string()),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	#[case("/id", Some("42"))]
	#[case("/name", Some("John"))]
	#[case("/data/username", Some("jdoe"))]
	#[case("/email", None)]
	#[case("/missing", None)]
	#[case("/data", None)]
	fn test_profile_str(#[case] pointer: &str, #[case] expected: Option<&str>) {
		let profile = json!({
			"id": 42,
			"name": "John",
			"email": "",
			"data": {"username": "jdoe"},
		});

		assert_eq!(profile_str(&profile, pointer).as_deref(), expected);
	}
}
