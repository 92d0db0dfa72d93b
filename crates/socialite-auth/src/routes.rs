//! Entry point route: `/{prefix}/{provider}/{action}`

use regex::Regex;
use socialite_conf::SocialiteSettings;

use crate::error::SocialiteError;

/// A matched entry point request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPoint {
	pub provider: String,
	pub action: String,
}

/// Matches and generates entry point URLs
///
/// # Examples
///
/// ```
/// use socialite_auth::routes::EntryPointRoutes;
///
/// let routes = EntryPointRoutes::new("https://shop.example", "socialite").unwrap();
///
/// assert_eq!(
///     routes.url("google", "callback"),
///     "https://shop.example/socialite/google/callback"
/// );
/// let matched = routes.match_path("/socialite/google/auth").unwrap();
/// assert_eq!(matched.provider, "google");
/// assert_eq!(matched.action, "auth");
/// ```
#[derive(Debug, Clone)]
pub struct EntryPointRoutes {
	base_url: String,
	prefix: String,
	pattern: Regex,
}

impl EntryPointRoutes {
	pub fn new(base_url: impl Into<String>, prefix: &str) -> Result<Self, SocialiteError> {
		let prefix = prefix.trim_matches('/').to_string();
		let pattern = Regex::new(&format!(
			r"^/{}/(?P<provider>[a-zA-Z-]+)/(?P<action>[a-zA-Z]+)/?$",
			regex::escape(&prefix)
		))
		.map_err(|e| SocialiteError::Configuration(format!("route prefix '{}': {}", prefix, e)))?;

		Ok(Self {
			base_url: base_url.into().trim_end_matches('/').to_string(),
			prefix,
			pattern,
		})
	}

	pub fn from_settings(settings: &SocialiteSettings) -> Result<Self, SocialiteError> {
		Self::new(settings.base_url.clone(), &settings.route_prefix)
	}

	/// Site-relative path of an entry point
	pub fn path(&self, provider: &str, action: &str) -> String {
		format!("/{}/{}/{}", self.prefix, provider, action)
	}

	/// Absolute URL of an entry point
	pub fn url(&self, provider: &str, action: &str) -> String {
		format!("{}{}", self.base_url, self.path(provider, action))
	}

	/// Match a request path against the entry point pattern
	pub fn match_path(&self, path: &str) -> Option<EntryPoint> {
		let captures = self.pattern.captures(path)?;
		Some(EntryPoint {
			provider: captures["provider"].to_string(),
			action: captures["action"].to_string(),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("/socialite/facebook/auth", Some(("facebook", "auth")))]
	#[case("/socialite/google/callback/", Some(("google", "callback")))]
	#[case("/socialite/my-provider/auth", Some(("my-provider", "auth")))]
	#[case("/socialite/google/auth2", None)]
	#[case("/socialite/google_oauth/auth", None)]
	#[case("/socialite/google", None)]
	#[case("/other/google/auth", None)]
	#[case("/socialite/google/auth/extra", None)]
	fn test_match_path(#[case] path: &str, #[case] expected: Option<(&str, &str)>) {
		let routes = EntryPointRoutes::new("http://localhost", "socialite").unwrap();

		let matched = routes
			.match_path(path)
			.map(|m| (m.provider, m.action));

		assert_eq!(
			matched,
			expected.map(|(p, a)| (p.to_string(), a.to_string()))
		);
	}

	#[rstest]
	fn test_nested_prefix_and_trailing_slashes() {
		let routes = EntryPointRoutes::new("https://shop.example/", "/auth/social/").unwrap();

		assert_eq!(routes.path("twitter", "auth"), "/auth/social/twitter/auth");
		assert_eq!(
			routes.url("twitter", "auth"),
			"https://shop.example/auth/social/twitter/auth"
		);
		assert!(routes.match_path("/auth/social/twitter/callback").is_some());
	}

	#[rstest]
	fn test_prefix_is_literal() {
		let routes = EntryPointRoutes::new("http://localhost", "a.b").unwrap();

		assert!(routes.match_path("/a.b/google/auth").is_some());
		assert!(routes.match_path("/axb/google/auth").is_none());
	}
}
