//! Environment variable overlay
//!
//! Variables are read from any `(key, value)` iterator so callers can pass
//! `std::env::vars()` or a fixed list.
//!
//! | Variable | Setting |
//! |---|---|
//! | `SOCIALITE_BASE_URL` | `base_url` |
//! | `SOCIALITE_ROUTE_PREFIX` | `route_prefix` |
//! | `SOCIALITE_SUCCESS_URL` | `success_url` |
//! | `SOCIALITE_ERROR_URL` | `error_url` |
//! | `SOCIALITE_CONFIRM_EMAIL_URL` | `confirm_email_url` |
//! | `SOCIALITE_DEFAULT_USER_TYPE` | `default_user_type` |
//! | `SOCIALITE_SESSION_COOKIE_NAME` | `session_cookie_name` |
//! | `SOCIALITE_PROVIDERS__<CODE>__<FIELD>` | `providers.<code>.<field>` |

use crate::settings::{ProviderSettings, SettingsError, SocialiteSettings};

/// Prefix shared by all recognised variables
pub const ENV_PREFIX: &str = "SOCIALITE_";

const PROVIDERS_PREFIX: &str = "PROVIDERS__";

/// Parse a boolean the way shells and container manifests spell them
///
/// # Examples
///
/// ```
/// use socialite_conf::parse_bool;
///
/// assert_eq!(parse_bool("yes"), Some(true));
/// assert_eq!(parse_bool("OFF"), Some(false));
/// assert_eq!(parse_bool("maybe"), None);
/// ```
pub fn parse_bool(value: &str) -> Option<bool> {
	match value.trim().to_ascii_lowercase().as_str() {
		"true" | "1" | "yes" | "on" => Some(true),
		"false" | "0" | "no" | "off" => Some(false),
		_ => None,
	}
}

impl SocialiteSettings {
	/// Overlay `SOCIALITE_*` variables onto these settings and re-validate
	///
	/// Unrelated variables are ignored. Unknown `SOCIALITE_*` keys are logged
	/// and skipped.
	///
	/// # Examples
	///
	/// ```
	/// use socialite_conf::SocialiteSettings;
	///
	/// let settings = SocialiteSettings::default()
	///     .with_env_overrides([
	///         ("SOCIALITE_ERROR_URL", "/account/login"),
	///         ("SOCIALITE_PROVIDERS__GOOGLE__STATUS", "on"),
	///         ("SOCIALITE_PROVIDERS__GOOGLE__CLIENT_ID", "google-id"),
	///         ("PATH", "/usr/bin"),
	///     ])
	///     .unwrap();
	///
	/// assert_eq!(settings.error_url, "/account/login");
	/// assert!(settings.provider("google").unwrap().status);
	/// ```
	pub fn with_env_overrides<I, K, V>(mut self, vars: I) -> Result<Self, SettingsError>
	where
		I: IntoIterator<Item = (K, V)>,
		K: AsRef<str>,
		V: AsRef<str>,
	{
		for (key, value) in vars {
			let Some(name) = key.as_ref().strip_prefix(ENV_PREFIX) else {
				continue;
			};
			self.apply_env(name, value.as_ref())?;
		}
		self.validate()?;
		Ok(self)
	}

	/// Default settings overlaid with the process environment
	pub fn from_env() -> Result<Self, SettingsError> {
		Self::default().with_env_overrides(std::env::vars())
	}

	fn apply_env(&mut self, name: &str, value: &str) -> Result<(), SettingsError> {
		if let Some(rest) = name.strip_prefix(PROVIDERS_PREFIX) {
			let Some((code, field)) = rest.split_once("__") else {
				return Err(SettingsError::ParseError(format!(
					"{}{} must name a provider and a field",
					ENV_PREFIX, name
				)));
			};
			let provider = self
				.providers
				.entry(code.to_ascii_lowercase())
				.or_default();
			return apply_provider_env(provider, code, field, value);
		}

		let target = match name {
			"BASE_URL" => &mut self.base_url,
			"ROUTE_PREFIX" => &mut self.route_prefix,
			"SUCCESS_URL" => &mut self.success_url,
			"ERROR_URL" => &mut self.error_url,
			"CONFIRM_EMAIL_URL" => &mut self.confirm_email_url,
			"DEFAULT_USER_TYPE" => &mut self.default_user_type,
			"SESSION_COOKIE_NAME" => &mut self.session_cookie_name,
			_ => {
				tracing::warn!(variable = %format!("{}{}", ENV_PREFIX, name), "unknown socialite variable");
				return Ok(());
			}
		};
		*target = value.to_string();
		Ok(())
	}
}

fn apply_provider_env(
	provider: &mut ProviderSettings,
	code: &str,
	field: &str,
	value: &str,
) -> Result<(), SettingsError> {
	match field {
		"STATUS" => {
			provider.status = parse_bool(value).ok_or_else(|| {
				SettingsError::ParseError(format!(
					"{}PROVIDERS__{}__STATUS: '{}' is not a boolean",
					ENV_PREFIX, code, value
				))
			})?;
		}
		"CLIENT_ID" => provider.client_id = value.to_string(),
		"CLIENT_SECRET" => provider.client_secret = value.to_string(),
		"APP_NAME" => provider.app_name = Some(value.to_string()),
		"SCOPES" => {
			provider.scopes = value
				.split(',')
				.map(str::trim)
				.filter(|scope| !scope.is_empty())
				.map(str::to_string)
				.collect();
		}
		"AUTHORIZE_URL" => provider.authorize_url = Some(value.to_string()),
		"TOKEN_URL" => provider.token_url = Some(value.to_string()),
		"USERINFO_URL" => provider.userinfo_url = Some(value.to_string()),
		other => {
			provider
				.extra
				.insert(other.to_ascii_lowercase(), value.to_string());
		}
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("true", Some(true))]
	#[case("1", Some(true))]
	#[case(" Yes ", Some(true))]
	#[case("on", Some(true))]
	#[case("false", Some(false))]
	#[case("0", Some(false))]
	#[case("no", Some(false))]
	#[case("Off", Some(false))]
	#[case("", None)]
	#[case("enabled", None)]
	fn test_parse_bool(#[case] input: &str, #[case] expected: Option<bool>) {
		assert_eq!(parse_bool(input), expected);
	}

	#[rstest]
	fn test_env_overrides_top_level_fields() {
		// Arrange
		let vars = [
			("SOCIALITE_BASE_URL", "https://shop.example.com"),
			("SOCIALITE_ROUTE_PREFIX", "auth/social"),
			("SOCIALITE_SUCCESS_URL", "/account"),
			("SOCIALITE_DEFAULT_USER_TYPE", "admins"),
			("SOCIALITE_SESSION_COOKIE_NAME", "sid"),
		];

		// Act
		let settings = SocialiteSettings::default().with_env_overrides(vars).unwrap();

		// Assert
		assert_eq!(settings.base_url, "https://shop.example.com");
		assert_eq!(settings.route_prefix, "auth/social");
		assert_eq!(settings.success_url, "/account");
		assert_eq!(settings.error_url, "/login");
		assert_eq!(settings.default_user_type, "admins");
		assert_eq!(settings.session_cookie_name, "sid");
	}

	#[rstest]
	fn test_env_overrides_provider_fields() {
		let vars = [
			("SOCIALITE_PROVIDERS__FACEBOOK__STATUS", "1"),
			("SOCIALITE_PROVIDERS__FACEBOOK__CLIENT_ID", "fb-app"),
			("SOCIALITE_PROVIDERS__FACEBOOK__CLIENT_SECRET", "fb-secret"),
			("SOCIALITE_PROVIDERS__FACEBOOK__SCOPES", "email, public_profile,"),
			("SOCIALITE_PROVIDERS__FACEBOOK__GRAPH_VERSION", "v19.0"),
		];

		let settings = SocialiteSettings::default().with_env_overrides(vars).unwrap();
		let facebook = settings.provider("facebook").unwrap();

		assert!(facebook.status);
		assert_eq!(facebook.client_id, "fb-app");
		assert_eq!(facebook.client_secret, "fb-secret");
		assert_eq!(facebook.scopes, vec!["email", "public_profile"]);
		assert_eq!(facebook.get("graph_version").as_deref(), Some("v19.0"));
	}

	#[rstest]
	fn test_env_overrides_merge_with_file_settings() {
		let settings = SocialiteSettings::from_toml_str(
			r#"
			[providers.google]
			status = true
			client_id = "from-file"
			client_secret = "file-secret"
			"#,
		)
		.unwrap()
		.with_env_overrides([("SOCIALITE_PROVIDERS__GOOGLE__CLIENT_SECRET", "env-secret")])
		.unwrap();

		let google = settings.provider("google").unwrap();
		assert_eq!(google.client_id, "from-file");
		assert_eq!(google.client_secret, "env-secret");
	}

	#[rstest]
	fn test_env_invalid_status_is_rejected() {
		let result = SocialiteSettings::default()
			.with_env_overrides([("SOCIALITE_PROVIDERS__GOOGLE__STATUS", "sometimes")]);

		assert!(matches!(result, Err(SettingsError::ParseError(_))));
	}

	#[rstest]
	fn test_env_provider_key_without_field_is_rejected() {
		let result = SocialiteSettings::default()
			.with_env_overrides([("SOCIALITE_PROVIDERS__GOOGLE", "x")]);

		assert!(matches!(result, Err(SettingsError::ParseError(_))));
	}

	#[rstest]
	fn test_env_overrides_are_validated() {
		let result = SocialiteSettings::default()
			.with_env_overrides([("SOCIALITE_PROVIDERS__TWITTER__STATUS", "true")]);

		assert!(matches!(result, Err(SettingsError::ValidationError(_))));
	}

	#[rstest]
	fn test_unknown_variables_are_ignored() {
		let settings = SocialiteSettings::default()
			.with_env_overrides([("SOCIALITE_THEME", "dark"), ("HOME", "/root")])
			.unwrap();

		assert_eq!(settings, SocialiteSettings::default());
	}
}
