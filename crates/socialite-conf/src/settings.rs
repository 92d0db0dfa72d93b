//! Social login settings

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;
use url::Url;

/// Settings errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
	#[error("File error: {0}")]
	FileError(String),

	#[error("Parse error: {0}")]
	ParseError(String),

	#[error("Validation error: {0}")]
	ValidationError(String),
}

impl From<toml::de::Error> for SettingsError {
	fn from(error: toml::de::Error) -> Self {
		SettingsError::ParseError(error.to_string())
	}
}

/// Credentials and switches for one identity provider
///
/// Twitter settings historically use `identifier`/`secret`; both names are
/// accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
	/// Whether the provider is offered on the login page
	pub status: bool,

	/// OAuth client (app) ID
	#[serde(alias = "identifier")]
	pub client_id: String,

	/// OAuth client (app) secret
	#[serde(alias = "secret")]
	pub client_secret: String,

	/// Application name shown on the consent screen (Google)
	#[serde(skip_serializing_if = "Option::is_none")]
	pub app_name: Option<String>,

	/// Scopes requested in addition to the provider defaults
	pub scopes: Vec<String>,

	/// Authorization endpoint override
	#[serde(skip_serializing_if = "Option::is_none")]
	pub authorize_url: Option<String>,

	/// Token endpoint override
	#[serde(skip_serializing_if = "Option::is_none")]
	pub token_url: Option<String>,

	/// Profile endpoint override
	#[serde(skip_serializing_if = "Option::is_none")]
	pub userinfo_url: Option<String>,

	/// Provider-specific values not covered above
	pub extra: BTreeMap<String, String>,
}

impl ProviderSettings {
	/// Create enabled settings with the given credentials
	pub fn enabled(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
		Self {
			status: true,
			client_id: client_id.into(),
			client_secret: client_secret.into(),
			..Default::default()
		}
	}

	/// Look up a setting by its form key
	///
	/// # Examples
	///
	/// ```
	/// use socialite_conf::ProviderSettings;
	///
	/// let mut settings = ProviderSettings::enabled("id", "secret");
	/// settings.extra.insert("tenant".to_string(), "common".to_string());
	///
	/// assert_eq!(settings.get("client_id").as_deref(), Some("id"));
	/// assert_eq!(settings.get("status").as_deref(), Some("1"));
	/// assert_eq!(settings.get("tenant").as_deref(), Some("common"));
	/// assert_eq!(settings.get("missing"), None);
	/// ```
	pub fn get(&self, key: &str) -> Option<String> {
		match key {
			"status" => Some(if self.status { "1" } else { "0" }.to_string()),
			"client_id" | "identifier" => non_empty(&self.client_id),
			"client_secret" | "secret" => non_empty(&self.client_secret),
			"app_name" => self.app_name.clone(),
			"authorize_url" => self.authorize_url.clone(),
			"token_url" => self.token_url.clone(),
			"userinfo_url" => self.userinfo_url.clone(),
			_ => self.extra.get(key).cloned(),
		}
	}
}

fn non_empty(value: &str) -> Option<String> {
	if value.is_empty() {
		None
	} else {
		Some(value.to_string())
	}
}

/// Settings for the social login flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialiteSettings {
	/// Absolute base URL of the site, used to build callback URLs
	pub base_url: String,

	/// Path prefix of the `{provider}/{action}` entry point route
	pub route_prefix: String,

	/// Where to send the browser after a successful login
	pub success_url: String,

	/// Where to send the browser after a failed login
	pub error_url: String,

	/// Page asking the user for an email address when the provider gave none
	pub confirm_email_url: String,

	/// User type stored on account links when no resolver answers
	pub default_user_type: String,

	/// Cookie carrying the session id
	pub session_cookie_name: String,

	/// Per-provider settings keyed by provider code
	pub providers: BTreeMap<String, ProviderSettings>,
}

impl Default for SocialiteSettings {
	fn default() -> Self {
		Self {
			base_url: "http://localhost".to_string(),
			route_prefix: "socialite".to_string(),
			success_url: "/".to_string(),
			error_url: "/login".to_string(),
			confirm_email_url: "/confirm-email".to_string(),
			default_user_type: "customers".to_string(),
			session_cookie_name: "socialite_session".to_string(),
			providers: BTreeMap::new(),
		}
	}
}

impl SocialiteSettings {
	/// Parse and validate settings from TOML
	pub fn from_toml_str(source: &str) -> Result<Self, SettingsError> {
		let settings: SocialiteSettings = toml::from_str(source)?;
		settings.validate()?;
		Ok(settings)
	}

	/// Read, parse and validate settings from a TOML file
	pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
		let path = path.as_ref();
		let source = std::fs::read_to_string(path)
			.map_err(|e| SettingsError::FileError(format!("{}: {}", path.display(), e)))?;
		tracing::debug!(path = %path.display(), "loading socialite settings");
		Self::from_toml_str(&source)
	}

	/// Add or replace the settings of one provider
	pub fn with_provider(mut self, code: impl Into<String>, provider: ProviderSettings) -> Self {
		self.providers.insert(code.into(), provider);
		self
	}

	/// Settings of the provider with the given code
	pub fn provider(&self, code: &str) -> Option<&ProviderSettings> {
		self.providers.get(code)
	}

	/// Check the settings for values the login flow cannot work with
	pub fn validate(&self) -> Result<(), SettingsError> {
		let base = Url::parse(&self.base_url).map_err(|e| {
			SettingsError::ValidationError(format!("base_url '{}': {}", self.base_url, e))
		})?;
		if base.cannot_be_a_base() {
			return Err(SettingsError::ValidationError(format!(
				"base_url '{}' cannot be used as a base URL",
				self.base_url
			)));
		}

		if self.route_prefix.trim_matches('/').is_empty() {
			return Err(SettingsError::ValidationError(
				"route_prefix must not be empty".to_string(),
			));
		}

		for (code, provider) in &self.providers {
			if provider.status && provider.client_id.is_empty() {
				return Err(SettingsError::ValidationError(format!(
					"provider '{}' is enabled but has no client_id",
					code
				)));
			}
		}

		Ok(())
	}

	/// Whether a redirect destination supplied by the browser stays on this site
	///
	/// Relative references are accepted; absolute URLs must share the origin of
	/// `base_url`.
	///
	/// # Examples
	///
	/// ```
	/// use socialite_conf::SocialiteSettings;
	///
	/// let settings = SocialiteSettings::default();
	///
	/// assert!(settings.is_safe_redirect("/account"));
	/// assert!(settings.is_safe_redirect("account"));
	/// assert!(settings.is_safe_redirect("http://localhost/account"));
	/// assert!(!settings.is_safe_redirect("https://evil.example/"));
	/// assert!(!settings.is_safe_redirect("//evil.example/"));
	/// ```
	pub fn is_safe_redirect(&self, target: &str) -> bool {
		let target = target.trim();
		if target.is_empty() || target.starts_with("//") || target.starts_with("/\\") {
			return false;
		}

		match Url::parse(target) {
			Ok(absolute) => match Url::parse(&self.base_url) {
				Ok(base) => absolute.origin() == base.origin(),
				Err(_) => false,
			},
			Err(url::ParseError::RelativeUrlWithoutBase) => !target.contains('\\'),
			Err(_) => false,
		}
	}

	/// Absolute URL for a site-relative path
	pub fn absolute_url(&self, path: &str) -> String {
		format!(
			"{}/{}",
			self.base_url.trim_end_matches('/'),
			path.trim_start_matches('/')
		)
	}
}
