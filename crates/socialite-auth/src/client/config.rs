//! OAuth2 client configuration

use serde::{Deserialize, Serialize};
use socialite_conf::ProviderSettings;
use std::collections::BTreeMap;

/// How client credentials are presented to the token endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenAuthMethod {
	/// `client_id` and `client_secret` form fields
	#[default]
	RequestBody,
	/// HTTP Basic authentication header
	BasicAuth,
}

/// Endpoints, credentials and options of one OAuth2 client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthClientConfig {
	/// OAuth2 client ID
	pub client_id: String,

	/// OAuth2 client secret
	pub client_secret: String,

	/// Callback URL registered with the provider
	pub redirect_uri: String,

	/// Authorization endpoint URL
	pub authorize_url: String,

	/// Token endpoint URL
	pub token_url: String,

	/// Profile endpoint URL
	pub userinfo_url: String,

	/// Requested scopes
	pub scopes: Vec<String>,

	/// Separator used to join scopes on the authorization URL
	pub scope_separator: String,

	/// Send a PKCE challenge and verifier
	pub use_pkce: bool,

	/// Client authentication on the token endpoint
	pub token_auth: TokenAuthMethod,

	/// Extra query parameters for the authorization URL
	pub authorize_params: BTreeMap<String, String>,

	/// Extra query parameters for the profile request
	pub userinfo_params: BTreeMap<String, String>,
}

impl OAuthClientConfig {
	/// Configuration with the given endpoints and defaults for everything else
	pub fn new(
		authorize_url: impl Into<String>,
		token_url: impl Into<String>,
		userinfo_url: impl Into<String>,
	) -> Self {
		Self {
			client_id: String::new(),
			client_secret: String::new(),
			redirect_uri: String::new(),
			authorize_url: authorize_url.into(),
			token_url: token_url.into(),
			userinfo_url: userinfo_url.into(),
			scopes: Vec::new(),
			scope_separator: " ".to_string(),
			use_pkce: false,
			token_auth: TokenAuthMethod::RequestBody,
			authorize_params: BTreeMap::new(),
			userinfo_params: BTreeMap::new(),
		}
	}

	pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.scopes = scopes.into_iter().map(Into::into).collect();
		self
	}

	pub fn with_scope_separator(mut self, separator: impl Into<String>) -> Self {
		self.scope_separator = separator.into();
		self
	}

	pub fn with_pkce(mut self) -> Self {
		self.use_pkce = true;
		self
	}

	pub fn with_token_auth(mut self, method: TokenAuthMethod) -> Self {
		self.token_auth = method;
		self
	}

	pub fn with_userinfo_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.userinfo_params.insert(key.into(), value.into());
		self
	}

	/// Apply stored provider settings: credentials, endpoint overrides and
	/// additional scopes
	pub fn apply_settings(&mut self, settings: &ProviderSettings) {
		self.client_id = settings.client_id.clone();
		self.client_secret = settings.client_secret.clone();
		if let Some(url) = &settings.authorize_url {
			self.authorize_url = url.clone();
		}
		if let Some(url) = &settings.token_url {
			self.token_url = url.clone();
		}
		if let Some(url) = &settings.userinfo_url {
			self.userinfo_url = url.clone();
		}
		for scope in &settings.scopes {
			if !self.scopes.contains(scope) {
				self.scopes.push(scope.clone());
			}
		}
	}

	/// Scopes joined for the `scope` parameter
	pub fn scope_param(&self) -> String {
		self.scopes.join(&self.scope_separator)
	}
}
