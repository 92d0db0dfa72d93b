//! Identity provider adapter trait and shared adapter core

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use socialite_conf::ProviderSettings;
use socialite_core::{Message, MessageStorage, Session, SessionStorage};
use std::fmt;
use std::sync::Arc;

use crate::client::{OAuth2Client, OAuthClientConfig, QueryParams, TokenResponse};
use crate::error::SocialiteError;
use crate::response::Redirect;
use crate::routes::EntryPointRoutes;

/// Flash text shown when the OAuth state did not survive the round trip
pub const EXPIRED_STATE_MESSAGE: &str =
	"Your login attempt has expired or was tampered with. Please try again.";

/// Identity returned by a provider after a successful handshake
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteUser {
	/// Provider-side user ID
	pub id: String,
	pub name: Option<String>,
	pub nickname: Option<String>,
	pub email: Option<String>,
	pub avatar: Option<String>,
	/// Access token
	pub token: String,
	pub refresh_token: Option<String>,
	pub expires_in: Option<u64>,
	/// Profile exactly as the provider returned it
	#[serde(default)]
	pub raw: serde_json::Value,
}

impl RemoteUser {
	/// Start a remote user from a token response and a raw profile
	pub fn from_token(id: impl Into<String>, token: TokenResponse, raw: serde_json::Value) -> Self {
		Self {
			id: id.into(),
			token: token.access_token,
			refresh_token: token.refresh_token,
			expires_in: token.expires_in,
			raw,
			..Default::default()
		}
	}

	/// The email address, if the provider shared a non-empty one
	pub fn email(&self) -> Option<&str> {
		self.email.as_deref().filter(|email| !email.trim().is_empty())
	}
}

/// Registration metadata of a provider
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderInfo {
	/// Short code used in URLs; derived from the identifier when empty
	#[serde(default)]
	pub code: String,
	#[serde(default)]
	pub label: String,
	#[serde(default)]
	pub description: String,
}

impl ProviderInfo {
	pub fn new(
		code: impl Into<String>,
		label: impl Into<String>,
		description: impl Into<String>,
	) -> Self {
		Self {
			code: code.into(),
			label: label.into(),
			description: description.into(),
		}
	}
}

/// Input type of a settings form field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
	Switch,
	Text,
}

/// A settings form field contributed by a provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingsField {
	/// Form key, e.g. `providers[facebook][client_id]`
	pub name: String,
	/// Settings key within the provider, e.g. `client_id`
	pub key: String,
	pub label: String,
	#[serde(rename = "type")]
	pub field_type: FieldType,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub default: Option<String>,
	/// Form tab the field belongs to
	pub tab: String,
}

impl SettingsField {
	pub fn new(provider: &str, key: &str, label: &str, field_type: FieldType) -> Self {
		Self {
			name: format!("providers[{}][{}]", provider, key),
			key: key.to_string(),
			label: label.to_string(),
			field_type,
			default: None,
			tab: String::new(),
		}
	}

	pub fn with_default(mut self, default: impl Into<String>) -> Self {
		self.default = Some(default.into());
		self
	}

	pub fn with_tab(mut self, tab: impl Into<String>) -> Self {
		self.tab = tab.into();
		self
	}
}

/// Adjusts the OAuth client configuration of every adapter
///
/// Receives the provider code and the configuration about to be used.
pub type ConfigExtender = Arc<dyn Fn(&str, &mut OAuthClientConfig) + Send + Sync>;

/// Everything an adapter needs to be built
#[derive(Clone)]
pub struct ProviderContext {
	pub code: String,
	pub settings: ProviderSettings,
	pub routes: EntryPointRoutes,
	pub config_extenders: Vec<ConfigExtender>,
}

impl ProviderContext {
	pub fn new(code: impl Into<String>, settings: ProviderSettings, routes: EntryPointRoutes) -> Self {
		Self {
			code: code.into(),
			settings,
			routes,
			config_extenders: Vec::new(),
		}
	}
}

impl fmt::Debug for ProviderContext {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ProviderContext")
			.field("code", &self.code)
			.field("settings", &self.settings)
			.field("routes", &self.routes)
			.field("config_extenders", &self.config_extenders.len())
			.finish()
	}
}

/// State and behaviour shared by all adapters
#[derive(Debug, Clone)]
pub struct ProviderCore {
	context: ProviderContext,
	label: String,
}

impl ProviderCore {
	pub fn new(context: ProviderContext, label: impl Into<String>) -> Self {
		Self {
			context,
			label: label.into(),
		}
	}

	pub fn driver(&self) -> &str {
		&self.context.code
	}

	pub fn label(&self) -> &str {
		&self.label
	}

	pub fn settings(&self) -> &ProviderSettings {
		&self.context.settings
	}

	pub fn setting(&self, key: &str) -> Option<String> {
		self.context.settings.get(key)
	}

	pub fn is_enabled(&self) -> bool {
		self.context.settings.status
	}

	pub fn make_entry_point_url(&self, action: &str) -> String {
		self.context.routes.url(&self.context.code, action)
	}

	/// Build the OAuth client from adapter defaults, stored settings and
	/// registered config extenders, in that order
	pub fn client(&self, mut config: OAuthClientConfig) -> OAuth2Client {
		config.apply_settings(&self.context.settings);
		config.redirect_uri = self.make_entry_point_url("callback");
		for extend in &self.context.config_extenders {
			extend(&self.context.code, &mut config);
		}
		OAuth2Client::new(config)
	}

	/// Begin the handshake with `client`
	pub fn redirect(
		&self,
		session: &mut Session,
		client: &OAuth2Client,
	) -> Result<Redirect, SocialiteError> {
		let url = client.begin(session, self.driver())?;
		Ok(Redirect::to(url))
	}

	/// Complete the handshake with `client`
	pub async fn callback(
		&self,
		session: &mut Session,
		client: &OAuth2Client,
		query: &QueryParams,
	) -> Result<(TokenResponse, serde_json::Value), SocialiteError> {
		client
			.complete(session, self.driver(), &query.callback())
			.await
	}

	/// Log a failed handshake and flash it to the user
	pub fn report_exception(&self, error: &SocialiteError, session: &mut Session) {
		tracing::error!(provider = %self.driver(), %error, "social login failed");

		let text = match error {
			SocialiteError::InvalidState(_) => EXPIRED_STATE_MESSAGE.to_string(),
			other => other.to_string(),
		};
		SessionStorage::new(session).add(Message::error(text));
	}
}

/// An identity provider adapter
#[async_trait]
pub trait SocialProvider: Send + Sync {
	/// Shared adapter state
	fn core(&self) -> &ProviderCore;

	/// Provider code this adapter was built for
	fn driver(&self) -> &str {
		self.core().driver()
	}

	fn label(&self) -> &str {
		self.core().label()
	}

	/// Whether the provider is switched on in settings
	fn is_enabled(&self) -> bool {
		self.core().is_enabled()
	}

	fn setting(&self, key: &str) -> Option<String> {
		self.core().setting(key)
	}

	fn make_entry_point_url(&self, action: &str) -> String {
		self.core().make_entry_point_url(action)
	}

	/// Begin the handshake; returns the redirect to the provider
	async fn redirect_to_provider(&self, session: &mut Session) -> Result<Redirect, SocialiteError>;

	/// Complete the handshake from the callback request
	async fn handle_provider_callback(
		&self,
		session: &mut Session,
		query: &QueryParams,
	) -> Result<RemoteUser, SocialiteError>;

	/// Whether the user must be asked for an email address before login
	fn should_confirm_email(&self, user: &RemoteUser) -> bool {
		user.email().is_none()
	}

	/// Report a failed handshake
	fn handle_provider_exception(&self, error: &SocialiteError, session: &mut Session) {
		self.core().report_exception(error, session);
	}

	/// Fields this provider contributes to the settings form
	fn settings_fields(&self) -> Vec<SettingsField>;
}
