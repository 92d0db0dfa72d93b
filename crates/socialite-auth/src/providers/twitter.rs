//! Twitter (X) login over OAuth 2.0 with PKCE
//!
//! Twitter never shares an email address, so users are always asked to
//! confirm one.

use async_trait::async_trait;
use socialite_core::Session;

use super::profile_str;
use crate::client::{OAuth2Client, OAuthClientConfig, QueryParams, TokenAuthMethod};
use crate::error::SocialiteError;
use crate::provider::{
	FieldType, ProviderContext, ProviderCore, ProviderInfo, RemoteUser, SettingsField,
	SocialProvider,
};
use crate::response::Redirect;

/// Twitter adapter
pub struct TwitterProvider {
	core: ProviderCore,
}

impl TwitterProvider {
	pub const IDENTIFIER: &'static str = "socialite::providers::Twitter";

	pub fn new(context: ProviderContext) -> Self {
		Self {
			core: ProviderCore::new(context, "Twitter"),
		}
	}

	pub fn info() -> ProviderInfo {
		ProviderInfo::new("twitter", "Twitter", "Log in with Twitter")
	}

	fn client(&self) -> OAuth2Client {
		self.core.client(
			OAuthClientConfig::new(
				"https://twitter.com/i/oauth2/authorize",
				"https://api.twitter.com/2/oauth2/token",
				"https://api.twitter.com/2/users/me",
			)
			.with_scopes(["users.read", "tweet.read"])
			.with_pkce()
			.with_token_auth(TokenAuthMethod::BasicAuth)
			.with_userinfo_param("user.fields", "profile_image_url"),
		)
	}
}

#[async_trait]
impl SocialProvider for TwitterProvider {
	fn core(&self) -> &ProviderCore {
		&self.core
	}

	async fn redirect_to_provider(&self, session: &mut Session) -> Result<Redirect, SocialiteError> {
		self.core.redirect(session, &self.client())
	}

	async fn handle_provider_callback(
		&self,
		session: &mut Session,
		query: &QueryParams,
	) -> Result<RemoteUser, SocialiteError> {
		let (token, profile) = self.core.callback(session, &self.client(), query).await?;
		let id = profile_str(&profile, "/data/id").ok_or_else(|| {
			SocialiteError::InvalidResponse("Twitter profile has no id".to_string())
		})?;

		Ok(RemoteUser {
			name: profile_str(&profile, "/data/name"),
			nickname: profile_str(&profile, "/data/username"),
			avatar: profile_str(&profile, "/data/profile_image_url"),
			..RemoteUser::from_token(id, token, profile)
		})
	}

	fn settings_fields(&self) -> Vec<SettingsField> {
		let code = self.driver();
		vec![
			SettingsField::new(code, "status", "Status", FieldType::Switch)
				.with_default("1")
				.with_tab("Twitter"),
			SettingsField::new(code, "identifier", "API Key", FieldType::Text).with_tab("Twitter"),
			SettingsField::new(code, "secret", "API Secret", FieldType::Text).with_tab("Twitter"),
		]
	}
}
