//! Google sign-in (OAuth 2.0 + OpenID userinfo)

use async_trait::async_trait;
use socialite_core::Session;

use super::profile_str;
use crate::client::{OAuth2Client, OAuthClientConfig, QueryParams};
use crate::error::SocialiteError;
use crate::provider::{
	FieldType, ProviderContext, ProviderCore, ProviderInfo, RemoteUser, SettingsField,
	SocialProvider,
};
use crate::response::Redirect;

/// Google adapter
pub struct GoogleProvider {
	core: ProviderCore,
}

impl GoogleProvider {
	pub const IDENTIFIER: &'static str = "socialite::providers::Google";

	pub fn new(context: ProviderContext) -> Self {
		Self {
			core: ProviderCore::new(context, "Google"),
		}
	}

	pub fn info() -> ProviderInfo {
		ProviderInfo::new("google", "Google", "Log in with Google")
	}

	fn client(&self) -> OAuth2Client {
		self.core.client(
			OAuthClientConfig::new(
				"https://accounts.google.com/o/oauth2/v2/auth",
				"https://oauth2.googleapis.com/token",
				"https://openidconnect.googleapis.com/v1/userinfo",
			)
			.with_scopes(["openid", "profile", "email"]),
		)
	}
}

#[async_trait]
impl SocialProvider for GoogleProvider {
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
		let id = profile_str(&profile, "/sub")
			.or_else(|| profile_str(&profile, "/id"))
			.ok_or_else(|| {
				SocialiteError::InvalidResponse("Google profile has no subject".to_string())
			})?;

		Ok(RemoteUser {
			name: profile_str(&profile, "/name"),
			nickname: profile_str(&profile, "/given_name"),
			email: profile_str(&profile, "/email"),
			avatar: profile_str(&profile, "/picture"),
			..RemoteUser::from_token(id, token, profile)
		})
	}

	fn settings_fields(&self) -> Vec<SettingsField> {
		let code = self.driver();
		vec![
			SettingsField::new(code, "status", "Status", FieldType::Switch)
				.with_default("1")
				.with_tab("Google"),
			SettingsField::new(code, "app_name", "Application Name", FieldType::Text)
				.with_default("Social Login")
				.with_tab("Google"),
			SettingsField::new(code, "client_id", "Client ID", FieldType::Text).with_tab("Google"),
			SettingsField::new(code, "client_secret", "Client Secret", FieldType::Text)
				.with_tab("Google"),
		]
	}
}
