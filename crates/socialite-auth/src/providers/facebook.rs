//! Facebook Login (Graph API)

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

const GRAPH_VERSION: &str = "v18.0";

/// Facebook adapter
///
/// Requests the `email` permission; Facebook joins scopes with commas.
pub struct FacebookProvider {
	core: ProviderCore,
}

impl FacebookProvider {
	pub const IDENTIFIER: &'static str = "socialite::providers::Facebook";

	pub fn new(context: ProviderContext) -> Self {
		Self {
			core: ProviderCore::new(context, "Facebook"),
		}
	}

	/// Registration metadata
	pub fn info() -> ProviderInfo {
		ProviderInfo::new("facebook", "Facebook", "Log in with Facebook")
	}

	fn client(&self) -> OAuth2Client {
		self.core.client(
			OAuthClientConfig::new(
				format!("https://www.facebook.com/{}/dialog/oauth", GRAPH_VERSION),
				format!("https://graph.facebook.com/{}/oauth/access_token", GRAPH_VERSION),
				format!("https://graph.facebook.com/{}/me", GRAPH_VERSION),
			)
			.with_scopes(["email"])
			.with_scope_separator(",")
			.with_userinfo_param("fields", "id,name,email,picture.type(large)"),
		)
	}
}

#[async_trait]
impl SocialProvider for FacebookProvider {
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
		let id = profile_str(&profile, "/id").ok_or_else(|| {
			SocialiteError::InvalidResponse("Facebook profile has no id".to_string())
		})?;

		let avatar = profile_str(&profile, "/picture/data/url").or_else(|| {
			Some(format!(
				"https://graph.facebook.com/{}/{}/picture?type=normal",
				GRAPH_VERSION, id
			))
		});

		Ok(RemoteUser {
			name: profile_str(&profile, "/name"),
			email: profile_str(&profile, "/email"),
			avatar,
			..RemoteUser::from_token(id, token, profile)
		})
	}

	fn settings_fields(&self) -> Vec<SettingsField> {
		let code = self.driver();
		vec![
			SettingsField::new(code, "status", "Status", FieldType::Switch)
				.with_default("1")
				.with_tab("Facebook"),
			SettingsField::new(code, "client_id", "App ID", FieldType::Text).with_tab("Facebook"),
			SettingsField::new(code, "client_secret", "App Secret", FieldType::Text)
				.with_tab("Facebook"),
		]
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::routes::EntryPointRoutes;
	use socialite_conf::ProviderSettings;

	fn provider() -> FacebookProvider {
		let routes = EntryPointRoutes::new("https://shop.example", "socialite").unwrap();
		FacebookProvider::new(ProviderContext::new(
			"facebook",
			ProviderSettings::enabled("app-id", "app-secret"),
			routes,
		))
	}

	#[tokio::test]
	async fn test_redirect_requests_email_scope() {
		let mut session = Session::new();

		let redirect = provider().redirect_to_provider(&mut session).await.unwrap();

		let url = url::Url::parse(redirect.location()).unwrap();
		assert_eq!(url.host_str(), Some("www.facebook.com"));
		let pairs: std::collections::HashMap<_, _> = url.query_pairs().into_owned().collect();
		assert_eq!(pairs["scope"], "email");
		assert_eq!(pairs["client_id"], "app-id");
		assert_eq!(
			pairs["redirect_uri"],
			"https://shop.example/socialite/facebook/callback"
		);
		assert!(!pairs.contains_key("code_challenge"));
	}

	#[test]
	fn test_settings_fields() {
		let fields = provider().settings_fields();

		let labels: Vec<_> = fields.iter().map(|f| f.label.as_str()).collect();
		assert_eq!(labels, vec!["Status", "App ID", "App Secret"]);
		assert_eq!(fields[1].name, "providers[facebook][client_id]");
	}
}
