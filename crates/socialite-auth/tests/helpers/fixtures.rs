//! Shared fixtures: a generic test provider and a wired-up manager

use async_trait::async_trait;
use socialite_auth::account_link::InMemoryAccountLinkStore;
use socialite_auth::client::{OAuthClientConfig, QueryParams};
use socialite_auth::error::SocialiteError;
use socialite_auth::manager::ProviderManager;
use socialite_auth::provider::{
	FieldType, ProviderContext, ProviderCore, ProviderInfo, RemoteUser, SettingsField,
	SocialProvider,
};
use socialite_auth::registry::ProviderRegistry;
use socialite_auth::response::Redirect;
use socialite_auth::users::{InMemoryUserProvider, UserProvider};
use socialite_conf::{ProviderSettings, SocialiteSettings};
use socialite_core::{MessageStorage, Session, SessionStorage};
use std::sync::Arc;
use url::Url;

use super::mock_server::MockOAuthServer;

/// Adapter for the mock server; endpoints come from settings
pub struct TestProvider {
	core: ProviderCore,
}

impl TestProvider {
	pub const IDENTIFIER: &'static str = "tests::TestProvider";

	pub fn new(context: ProviderContext) -> Self {
		Self {
			core: ProviderCore::new(context, "Test"),
		}
	}

	pub fn info() -> ProviderInfo {
		ProviderInfo::new("test", "Test", "Log in with the test provider")
	}
}

#[async_trait]
impl SocialProvider for TestProvider {
	fn core(&self) -> &ProviderCore {
		&self.core
	}

	async fn redirect_to_provider(&self, session: &mut Session) -> Result<Redirect, SocialiteError> {
		let client = self
			.core
			.client(OAuthClientConfig::new("", "", "").with_scopes(["profile"]));
		self.core.redirect(session, &client)
	}

	async fn handle_provider_callback(
		&self,
		session: &mut Session,
		query: &QueryParams,
	) -> Result<RemoteUser, SocialiteError> {
		let client = self.core.client(OAuthClientConfig::new("", "", ""));
		let (token, profile) = self.core.callback(session, &client, query).await?;
		let id = profile["id"]
			.as_str()
			.ok_or_else(|| SocialiteError::InvalidResponse("profile has no id".to_string()))?
			.to_string();

		Ok(RemoteUser {
			name: profile["name"].as_str().map(str::to_string),
			email: profile["email"].as_str().map(str::to_string),
			..RemoteUser::from_token(id, token, profile)
		})
	}

	fn settings_fields(&self) -> Vec<SettingsField> {
		vec![SettingsField::new(self.driver(), "status", "Status", FieldType::Switch)]
	}
}

/// Settings with the test provider enabled against `server`
pub fn test_settings(server: &MockOAuthServer) -> SocialiteSettings {
	let mut provider = ProviderSettings::enabled("test-client", "test-secret");
	provider.authorize_url = Some(server.authorization_url());
	provider.token_url = Some(server.token_url());
	provider.userinfo_url = Some(server.userinfo_url());

	SocialiteSettings::default().with_provider("test", provider)
}

/// Built-in providers plus the test provider
pub fn test_registry() -> ProviderRegistry {
	let registry = ProviderRegistry::with_builtin_providers();
	registry.register_implementation(TestProvider::IDENTIFIER, |context| {
		Arc::new(TestProvider::new(context))
	});
	registry.register(TestProvider::IDENTIFIER, TestProvider::info());
	registry
}

/// A manager over in-memory stores; the stores are returned for inspection
pub fn login_manager(
	settings: SocialiteSettings,
) -> (ProviderManager, InMemoryAccountLinkStore, InMemoryUserProvider) {
	let users = InMemoryUserProvider::new("customers").with_default_group(Some(1));
	let (manager, links) = login_manager_with(settings, Arc::new(users.clone()));
	(manager, links, users)
}

/// A manager over an in-memory link store and the given users
pub fn login_manager_with(
	settings: SocialiteSettings,
	users: Arc<dyn UserProvider>,
) -> (ProviderManager, InMemoryAccountLinkStore) {
	let links = InMemoryAccountLinkStore::new();
	let manager = ProviderManager::new(
		settings,
		Arc::new(test_registry()),
		Arc::new(links.clone()),
		users,
	)
	.unwrap();
	(manager, links)
}

/// Run the `auth` entry point and return the state sent to the provider
pub async fn start_auth(
	manager: &ProviderManager,
	session: &mut Session,
	code: &str,
	query: &QueryParams,
) -> String {
	let redirect = manager
		.run_entry_point(session, code, "auth", query)
		.await
		.unwrap();
	let url = Url::parse(redirect.location()).unwrap();
	url.query_pairs()
		.find(|(key, _)| key == "state")
		.map(|(_, value)| value.into_owned())
		.unwrap()
}

/// Drain the flashed message texts
pub fn flash_texts(session: &mut Session) -> Vec<String> {
	SessionStorage::new(session)
		.get_all()
		.into_iter()
		.map(|message| message.text)
		.collect()
}
