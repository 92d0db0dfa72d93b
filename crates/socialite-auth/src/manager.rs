//! Login orchestrator
//!
//! Drives the two legs of a social login:
//!
//! 1. `auth`: remember where to send the browser afterwards, then redirect
//!    it to the provider.
//! 2. `callback`: complete the handshake, record the account link, then find
//!    or register the local user and log them in.
//!
//! Between the two legs, and between the callback and a suspended email
//! confirmation, all state lives in the session.

use serde::{Deserialize, Serialize};
use socialite_conf::SocialiteSettings;
use socialite_core::{Message, MessageStorage, Session, SessionStorage};
use std::collections::BTreeMap;
use std::sync::Arc;
use url::Url;

use crate::account_link::{AccountLink, AccountLinkStore};
use crate::client::QueryParams;
use crate::error::SocialiteError;
use crate::hooks::Hooks;
use crate::provider::{ProviderContext, ProviderInfo, RemoteUser, SettingsField, SocialProvider};
use crate::registry::{ProviderRegistry, derive_code};
use crate::response::Redirect;
use crate::routes::EntryPointRoutes;
use crate::users::{GENERATED_PASSWORD_LENGTH, LocalUser, NewUser, UserProvider, random_password};

/// Session key holding `[success_url, error_url]`
pub const REDIRECT_SESSION_KEY: &str = "socialite.redirect";

/// Session key holding the [`PendingLogin`]
pub const PROVIDER_SESSION_KEY: &str = "socialite.provider";

/// First name given to registered users whose provider shared no name
pub const BLANK_NAME: &str = "blank name";

/// A completed handshake waiting for the local user to be resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingLogin {
	/// Account link row ID
	pub id: i64,
	pub user: RemoteUser,
}

/// Runs social logins
pub struct ProviderManager {
	settings: Arc<SocialiteSettings>,
	registry: Arc<ProviderRegistry>,
	links: Arc<dyn AccountLinkStore>,
	users: Arc<dyn UserProvider>,
	hooks: Hooks,
	routes: EntryPointRoutes,
}

impl ProviderManager {
	pub fn new(
		settings: SocialiteSettings,
		registry: Arc<ProviderRegistry>,
		links: Arc<dyn AccountLinkStore>,
		users: Arc<dyn UserProvider>,
	) -> Result<Self, SocialiteError> {
		let routes = EntryPointRoutes::from_settings(&settings)?;
		Ok(Self {
			settings: Arc::new(settings),
			registry,
			links,
			users,
			hooks: Hooks::new(),
			routes,
		})
	}

	pub fn with_hooks(mut self, hooks: Hooks) -> Self {
		self.hooks = hooks;
		self
	}

	pub fn hooks_mut(&mut self) -> &mut Hooks {
		&mut self.hooks
	}

	pub fn settings(&self) -> &SocialiteSettings {
		&self.settings
	}

	pub fn registry(&self) -> &ProviderRegistry {
		&self.registry
	}

	pub fn routes(&self) -> &EntryPointRoutes {
		&self.routes
	}

	/// User type recorded on new account links
	pub fn resolve_user_type(&self) -> String {
		self.hooks.user_type(&self.settings.default_user_type)
	}

	/// Build the adapter registered under `identifier`
	pub fn make_provider(
		&self,
		identifier: &str,
		info: Option<ProviderInfo>,
	) -> Result<Arc<dyn SocialProvider>, SocialiteError> {
		let code = info
			.or_else(|| self.registry.find(identifier))
			.map(|info| info.code)
			.filter(|code| !code.is_empty())
			.unwrap_or_else(|| derive_code(identifier));
		let settings = self.settings.provider(&code).cloned().unwrap_or_default();

		self.registry.instantiate(
			identifier,
			ProviderContext::new(code, settings, self.routes.clone()),
		)
	}

	/// The adapter for a provider code, if one is registered
	pub fn provider(&self, code: &str) -> Result<Option<Arc<dyn SocialProvider>>, SocialiteError> {
		match self.registry.resolve(code) {
			Some(identifier) => self.make_provider(&identifier, None).map(Some),
			None => Ok(None),
		}
	}

	/// `auth` entry point URLs of the enabled providers, keyed by code
	pub fn list_provider_links(&self) -> Result<BTreeMap<String, String>, SocialiteError> {
		let mut links = BTreeMap::new();
		for (identifier, info) in self.registry.list() {
			let code = info.code.clone();
			let provider = self.make_provider(&identifier, Some(info))?;
			if provider.is_enabled() {
				links.insert(code, provider.make_entry_point_url("auth"));
			}
		}
		Ok(links)
	}

	/// Settings form fields of every registered provider, keyed by code
	pub fn provider_settings_fields(
		&self,
	) -> Result<BTreeMap<String, Vec<SettingsField>>, SocialiteError> {
		let mut fields = BTreeMap::new();
		for (identifier, info) in self.registry.list() {
			let code = info.code.clone();
			let provider = self.make_provider(&identifier, Some(info))?;
			fields.insert(code, provider.settings_fields());
		}
		Ok(fields)
	}

	/// The pending login stored in `session`, if readable
	pub fn pending_login(session: &Session) -> Option<PendingLogin> {
		session.get_as(PROVIDER_SESSION_KEY)
	}

	/// Handle a request to `/{prefix}/{code}/{action}`
	///
	/// Failures are flashed to the session and answered with a redirect to
	/// the error URL. Only [`SocialiteError::ProviderNotRegistered`], a
	/// wiring mistake of the host, is returned as an error.
	pub async fn run_entry_point(
		&self,
		session: &mut Session,
		code: &str,
		action: &str,
		query: &QueryParams,
	) -> Result<Redirect, SocialiteError> {
		let (success_url, error_url) = self.redirect_urls(session, action, query);

		match self
			.dispatch(session, code, action, query, &success_url, &error_url)
			.await
		{
			Ok(redirect) => Ok(redirect),
			Err(error @ SocialiteError::ProviderNotRegistered(_)) => {
				tracing::error!(provider = code, %error, "socialite provider has no implementation");
				Err(error)
			}
			Err(error) => {
				tracing::warn!(provider = code, action, %error, "social login failed");
				SessionStorage::new(session).add(Message::error(error.to_string()));
				Ok(Redirect::to(self.site_url(&error_url)))
			}
		}
	}

	async fn dispatch(
		&self,
		session: &mut Session,
		code: &str,
		action: &str,
		query: &QueryParams,
		success_url: &str,
		error_url: &str,
	) -> Result<Redirect, SocialiteError> {
		let identifier = self
			.registry
			.resolve(code)
			.ok_or_else(|| SocialiteError::UnknownProvider(code.to_string()))?;
		let provider = self.make_provider(&identifier, None)?;

		match action {
			"auth" => {
				session.put(REDIRECT_SESSION_KEY, &(success_url, error_url))?;
				self.hooks.before_redirect(provider.as_ref(), session).await;
				tracing::info!(provider = code, "redirecting to provider");
				provider.redirect_to_provider(session).await
			}
			"callback" => {
				if let Some(redirect) = self
					.handle_provider_callback(provider.as_ref(), session, query, error_url)
					.await?
				{
					return Ok(redirect);
				}

				let redirect = self.complete_callback(session).await?;
				forget_pending(session);
				Ok(redirect.unwrap_or_else(|| Redirect::to(self.site_url(success_url))))
			}
			other => Err(SocialiteError::UnknownAction(other.to_string())),
		}
	}

	/// Complete the handshake and record the account link
	///
	/// Returns a redirect when the flow stops here: on failure (after the
	/// provider has reported it) or to ask the user for an email address.
	async fn handle_provider_callback(
		&self,
		provider: &dyn SocialProvider,
		session: &mut Session,
		query: &QueryParams,
		error_url: &str,
	) -> Result<Option<Redirect>, SocialiteError> {
		match self.link_remote_user(provider, session, query).await {
			Ok(redirect) => Ok(redirect),
			Err(error @ SocialiteError::ProviderNotRegistered(_)) => Err(error),
			Err(error) => {
				provider.handle_provider_exception(&error, session);
				Ok(Some(Redirect::to(self.site_url(error_url))))
			}
		}
	}

	async fn link_remote_user(
		&self,
		provider: &dyn SocialProvider,
		session: &mut Session,
		query: &QueryParams,
	) -> Result<Option<Redirect>, SocialiteError> {
		let remote = provider.handle_provider_callback(session, query).await?;

		let user_type = self.resolve_user_type();
		let mut link = self
			.links
			.first_or_new(&user_type, provider.driver(), &remote.id)
			.await?;
		link.token = remote.token.clone();
		self.links.save(&mut link).await?;
		let id = link
			.id
			.ok_or_else(|| SocialiteError::Storage("saved account link has no id".to_string()))?;

		let confirm_email = provider.should_confirm_email(&remote);
		tracing::info!(
			provider = provider.driver(),
			link_id = id,
			confirm_email,
			"provider callback accepted"
		);
		session.put(PROVIDER_SESSION_KEY, &PendingLogin { id, user: remote })?;

		if confirm_email {
			return Ok(Some(Redirect::to(
				self.site_url(&self.settings.confirm_email_url),
			)));
		}
		Ok(None)
	}

	/// Resolve the local user for the pending login and log them in
	///
	/// Safe to call again, e.g. after the user confirmed an email address.
	/// The pending login is cleared once the user is resolved, so a repeated
	/// call does nothing. Returns `Ok(None)` without doing anything when no readable pending
	/// login is in the session, when its account link is gone, or when a
	/// `complete_callback` listener takes over. Returns a redirect when a
	/// `before_login` listener replaces the login.
	pub async fn complete_callback(
		&self,
		session: &mut Session,
	) -> Result<Option<Redirect>, SocialiteError> {
		let Some(pending) = Self::pending_login(session) else {
			tracing::debug!("no pending social login in session");
			return Ok(None);
		};
		let Some(mut link) = self.links.find(pending.id).await? else {
			tracing::warn!(link_id = pending.id, "pending social login has no account link");
			return Ok(None);
		};
		let remote = pending.user;

		if self.hooks.complete_callback(&remote, &link).await {
			tracing::debug!(link_id = pending.id, "social login taken over by listener");
			return Ok(None);
		}

		let user = self.find_or_register_user(&remote, &link).await?;
		link.apply_user(&user);
		self.links.save(&mut link).await?;

		if let Some(redirect) = self.hooks.before_login(&remote, &user, session).await {
			forget_pending(session);
			return Ok(Some(redirect));
		}

		self.users.login(session, &user, true).await?;
		forget_pending(session);
		self.hooks.login(&user, session).await;
		tracing::info!(
			provider = %link.provider,
			user_id = user.id,
			"social login completed"
		);

		Ok(None)
	}

	async fn find_or_register_user(
		&self,
		remote: &RemoteUser,
		link: &AccountLink,
	) -> Result<LocalUser, SocialiteError> {
		if let Some(email) = remote.email() {
			if let Some(user) = self.users.find_by_email(email).await? {
				return Ok(user);
			}
		}

		if let Some(user) = self.hooks.register(remote, link).await? {
			return Ok(user);
		}

		let first_name = remote
			.name
			.clone()
			.filter(|name| !name.trim().is_empty())
			.unwrap_or_else(|| BLANK_NAME.to_string());
		let group_id = self.users.default_group_id().await?;

		self.users
			.register(NewUser {
				first_name,
				email: remote.email().map(str::to_string),
				password: random_password(GENERATED_PASSWORD_LENGTH),
				group_id,
				is_active: true,
			})
			.await
	}

	/// Stored destinations, or the configured defaults
	///
	/// Only the `auth` leg reads the `success`/`error` query parameters. On the
	/// callback `error` carries the provider's error code.
	fn redirect_urls(
		&self,
		session: &Session,
		action: &str,
		query: &QueryParams,
	) -> (String, String) {
		let (mut success_url, mut error_url) = session
			.get_as::<(String, String)>(REDIRECT_SESSION_KEY)
			.unwrap_or_else(|| {
				(
					self.settings.success_url.clone(),
					self.settings.error_url.clone(),
				)
			});

		if action != "auth" {
			return (success_url, error_url);
		}

		for (key, target) in [("success", &mut success_url), ("error", &mut error_url)] {
			if let Some(value) = query.get(key) {
				if self.settings.is_safe_redirect(value) {
					*target = value.to_string();
				} else {
					tracing::warn!(parameter = key, url = value, "ignoring off-site redirect");
				}
			}
		}

		(success_url, error_url)
	}

	fn site_url(&self, target: &str) -> String {
		if Url::parse(target).is_ok() {
			target.to_string()
		} else {
			self.settings.absolute_url(target)
		}
	}
}

fn forget_pending(session: &mut Session) {
	session.forget(&[REDIRECT_SESSION_KEY, PROVIDER_SESSION_KEY]);
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::account_link::InMemoryAccountLinkStore;
	use crate::users::InMemoryUserProvider;
	use rstest::{fixture, rstest};

	#[fixture]
	fn manager() -> ProviderManager {
		ProviderManager::new(
			SocialiteSettings::default(),
			Arc::new(ProviderRegistry::with_builtin_providers()),
			Arc::new(InMemoryAccountLinkStore::new()),
			Arc::new(InMemoryUserProvider::new("customers")),
		)
		.unwrap()
	}

	#[rstest]
	fn test_redirect_urls_default_to_settings(manager: ProviderManager) {
		let session = Session::new();

		let urls = manager.redirect_urls(&session, "auth", &QueryParams::new());

		assert_eq!(urls, ("/".to_string(), "/login".to_string()));
	}

	#[rstest]
	fn test_stored_redirect_urls_are_overridden_by_query(manager: ProviderManager) {
		// Arrange
		let mut session = Session::new();
		session
			.put(REDIRECT_SESSION_KEY, &("/saved", "/saved-error"))
			.unwrap();
		let query = QueryParams::new().with("success", "/fresh");

		// Act
		let urls = manager.redirect_urls(&session, "auth", &query);

		// Assert
		assert_eq!(urls, ("/fresh".to_string(), "/saved-error".to_string()));
	}

	#[rstest]
	fn test_callback_keeps_stored_redirect_urls(manager: ProviderManager) {
		// Arrange
		let mut session = Session::new();
		session
			.put(REDIRECT_SESSION_KEY, &("/saved", "/saved-error"))
			.unwrap();
		let query = QueryParams::new()
			.with("error", "access_denied")
			.with("success", "/elsewhere");

		// Act
		let urls = manager.redirect_urls(&session, "callback", &query);

		// Assert
		assert_eq!(urls, ("/saved".to_string(), "/saved-error".to_string()));
	}

	#[rstest]
	#[case("/account", "http://localhost/account")]
	#[case("account", "http://localhost/account")]
	#[case("https://shop.example/done", "https://shop.example/done")]
	fn test_site_url(manager: ProviderManager, #[case] target: &str, #[case] expected: &str) {
		assert_eq!(manager.site_url(target), expected);
	}

	#[rstest]
	fn test_user_type_defaults_to_settings(mut manager: ProviderManager) {
		assert_eq!(manager.resolve_user_type(), "customers");

		manager
			.hooks_mut()
			.resolve_user_type(|| Some("staff".to_string()));

		assert_eq!(manager.resolve_user_type(), "staff");
	}

	#[rstest]
	fn test_pending_login_round_trips_through_session() {
		let mut session = Session::new();
		let pending = PendingLogin {
			id: 3,
			user: RemoteUser {
				id: "abc".to_string(),
				..Default::default()
			},
		};

		session.put(PROVIDER_SESSION_KEY, &pending).unwrap();

		assert_eq!(ProviderManager::pending_login(&session), Some(pending));
	}
}
