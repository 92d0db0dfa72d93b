//! Extension points of the login flow
//!
//! Listeners are consulted in registration order. For hooks that can answer
//! (`complete_callback`, `register`, `before_login`) the first answer wins and
//! later listeners are not called.

use async_trait::async_trait;
use socialite_core::Session;
use std::fmt;
use std::sync::Arc;

use crate::account_link::AccountLink;
use crate::error::SocialiteError;
use crate::provider::{RemoteUser, SocialProvider};
use crate::response::Redirect;
use crate::users::LocalUser;

/// Observer of the login flow; every method defaults to "no opinion"
#[async_trait]
pub trait SocialiteListener: Send + Sync {
	/// The browser is about to be sent to the provider
	async fn before_redirect(&self, _provider: &dyn SocialProvider, _session: &mut Session) {}

	/// Return `true` to take over the rest of the login; no local user is
	/// resolved and nobody is logged in
	async fn complete_callback(&self, _remote: &RemoteUser, _link: &AccountLink) -> bool {
		false
	}

	/// Supply the local user for a remote identity with no matching email
	async fn register(
		&self,
		_remote: &RemoteUser,
		_link: &AccountLink,
	) -> Result<Option<LocalUser>, SocialiteError> {
		Ok(None)
	}

	/// Return a redirect to replace the built-in login
	async fn before_login(
		&self,
		_remote: &RemoteUser,
		_user: &LocalUser,
		_session: &mut Session,
	) -> Option<Redirect> {
		None
	}

	/// `user` has been logged in
	async fn login(&self, _user: &LocalUser, _session: &mut Session) {}
}

/// Picks the user type for new account links; `None` defers to the next one
pub type UserTypeResolver = Arc<dyn Fn() -> Option<String> + Send + Sync>;

/// Registered listeners and user type resolvers
#[derive(Clone, Default)]
pub struct Hooks {
	listeners: Vec<Arc<dyn SocialiteListener>>,
	user_type_resolvers: Vec<UserTypeResolver>,
}

impl Hooks {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn listen(&mut self, listener: Arc<dyn SocialiteListener>) -> &mut Self {
		self.listeners.push(listener);
		self
	}

	pub fn resolve_user_type<F>(&mut self, resolver: F) -> &mut Self
	where
		F: Fn() -> Option<String> + Send + Sync + 'static,
	{
		self.user_type_resolvers.push(Arc::new(resolver));
		self
	}

	/// First non-empty answer of the resolvers, else `default`
	///
	/// # Examples
	///
	/// ```
	/// use socialite_auth::hooks::Hooks;
	///
	/// let mut hooks = Hooks::new();
	/// assert_eq!(hooks.user_type("customers"), "customers");
	///
	/// hooks.resolve_user_type(|| Some(String::new()));
	/// hooks.resolve_user_type(|| Some("admins".to_string()));
	/// assert_eq!(hooks.user_type("customers"), "admins");
	/// ```
	pub fn user_type(&self, default: &str) -> String {
		self.user_type_resolvers
			.iter()
			.filter_map(|resolve| resolve())
			.find(|user_type| !user_type.is_empty())
			.unwrap_or_else(|| default.to_string())
	}

	pub(crate) async fn before_redirect(&self, provider: &dyn SocialProvider, session: &mut Session) {
		for listener in &self.listeners {
			listener.before_redirect(provider, session).await;
		}
	}

	pub(crate) async fn complete_callback(&self, remote: &RemoteUser, link: &AccountLink) -> bool {
		for listener in &self.listeners {
			if listener.complete_callback(remote, link).await {
				return true;
			}
		}
		false
	}

	pub(crate) async fn register(
		&self,
		remote: &RemoteUser,
		link: &AccountLink,
	) -> Result<Option<LocalUser>, SocialiteError> {
		for listener in &self.listeners {
			if let Some(user) = listener.register(remote, link).await? {
				return Ok(Some(user));
			}
		}
		Ok(None)
	}

	pub(crate) async fn before_login(
		&self,
		remote: &RemoteUser,
		user: &LocalUser,
		session: &mut Session,
	) -> Option<Redirect> {
		for listener in &self.listeners {
			if let Some(redirect) = listener.before_login(remote, user, session).await {
				return Some(redirect);
			}
		}
		None
	}

	pub(crate) async fn login(&self, user: &LocalUser, session: &mut Session) {
		for listener in &self.listeners {
			listener.login(user, session).await;
		}
	}
}

impl fmt::Debug for Hooks {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Hooks")
			.field("listeners", &self.listeners.len())
			.field("user_type_resolvers", &self.user_type_resolvers.len())
			.finish()
	}
}
