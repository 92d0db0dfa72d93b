//! # Socialite Auth
//!
//! Social login for web applications: sign in with Facebook, Google or
//! Twitter, or any provider registered by the host.
//!
//! ## Pieces
//!
//! - [`registry::ProviderRegistry`]: maps provider codes to adapter
//!   implementations, with deferred registration callbacks
//! - [`provider::SocialProvider`]: the adapter contract; [`providers`] holds
//!   the built-in adapters
//! - [`client::OAuth2Client`]: authorization code flow with session-held
//!   state and optional PKCE
//! - [`account_link::AccountLinkStore`]: remote identities linked to local
//!   users (in memory, or SQLite with the `database` feature)
//! - [`manager::ProviderManager`]: runs the `auth` and `callback` entry
//!   points and logs the user in
//! - [`handler::SocialiteHandler`]: serves the entry points over `http`
//!
//! ## Example
//!
//! ```rust
//! use socialite_auth::prelude::*;
//! use socialite_conf::SocialiteSettings;
//! use socialite_core::Session;
//! use std::sync::Arc;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let settings = SocialiteSettings::default();
//! let manager = ProviderManager::new(
//!     settings,
//!     Arc::new(ProviderRegistry::with_builtin_providers()),
//!     Arc::new(InMemoryAccountLinkStore::new()),
//!     Arc::new(InMemoryUserProvider::new("customers")),
//! )
//! .unwrap();
//!
//! // Disabled providers are not offered
//! assert!(manager.list_provider_links().unwrap().is_empty());
//!
//! let mut session = Session::new();
//! let redirect = manager
//!     .run_entry_point(&mut session, "myspace", "auth", &QueryParams::new())
//!     .await
//!     .unwrap();
//! assert_eq!(redirect.location(), "http://localhost/login");
//! # });
//! ```

pub mod account_link;
pub mod client;
pub mod error;
pub mod handler;
pub mod hasher;
pub mod hooks;
pub mod manager;
pub mod provider;
pub mod providers;
pub mod registry;
pub mod response;
pub mod routes;
pub mod users;

pub use account_link::{AccountLink, AccountLinkStore, InMemoryAccountLinkStore};
pub use client::{OAuth2Client, OAuthClientConfig, QueryParams, TokenResponse};
pub use error::SocialiteError;
pub use handler::SocialiteHandler;
pub use hooks::{Hooks, SocialiteListener};
pub use manager::{PendingLogin, ProviderManager};
pub use provider::{ProviderContext, ProviderCore, ProviderInfo, RemoteUser, SocialProvider};
pub use registry::ProviderRegistry;
pub use response::Redirect;
pub use routes::EntryPointRoutes;
pub use users::{InMemoryUserProvider, LocalUser, NewUser, UserProvider};

#[cfg(feature = "database")]
pub use account_link::SqliteAccountLinkStore;

/// Result alias for social login operations
pub type Result<T> = std::result::Result<T, SocialiteError>;

/// Commonly used types
pub mod prelude {
	pub use crate::account_link::{AccountLink, AccountLinkStore, InMemoryAccountLinkStore};
	pub use crate::client::QueryParams;
	pub use crate::error::SocialiteError;
	pub use crate::handler::SocialiteHandler;
	pub use crate::hooks::{Hooks, SocialiteListener};
	pub use crate::manager::ProviderManager;
	pub use crate::provider::{ProviderInfo, RemoteUser, SocialProvider};
	pub use crate::registry::ProviderRegistry;
	pub use crate::response::Redirect;
	pub use crate::users::{InMemoryUserProvider, LocalUser, UserProvider};
}
