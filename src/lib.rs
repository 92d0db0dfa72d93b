//! # Socialite
//!
//! Social login for Rust web applications. Users sign in with Facebook,
//! Google or Twitter; the remote identity is linked to a local user, who is
//! found by email or registered on first login.
//!
//! ## Feature Flags
//!
//! - `standard` (default) - `core`, `conf` and `auth`
//! - `core` - Sessions, session stores and flash messages
//! - `conf` - Settings from TOML and environment variables
//! - `auth` - Registry, adapters, orchestrator and in-memory stores
//! - `database` - SQLite account link store
//! - `full` - Everything
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! # #[cfg(feature = "auth")]
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! use socialite::prelude::*;
//! use std::sync::Arc;
//!
//! let settings = SocialiteSettings::from_file("socialite.toml")?.with_env_overrides(std::env::vars())?;
//! let manager = ProviderManager::new(
//!     settings,
//!     Arc::new(ProviderRegistry::with_builtin_providers()),
//!     Arc::new(InMemoryAccountLinkStore::new()),
//!     Arc::new(InMemoryUserProvider::new("customers")),
//! )?;
//! let handler = SocialiteHandler::new(Arc::new(manager), Arc::new(InMemorySessionStore::new()));
//!
//! // Mount `handler.handle(&request)` on `/socialite/{provider}/{action}`
//! # let _ = handler;
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "auth")]
pub mod auth;
#[cfg(feature = "conf")]
pub mod conf;
#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "core")]
pub use socialite_core::{InMemorySessionStore, Message, Session, SessionStore};

#[cfg(feature = "conf")]
pub use socialite_conf::{ProviderSettings, SettingsError, SocialiteSettings};

#[cfg(feature = "auth")]
pub use socialite_auth::{
	AccountLink, AccountLinkStore, Hooks, InMemoryAccountLinkStore, InMemoryUserProvider,
	ProviderManager, ProviderRegistry, Redirect, SocialProvider, SocialiteError,
	SocialiteHandler, SocialiteListener, UserProvider,
};

#[cfg(feature = "database")]
pub use socialite_auth::SqliteAccountLinkStore;

/// Everything needed to wire social login into an application
pub mod prelude {
	#[cfg(feature = "core")]
	pub use socialite_core::{InMemorySessionStore, Session, SessionStore};

	#[cfg(feature = "conf")]
	pub use socialite_conf::SocialiteSettings;

	#[cfg(feature = "auth")]
	pub use socialite_auth::prelude::*;
}
