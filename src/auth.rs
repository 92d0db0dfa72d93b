//! Provider registry, adapters, account links and the login orchestrator.

#[cfg(feature = "auth")]
pub use socialite_auth::*;
