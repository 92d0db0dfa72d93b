//! CSRF state bookkeeping for the OAuth redirect
//!
//! The state, the PKCE verifier and the provider code are parked in the
//! session under [`OAUTH_STATE_SESSION_KEY`] when the browser leaves for the
//! provider, and consumed when it comes back.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use rand::distributions::Alphanumeric;
use serde::{Deserialize, Serialize};
use socialite_core::Session;

use crate::error::SocialiteError;

/// Session key holding the pending [`StateData`]
pub const OAUTH_STATE_SESSION_KEY: &str = "socialite.oauth_state";

const STATE_LENGTH: usize = 40;

/// Generate a random `state` parameter
pub fn generate_state() -> String {
	rand::thread_rng()
		.sample_iter(&Alphanumeric)
		.take(STATE_LENGTH)
		.map(char::from)
		.collect()
}

/// Data stored for a pending authorization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateData {
	/// Provider code the state was issued for
	pub provider: String,
	/// OAuth2 state parameter
	pub state: String,
	/// PKCE code verifier (optional)
	pub code_verifier: Option<String>,
	/// Expiration timestamp
	pub expires_at: DateTime<Utc>,
}

impl StateData {
	/// Creates new state data with default TTL (10 minutes)
	pub fn new(provider: impl Into<String>, state: String, code_verifier: Option<String>) -> Self {
		Self::with_ttl(provider, state, code_verifier, Duration::minutes(10))
	}

	/// Creates new state data with custom TTL
	pub fn with_ttl(
		provider: impl Into<String>,
		state: String,
		code_verifier: Option<String>,
		ttl: Duration,
	) -> Self {
		Self {
			provider: provider.into(),
			state,
			code_verifier,
			expires_at: Utc::now() + ttl,
		}
	}

	/// Checks if the state has expired
	pub fn is_expired(&self) -> bool {
		Utc::now() > self.expires_at
	}

	/// Park this state in the session, replacing any earlier one
	pub fn store(&self, session: &mut Session) -> Result<(), SocialiteError> {
		session.put(OAUTH_STATE_SESSION_KEY, self)?;
		Ok(())
	}

	/// Consume the parked state and check it against the callback
	///
	/// The stored state is removed whether or not it matches, so a state
	/// value can be used once.
	pub fn verify(
		session: &mut Session,
		provider: &str,
		returned_state: Option<&str>,
	) -> Result<StateData, SocialiteError> {
		let stored: StateData = session.take_as(OAUTH_STATE_SESSION_KEY).ok_or_else(|| {
			SocialiteError::InvalidState("no authorization is pending".to_string())
		})?;

		if stored.provider != provider {
			return Err(SocialiteError::InvalidState(format!(
				"authorization was started for '{}'",
				stored.provider
			)));
		}
		if stored.is_expired() {
			return Err(SocialiteError::InvalidState(
				"authorization request expired".to_string(),
			));
		}
		match returned_state {
			Some(state) if state == stored.state => Ok(stored),
			Some(_) => Err(SocialiteError::InvalidState("state mismatch".to_string())),
			None => Err(SocialiteError::InvalidState(
				"state parameter missing".to_string(),
			)),
		}
	}
}
