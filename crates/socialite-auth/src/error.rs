//! Socialite error types

use socialite_conf::SettingsError;
use socialite_core::SessionError;
use thiserror::Error;

/// Errors raised while running a social login
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SocialiteError {
	/// No provider is registered under the requested code
	#[error("Unknown socialite provider: {0}.")]
	UnknownProvider(String),

	/// The entry point was called with an action other than `auth`/`callback`
	#[error("Unknown socialite action: {0}.")]
	UnknownAction(String),

	/// A provider is registered but no implementation can build it
	#[error("The socialite provider '{0}' has not been registered")]
	ProviderNotRegistered(String),

	/// OAuth `state` was missing, expired or did not match (CSRF protection)
	#[error("Invalid state: {0}")]
	InvalidState(String),

	/// The identity provider reported an error on the callback
	#[error("Provider error: {0}")]
	Provider(String),

	/// Network error during HTTP requests
	#[error("Network error: {0}")]
	Network(String),

	/// Invalid response from provider
	#[error("Invalid response: {0}")]
	InvalidResponse(String),

	/// Authorization code could not be exchanged for a token
	#[error("Token exchange error: {0}")]
	TokenExchange(String),

	/// Configuration error
	#[error("Configuration error: {0}")]
	Configuration(String),

	/// Account link storage failed
	#[error("Storage error: {0}")]
	Storage(String),

	/// The local user collaborator failed
	#[error("User error: {0}")]
	User(String),

	/// Session data could not be read or written
	#[error("Session error: {0}")]
	Session(String),
}

impl From<reqwest::Error> for SocialiteError {
	fn from(error: reqwest::Error) -> Self {
		SocialiteError::Network(error.to_string())
	}
}

impl From<serde_json::Error> for SocialiteError {
	fn from(error: serde_json::Error) -> Self {
		SocialiteError::InvalidResponse(error.to_string())
	}
}

impl From<SessionError> for SocialiteError {
	fn from(error: SessionError) -> Self {
		SocialiteError::Session(error.to_string())
	}
}

impl From<SettingsError> for SocialiteError {
	fn from(error: SettingsError) -> Self {
		SocialiteError::Configuration(error.to_string())
	}
}

#[cfg(feature = "database")]
impl From<sqlx::Error> for SocialiteError {
	fn from(error: sqlx::Error) -> Self {
		SocialiteError::Storage(error.to_string())
	}
}
