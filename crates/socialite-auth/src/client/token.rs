//! Token endpoint response

use serde::{Deserialize, Serialize};

/// Successful response of an OAuth2 token endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
	/// Access token
	pub access_token: String,

	/// Token type, usually `Bearer`
	#[serde(default)]
	pub token_type: Option<String>,

	/// Lifetime of the access token in seconds
	#[serde(default)]
	pub expires_in: Option<u64>,

	/// Refresh token
	#[serde(default)]
	pub refresh_token: Option<String>,

	/// Granted scopes
	#[serde(default)]
	pub scope: Option<String>,
}
