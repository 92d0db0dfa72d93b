//! PKCE (RFC 7636) verifier and challenge

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::Rng;
use rand::distributions::Alphanumeric;
use sha2::{Digest, Sha256};

const VERIFIER_LENGTH: usize = 64;

/// The secret half of a PKCE pair, kept in the session until the callback
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeVerifier(String);

impl CodeVerifier {
	/// Generate a fresh random verifier
	pub fn generate() -> Self {
		let verifier: String = rand::thread_rng()
			.sample_iter(&Alphanumeric)
			.take(VERIFIER_LENGTH)
			.map(char::from)
			.collect();
		Self(verifier)
	}

	/// Wrap a verifier read back from storage
	pub fn from_raw(verifier: String) -> Self {
		Self(verifier)
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Derive the `S256` challenge sent on the authorization request
	pub fn challenge(&self) -> CodeChallenge {
		let digest = Sha256::digest(self.0.as_bytes());
		CodeChallenge(URL_SAFE_NO_PAD.encode(digest))
	}
}

/// The public half of a PKCE pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeChallenge(String);

impl CodeChallenge {
	pub const METHOD: &'static str = "S256";

	pub fn from_raw(challenge: String) -> Self {
		Self(challenge)
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}
