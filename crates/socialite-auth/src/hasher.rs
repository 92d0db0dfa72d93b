//! Password hashing for locally registered users

use argon2::Argon2;
use argon2::password_hash::{
	PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
};
use rand::RngCore;

use crate::error::SocialiteError;

/// Password hasher trait
pub trait PasswordHasher: Send + Sync {
	/// Hashes a password
	fn hash(&self, password: &str) -> Result<String, SocialiteError>;

	/// Verifies a password against a hash
	///
	/// `Ok(false)` for a wrong password, `Err` for a malformed hash.
	fn verify(&self, password: &str, hash: &str) -> Result<bool, SocialiteError>;
}

/// Argon2id password hasher
///
/// # Examples
///
/// ```
/// use socialite_auth::hasher::{Argon2Hasher, PasswordHasher};
///
/// let hasher = Argon2Hasher::new();
/// let hash = hasher.hash("secure_password123").unwrap();
///
/// assert!(hasher.verify("secure_password123", &hash).unwrap());
/// assert!(!hasher.verify("wrong_password", &hash).unwrap());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Hasher;

impl Argon2Hasher {
	pub fn new() -> Self {
		Self
	}
}

impl PasswordHasher for Argon2Hasher {
	fn hash(&self, password: &str) -> Result<String, SocialiteError> {
		let mut salt_bytes = [0u8; 16];
		rand::thread_rng().fill_bytes(&mut salt_bytes);

		let salt = SaltString::encode_b64(&salt_bytes)
			.map_err(|e| SocialiteError::User(e.to_string()))?;

		Argon2::default()
			.hash_password(password.as_bytes(), &salt)
			.map(|hash| hash.to_string())
			.map_err(|e| SocialiteError::User(e.to_string()))
	}

	fn verify(&self, password: &str, hash: &str) -> Result<bool, SocialiteError> {
		let parsed_hash = PasswordHash::new(hash).map_err(|e| SocialiteError::User(e.to_string()))?;

		Ok(Argon2::default()
			.verify_password(password.as_bytes(), &parsed_hash)
			.is_ok())
	}
}
