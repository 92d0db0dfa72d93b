//! Local users: the host application's side of a social login

use async_trait::async_trait;
use rand::Rng;
use rand::distributions::Alphanumeric;
use serde::{Deserialize, Serialize};
use socialite_core::Session;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::SocialiteError;
use crate::hasher::{Argon2Hasher, PasswordHasher};

/// Session key holding the logged-in user's ID
pub const AUTH_USER_SESSION_KEY: &str = "_auth_user_id";

/// Session key recording a "remember me" login
pub const AUTH_REMEMBER_SESSION_KEY: &str = "_auth_remember";

/// Length of passwords generated for users registered through social login
pub const GENERATED_PASSWORD_LENGTH: usize = 16;

/// Generate a random alphanumeric password
pub fn random_password(length: usize) -> String {
	rand::thread_rng()
		.sample_iter(&Alphanumeric)
		.take(length)
		.map(char::from)
		.collect()
}

/// A user of the host application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalUser {
	pub id: i64,
	/// Kind of user, e.g. `customers`
	pub user_type: String,
	pub first_name: String,
	pub email: Option<String>,
	pub group_id: Option<i64>,
	pub is_active: bool,
}

/// Data for registering a user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
	pub first_name: String,
	pub email: Option<String>,
	/// Plain-text password; hashed by the provider
	pub password: String,
	pub group_id: Option<i64>,
	pub is_active: bool,
}

/// Access to the host application's users
#[async_trait]
pub trait UserProvider: Send + Sync {
	async fn find_by_email(&self, email: &str) -> Result<Option<LocalUser>, SocialiteError>;

	/// Register and activate a user
	async fn register(&self, user: NewUser) -> Result<LocalUser, SocialiteError>;

	/// Group new users are placed in
	async fn default_group_id(&self) -> Result<Option<i64>, SocialiteError>;

	/// Log `user` into `session`
	async fn login(
		&self,
		session: &mut Session,
		user: &LocalUser,
		remember: bool,
	) -> Result<(), SocialiteError>;
}

#[derive(Debug, Clone)]
struct StoredUser {
	user: LocalUser,
	password_hash: String,
}

#[derive(Debug, Default)]
struct UserRows {
	users: Vec<StoredUser>,
	next_id: i64,
}

/// In-memory user provider for testing and development
///
/// Passwords are hashed with Argon2.
///
/// # Examples
///
/// ```
/// use socialite_auth::users::{InMemoryUserProvider, NewUser, UserProvider};
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let users = InMemoryUserProvider::new("customers").with_default_group(Some(1));
/// let user = users
///     .register(NewUser {
///         first_name: "John".to_string(),
///         email: Some("john@example.com".to_string()),
///         password: "secret".to_string(),
///         group_id: Some(1),
///         is_active: true,
///     })
///     .await
///     .unwrap();
///
/// let found = users.find_by_email("JOHN@example.com").await.unwrap();
/// assert_eq!(found.map(|u| u.id), Some(user.id));
/// # });
/// ```
#[derive(Clone)]
pub struct InMemoryUserProvider {
	user_type: String,
	default_group: Option<i64>,
	hasher: Arc<dyn PasswordHasher>,
	inner: Arc<RwLock<UserRows>>,
}

impl InMemoryUserProvider {
	pub fn new(user_type: impl Into<String>) -> Self {
		Self {
			user_type: user_type.into(),
			default_group: None,
			hasher: Arc::new(Argon2Hasher::new()),
			inner: Arc::new(RwLock::new(UserRows::default())),
		}
	}

	pub fn with_default_group(mut self, group_id: Option<i64>) -> Self {
		self.default_group = group_id;
		self
	}

	pub fn with_hasher(mut self, hasher: Arc<dyn PasswordHasher>) -> Self {
		self.hasher = hasher;
		self
	}

	pub async fn get(&self, id: i64) -> Option<LocalUser> {
		self.inner
			.read()
			.await
			.users
			.iter()
			.find(|stored| stored.user.id == id)
			.map(|stored| stored.user.clone())
	}

	pub async fn all(&self) -> Vec<LocalUser> {
		self.inner
			.read()
			.await
			.users
			.iter()
			.map(|stored| stored.user.clone())
			.collect()
	}

	/// Check a user's password
	pub async fn verify_password(&self, id: i64, password: &str) -> Result<bool, SocialiteError> {
		let inner = self.inner.read().await;
		let stored = inner
			.users
			.iter()
			.find(|stored| stored.user.id == id)
			.ok_or_else(|| SocialiteError::User(format!("user {} does not exist", id)))?;
		self.hasher.verify(password, &stored.password_hash)
	}

	/// ID of the user logged into `session`
	pub fn authenticated_user_id(session: &Session) -> Option<i64> {
		session.get_as(AUTH_USER_SESSION_KEY)
	}
}

#[async_trait]
impl UserProvider for InMemoryUserProvider {
	async fn find_by_email(&self, email: &str) -> Result<Option<LocalUser>, SocialiteError> {
		let inner = self.inner.read().await;
		Ok(inner
			.users
			.iter()
			.find(|stored| {
				stored
					.user
					.email
					.as_deref()
					.is_some_and(|candidate| candidate.eq_ignore_ascii_case(email))
			})
			.map(|stored| stored.user.clone()))
	}

	async fn register(&self, user: NewUser) -> Result<LocalUser, SocialiteError> {
		let password_hash = self.hasher.hash(&user.password)?;

		let mut inner = self.inner.write().await;
		inner.next_id += 1;
		let local = LocalUser {
			id: inner.next_id,
			user_type: self.user_type.clone(),
			first_name: user.first_name,
			email: user.email,
			group_id: user.group_id,
			is_active: user.is_active,
		};
		inner.users.push(StoredUser {
			user: local.clone(),
			password_hash,
		});
		tracing::info!(user_id = local.id, "registered user");
		Ok(local)
	}

	async fn default_group_id(&self) -> Result<Option<i64>, SocialiteError> {
		Ok(self.default_group)
	}

	async fn login(
		&self,
		session: &mut Session,
		user: &LocalUser,
		remember: bool,
	) -> Result<(), SocialiteError> {
		if !user.is_active {
			return Err(SocialiteError::User(format!(
				"user {} is not active",
				user.id
			)));
		}
		session.put(AUTH_USER_SESSION_KEY, &user.id)?;
		session.put(AUTH_REMEMBER_SESSION_KEY, &remember)?;
		Ok(())
	}
}
