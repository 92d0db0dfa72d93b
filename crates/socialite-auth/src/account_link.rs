//! Account links: remote identities attached to local users
//!
//! One row per `(provider, provider_id)`. Rows are created on the first
//! callback for a remote identity, get their token refreshed on every
//! callback, and are attached to a local user once one is found or
//! registered. This subsystem never deletes them.

#[cfg(feature = "database")]
pub mod sqlite;

#[cfg(feature = "database")]
pub use sqlite::SqliteAccountLinkStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::SocialiteError;
use crate::users::LocalUser;

/// A remote identity linked (or about to be linked) to a local user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountLink {
	/// Row ID; `None` until saved
	pub id: Option<i64>,
	pub user_id: Option<i64>,
	pub user_type: Option<String>,
	/// Provider code
	pub provider: String,
	/// Provider-side user ID
	pub provider_id: String,
	/// Latest access token
	pub token: String,
}

impl AccountLink {
	/// An unsaved link without an owner
	pub fn new(
		user_type: impl Into<String>,
		provider: impl Into<String>,
		provider_id: impl Into<String>,
	) -> Self {
		Self {
			id: None,
			user_id: None,
			user_type: Some(user_type.into()),
			provider: provider.into(),
			provider_id: provider_id.into(),
			token: String::new(),
		}
	}

	/// Attach the link to `user`
	pub fn apply_user(&mut self, user: &LocalUser) -> &mut Self {
		self.user_id = Some(user.id);
		self.user_type = Some(user.user_type.clone());
		self
	}

	pub fn is_attached(&self) -> bool {
		self.user_id.is_some()
	}
}

/// Persistence of account links
#[async_trait]
pub trait AccountLinkStore: Send + Sync {
	/// The saved link for `(user_type, provider, provider_id)`, or a new
	/// unsaved one
	async fn first_or_new(
		&self,
		user_type: &str,
		provider: &str,
		provider_id: &str,
	) -> Result<AccountLink, SocialiteError>;

	/// Insert or update `link`; assigns `link.id` on insert
	async fn save(&self, link: &mut AccountLink) -> Result<(), SocialiteError>;

	async fn find(&self, id: i64) -> Result<Option<AccountLink>, SocialiteError>;

	/// All links owned by a user
	async fn find_by_user(
		&self,
		user_type: &str,
		user_id: i64,
	) -> Result<Vec<AccountLink>, SocialiteError>;
}

#[derive(Debug, Default)]
struct LinkRows {
	rows: BTreeMap<i64, AccountLink>,
	next_id: i64,
}

/// In-memory account link store for testing and development
#[derive(Debug, Clone, Default)]
pub struct InMemoryAccountLinkStore {
	inner: Arc<RwLock<LinkRows>>,
}

impl InMemoryAccountLinkStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of stored links
	pub async fn len(&self) -> usize {
		self.inner.read().await.rows.len()
	}

	pub async fn is_empty(&self) -> bool {
		self.inner.read().await.rows.is_empty()
	}
}

#[async_trait]
impl AccountLinkStore for InMemoryAccountLinkStore {
	async fn first_or_new(
		&self,
		user_type: &str,
		provider: &str,
		provider_id: &str,
	) -> Result<AccountLink, SocialiteError> {
		let inner = self.inner.read().await;
		let existing = inner.rows.values().find(|link| {
			link.provider == provider
				&& link.provider_id == provider_id
				&& link.user_type.as_deref() == Some(user_type)
		});
		Ok(existing
			.cloned()
			.unwrap_or_else(|| AccountLink::new(user_type, provider, provider_id)))
	}

	async fn save(&self, link: &mut AccountLink) -> Result<(), SocialiteError> {
		let mut inner = self.inner.write().await;
		let duplicate = inner.rows.values().any(|row| {
			row.id != link.id && row.provider == link.provider && row.provider_id == link.provider_id
		});
		if duplicate {
			return Err(SocialiteError::Storage(format!(
				"an account link for {} user {} already exists",
				link.provider, link.provider_id
			)));
		}

		let id = match link.id {
			Some(id) if inner.rows.contains_key(&id) => id,
			Some(id) => {
				return Err(SocialiteError::Storage(format!(
					"account link {} does not exist",
					id
				)));
			}
			None => {
				inner.next_id += 1;
				inner.next_id
			}
		};
		link.id = Some(id);
		inner.rows.insert(id, link.clone());
		Ok(())
	}

	async fn find(&self, id: i64) -> Result<Option<AccountLink>, SocialiteError> {
		Ok(self.inner.read().await.rows.get(&id).cloned())
	}

	async fn find_by_user(
		&self,
		user_type: &str,
		user_id: i64,
	) -> Result<Vec<AccountLink>, SocialiteError> {
		let inner = self.inner.read().await;
		Ok(inner
			.rows
			.values()
			.filter(|link| {
				link.user_id == Some(user_id) && link.user_type.as_deref() == Some(user_type)
			})
			.cloned()
			.collect())
	}
}
