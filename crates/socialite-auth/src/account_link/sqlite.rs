//! SQLite-backed account link store
//!
//! ```sql
//! CREATE TABLE socialite_providers (
//!     id INTEGER PRIMARY KEY AUTOINCREMENT,
//!     user_id INTEGER NULL,
//!     user_type VARCHAR(255) NULL,
//!     provider VARCHAR(255) NOT NULL,
//!     provider_id VARCHAR(255) NOT NULL,
//!     token TEXT NOT NULL
//! );
//! ```

use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;

use super::{AccountLink, AccountLinkStore};
use crate::error::SocialiteError;

const SELECT_COLUMNS: &str = "SELECT id, user_id, user_type, provider, provider_id, token FROM socialite_providers";

/// Account link store on a `socialite_providers` table
///
/// # Examples
///
/// ```rust,no_run
/// use socialite_auth::account_link::{AccountLinkStore, SqliteAccountLinkStore};
///
/// # async fn example() {
/// let store = SqliteAccountLinkStore::connect("sqlite::memory:").await.unwrap();
/// store.create_table().await.unwrap();
///
/// let mut link = store.first_or_new("customers", "google", "1234").await.unwrap();
/// link.token = "access-token".to_string();
/// store.save(&mut link).await.unwrap();
/// assert!(link.id.is_some());
/// # }
/// # tokio::runtime::Runtime::new().unwrap().block_on(example());
/// ```
#[derive(Debug, Clone)]
pub struct SqliteAccountLinkStore {
	pool: SqlitePool,
}

impl SqliteAccountLinkStore {
	/// Connect to `database_url`
	///
	/// In-memory databases get a single connection so every query sees the
	/// same database.
	pub async fn connect(database_url: &str) -> Result<Self, SocialiteError> {
		let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };
		let pool = SqlitePoolOptions::new()
			.max_connections(max_connections)
			.connect(database_url)
			.await
			.map_err(|e| SocialiteError::Storage(format!("Database connection error: {}", e)))?;
		Ok(Self::from_pool(pool))
	}

	pub fn from_pool(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Create the `socialite_providers` table and its indexes if missing
	pub async fn create_table(&self) -> Result<(), SocialiteError> {
		let statements = [
			"CREATE TABLE IF NOT EXISTS socialite_providers (
				id INTEGER PRIMARY KEY AUTOINCREMENT,
				user_id INTEGER NULL,
				user_type VARCHAR(255) NULL,
				provider VARCHAR(255) NOT NULL,
				provider_id VARCHAR(255) NOT NULL,
				token TEXT NOT NULL
			)",
			"CREATE INDEX IF NOT EXISTS socialite_providers_user_id_index
				ON socialite_providers (user_id)",
			"CREATE UNIQUE INDEX IF NOT EXISTS socialite_providers_provider_provider_id_unique
				ON socialite_providers (provider, provider_id)",
			"CREATE INDEX IF NOT EXISTS socialite_providers_provider_token_index
				ON socialite_providers (provider, token)",
		];

		for sql in statements {
			sqlx::query(sql)
				.execute(&self.pool)
				.await
				.map_err(|e| SocialiteError::Storage(format!("Failed to create table: {}", e)))?;
		}
		Ok(())
	}
}

fn link_from_row(row: &SqliteRow) -> Result<AccountLink, SocialiteError> {
	Ok(AccountLink {
		id: Some(row.try_get("id")?),
		user_id: row.try_get("user_id")?,
		user_type: row.try_get("user_type")?,
		provider: row.try_get("provider")?,
		provider_id: row.try_get("provider_id")?,
		token: row.try_get("token")?,
	})
}

#[async_trait]
impl AccountLinkStore for SqliteAccountLinkStore {
	async fn first_or_new(
		&self,
		user_type: &str,
		provider: &str,
		provider_id: &str,
	) -> Result<AccountLink, SocialiteError> {
		let sql = format!(
			"{} WHERE user_type = ? AND provider = ? AND provider_id = ? LIMIT 1",
			SELECT_COLUMNS
		);
		let row = sqlx::query(&sql)
			.bind(user_type)
			.bind(provider)
			.bind(provider_id)
			.fetch_optional(&self.pool)
			.await?;

		match row {
			Some(row) => link_from_row(&row),
			None => Ok(AccountLink::new(user_type, provider, provider_id)),
		}
	}

	async fn save(&self, link: &mut AccountLink) -> Result<(), SocialiteError> {
		match link.id {
			Some(id) => {
				let result = sqlx::query(
					"UPDATE socialite_providers
					SET user_id = ?, user_type = ?, provider = ?, provider_id = ?, token = ?
					WHERE id = ?",
				)
				.bind(link.user_id)
				.bind(link.user_type.as_deref())
				.bind(&link.provider)
				.bind(&link.provider_id)
				.bind(&link.token)
				.bind(id)
				.execute(&self.pool)
				.await?;

				if result.rows_affected() == 0 {
					return Err(SocialiteError::Storage(format!(
						"account link {} does not exist",
						id
					)));
				}
			}
			None => {
				let result = sqlx::query(
					"INSERT INTO socialite_providers
					(user_id, user_type, provider, provider_id, token)
					VALUES (?, ?, ?, ?, ?)",
				)
				.bind(link.user_id)
				.bind(link.user_type.as_deref())
				.bind(&link.provider)
				.bind(&link.provider_id)
				.bind(&link.token)
				.execute(&self.pool)
				.await?;

				link.id = Some(result.last_insert_rowid());
			}
		}
		Ok(())
	}

	async fn find(&self, id: i64) -> Result<Option<AccountLink>, SocialiteError> {
		let sql = format!("{} WHERE id = ?", SELECT_COLUMNS);
		let row = sqlx::query(&sql)
			.bind(id)
			.fetch_optional(&self.pool)
			.await?;

		row.as_ref().map(link_from_row).transpose()
	}

	async fn find_by_user(
		&self,
		user_type: &str,
		user_id: i64,
	) -> Result<Vec<AccountLink>, SocialiteError> {
		let sql = format!(
			"{} WHERE user_type = ? AND user_id = ? ORDER BY id",
			SELECT_COLUMNS
		);
		let rows = sqlx::query(&sql)
			.bind(user_type)
			.bind(user_id)
			.fetch_all(&self.pool)
			.await?;

		rows.iter().map(link_from_row).collect()
	}
}
