//! Session-backed request state
//!
//! Holds the per-browser state that correlates the redirect-out and
//! callback-in legs of a social login.

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Session ID type
pub type SessionId = String;

/// Session errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
	/// A value could not be converted to or from JSON
	#[error("Session serialization error: {0}")]
	Serialization(String),

	/// The storage backend failed
	#[error("Session backend error: {0}")]
	Backend(String),
}

impl From<serde_json::Error> for SessionError {
	fn from(error: serde_json::Error) -> Self {
		SessionError::Serialization(error.to_string())
	}
}

/// Session data stored in the backend
///
/// # Examples
///
/// ```
/// use socialite_core::session::Session;
///
/// let session = Session::new();
/// assert!(session.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, serde::Deserialize)]
pub struct Session {
	/// Session data as key-value pairs
	pub data: HashMap<String, serde_json::Value>,
}

impl Session {
	/// Create a new empty session
	pub fn new() -> Self {
		Self {
			data: HashMap::new(),
		}
	}

	/// Set a raw JSON value in the session
	///
	/// # Examples
	///
	/// ```
	/// use socialite_core::session::Session;
	/// use serde_json::json;
	///
	/// let mut session = Session::new();
	/// session.set("user_id", json!("123"));
	/// assert_eq!(session.get("user_id"), Some(&json!("123")));
	/// ```
	pub fn set(&mut self, key: impl Into<String>, value: serde_json::Value) {
		self.data.insert(key.into(), value);
	}

	/// Get a raw JSON value from the session
	pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
		self.data.get(key)
	}

	/// Remove a value from the session
	pub fn remove(&mut self, key: &str) -> Option<serde_json::Value> {
		self.data.remove(key)
	}

	/// Check whether a key is present
	pub fn contains(&self, key: &str) -> bool {
		self.data.contains_key(key)
	}

	/// Serialize `value` and store it under `key`
	///
	/// # Examples
	///
	/// ```
	/// use socialite_core::session::Session;
	///
	/// let mut session = Session::new();
	/// session.put("redirect", &("/", "/login")).unwrap();
	///
	/// let stored: Option<(String, String)> = session.get_as("redirect");
	/// assert_eq!(stored, Some(("/".to_string(), "/login".to_string())));
	/// ```
	pub fn put<T: Serialize + ?Sized>(
		&mut self,
		key: impl Into<String>,
		value: &T,
	) -> Result<(), SessionError> {
		let value = serde_json::to_value(value)?;
		self.data.insert(key.into(), value);
		Ok(())
	}

	/// Read and deserialize the value under `key`
	///
	/// A value that does not match `T` is reported as absent.
	///
	/// # Examples
	///
	/// ```
	/// use socialite_core::session::Session;
	/// use serde_json::json;
	///
	/// let mut session = Session::new();
	/// session.set("count", json!("not a number"));
	///
	/// let count: Option<u32> = session.get_as("count");
	/// assert_eq!(count, None);
	/// ```
	pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
		let value = self.data.get(key)?;
		match serde_json::from_value(value.clone()) {
			Ok(parsed) => Some(parsed),
			Err(error) => {
				tracing::debug!(key, %error, "ignoring malformed session value");
				None
			}
		}
	}

	/// Remove the value under `key` and deserialize it
	pub fn take_as<T: DeserializeOwned>(&mut self, key: &str) -> Option<T> {
		let value = self.data.remove(key)?;
		serde_json::from_value(value).ok()
	}

	/// Remove several keys at once
	///
	/// # Examples
	///
	/// ```
	/// use socialite_core::session::Session;
	/// use serde_json::json;
	///
	/// let mut session = Session::new();
	/// session.set("a", json!(1));
	/// session.set("b", json!(2));
	/// session.set("c", json!(3));
	/// session.forget(&["a", "b"]);
	///
	/// assert!(!session.contains("a"));
	/// assert!(session.contains("c"));
	/// ```
	pub fn forget(&mut self, keys: &[&str]) {
		for key in keys {
			self.data.remove(*key);
		}
	}

	/// Check if session is empty
	pub fn is_empty(&self) -> bool {
		self.data.is_empty()
	}

	/// Clear all session data
	pub fn clear(&mut self) {
		self.data.clear();
	}
}

/// Session store trait for different backends
#[async_trait]
pub trait SessionStore: Send + Sync {
	/// Load session data by session ID
	async fn load(&self, session_id: &SessionId) -> Option<Session>;

	/// Save session data
	async fn save(&self, session_id: &SessionId, session: &Session);

	/// Delete session data
	async fn delete(&self, session_id: &SessionId);

	/// Create a new session ID
	fn create_session_id(&self) -> SessionId {
		Uuid::new_v4().to_string()
	}
}

/// In-memory session store for testing and development
///
/// # Examples
///
/// ```
/// use socialite_core::session::{InMemorySessionStore, SessionStore};
///
/// #[tokio::main]
/// async fn main() {
///     let store = InMemorySessionStore::new();
///     let session_id = store.create_session_id();
///
///     let session = store.load(&session_id).await;
///     assert!(session.is_none());
/// }
/// ```
#[derive(Clone, Default)]
pub struct InMemorySessionStore {
	sessions: Arc<Mutex<HashMap<SessionId, Session>>>,
}

impl InMemorySessionStore {
	/// Create a new in-memory session store
	pub fn new() -> Self {
		Self {
			sessions: Arc::new(Mutex::new(HashMap::new())),
		}
	}
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
	async fn load(&self, session_id: &SessionId) -> Option<Session> {
		let sessions = self.sessions.lock().await;
		sessions.get(session_id).cloned()
	}

	async fn save(&self, session_id: &SessionId, session: &Session) {
		let mut sessions = self.sessions.lock().await;
		sessions.insert(session_id.clone(), session.clone());
	}

	async fn delete(&self, session_id: &SessionId) {
		let mut sessions = self.sessions.lock().await;
		sessions.remove(session_id);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde::Deserialize;
	use serde_json::json;

	#[derive(Debug, PartialEq, Serialize, Deserialize)]
	struct Pending {
		id: i64,
		email: Option<String>,
	}

	#[rstest]
	fn test_session_set_get() {
		let mut session = Session::new();
		session.set("key", json!("value"));
		assert_eq!(session.get("key"), Some(&json!("value")));
	}

	#[rstest]
	fn test_session_typed_roundtrip() {
		// Arrange
		let mut session = Session::new();
		let pending = Pending {
			id: 7,
			email: Some("john@example.com".to_string()),
		};

		// Act
		session.put("pending", &pending).unwrap();
		let loaded: Option<Pending> = session.get_as("pending");

		// Assert
		assert_eq!(loaded, Some(pending));
	}

	#[rstest]
	fn test_session_get_as_garbled_value_is_none() {
		let mut session = Session::new();
		session.set("pending", json!({"id": "not-a-number", "user": []}));

		let loaded: Option<Pending> = session.get_as("pending");

		assert!(loaded.is_none());
		assert!(session.contains("pending"));
	}

	#[rstest]
	fn test_session_take_as_removes_value() {
		let mut session = Session::new();
		session.put("pending", &Pending { id: 1, email: None }).unwrap();

		let taken: Option<Pending> = session.take_as("pending");

		assert_eq!(taken, Some(Pending { id: 1, email: None }));
		assert!(session.is_empty());
	}

	#[rstest]
	fn test_session_forget_and_clear() {
		let mut session = Session::new();
		session.set("key1", json!("value1"));
		session.set("key2", json!("value2"));
		session.set("key3", json!("value3"));

		session.forget(&["key1", "missing"]);
		assert!(!session.contains("key1"));
		assert!(session.contains("key2"));

		session.clear();
		assert!(session.is_empty());
	}

	#[rstest]
	#[tokio::test]
	async fn test_in_memory_session_store() {
		let store = InMemorySessionStore::new();
		let session_id = store.create_session_id();

		let mut session = Session::new();
		session.set("user_id", json!("123"));

		store.save(&session_id, &session).await;
		let loaded = store.load(&session_id).await;
		assert_eq!(loaded.unwrap().get("user_id"), Some(&json!("123")));

		store.delete(&session_id).await;
		assert!(store.load(&session_id).await.is_none());
	}

	#[rstest]
	fn test_session_store_create_session_id() {
		let store = InMemorySessionStore::new();
		let id1 = store.create_session_id();
		let id2 = store.create_session_id();

		assert_ne!(id1, id2);
		assert!(!id1.is_empty());
	}
}
