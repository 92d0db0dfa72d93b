//! # Socialite Core
//!
//! Request-scoped building blocks shared by the socialite crates.
//!
//! ## Features
//!
//! - **Session**: JSON key/value bag carried between the two legs of an OAuth redirect
//! - **Session Stores**: Pluggable persistence for sessions, with an in-memory store
//! - **Flash Messages**: One-time notifications stored in the session
//!
//! ## Example
//!
//! ```rust
//! use socialite_core::messages::{Message, MessageStorage, SessionStorage};
//! use socialite_core::session::Session;
//!
//! let mut session = Session::new();
//! SessionStorage::new(&mut session).add(Message::error("Unknown socialite provider: foo."));
//!
//! let flashed = SessionStorage::new(&mut session).get_all();
//! assert_eq!(flashed.len(), 1);
//! assert_eq!(flashed[0].tag(), "danger");
//! ```

pub mod messages;
pub mod session;

pub use messages::{Level, MemoryStorage, Message, MessageStorage, SessionStorage};
pub use session::{InMemorySessionStore, Session, SessionError, SessionId, SessionStore};
