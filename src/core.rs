//! Sessions, session stores and flash messages.
//!
//! # Examples
//!
//! ```rust
//! # #[cfg(feature = "core")]
//! # {
//! use socialite::core::{Message, MessageStorage, Session, SessionStorage};
//!
//! let mut session = Session::new();
//! SessionStorage::new(&mut session).add(Message::error("Unknown socialite provider: foo."));
//! assert!(!session.is_empty());
//! # }
//! ```

#[cfg(feature = "core")]
pub use socialite_core::*;
