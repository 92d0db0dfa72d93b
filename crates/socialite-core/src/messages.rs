//! Flash messages
//!
//! One-time notifications that survive a redirect by living in the session
//! until the next page reads them.
//!
//! ## Example
//!
//! ```rust
//! use socialite_core::messages::{Level, Message, MessageStorage, MemoryStorage};
//!
//! let mut storage = MemoryStorage::new();
//! storage.add(Message::success("Logged in"));
//! storage.add(Message::warning("Please confirm your email"));
//!
//! let messages = storage.get_all();
//! assert_eq!(messages[0].level, Level::Success);
//! assert!(storage.peek().is_empty());
//! ```

pub mod levels;
pub mod message;
pub mod storage;

pub use levels::Level;
pub use message::Message;
pub use storage::{FLASH_SESSION_KEY, MemoryStorage, MessageStorage, SessionStorage};
