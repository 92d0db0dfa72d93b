//! Test helpers for social login tests

#![allow(dead_code, unused_imports)]

pub mod fixtures;
pub mod mock_server;

pub use fixtures::{
	TestProvider, flash_texts, login_manager, login_manager_with, start_auth, test_registry,
	test_settings,
};
pub use mock_server::{ErrorMode, MockOAuthServer, RecordedRequest};
