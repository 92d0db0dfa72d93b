//! # Socialite Conf
//!
//! Configuration for social login: where the login flow sends the browser and
//! the credentials of each identity provider.
//!
//! Settings are read from TOML and can be overlaid with `SOCIALITE_*`
//! environment variables:
//!
//! ```rust
//! use socialite_conf::SocialiteSettings;
//!
//! let settings = SocialiteSettings::from_toml_str(r#"
//! base_url = "https://shop.example.com"
//! error_url = "/account/login"
//!
//! [providers.google]
//! status = true
//! client_id = "google-id"
//! client_secret = "google-secret"
//! "#).unwrap();
//!
//! assert_eq!(settings.success_url, "/");
//! assert!(settings.provider("google").unwrap().status);
//! ```

pub mod env;
pub mod settings;

pub use env::{ENV_PREFIX, parse_bool};
pub use settings::{ProviderSettings, SettingsError, SocialiteSettings};
