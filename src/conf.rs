//! Settings: TOML files, environment overrides and per-provider credentials.
//!
//! # Examples
//!
//! ```rust
//! # #[cfg(feature = "conf")]
//! # {
//! use socialite::conf::SocialiteSettings;
//!
//! let settings = SocialiteSettings::from_toml_str(
//!     r#"
//!     base_url = "https://shop.example"
//!
//!     [providers.google]
//!     status = true
//!     client_id = "google-client"
//!     client_secret = "google-secret"
//!     "#,
//! )
//! .unwrap();
//! assert!(settings.provider("google").is_some_and(|google| google.status));
//! # }
//! ```

#[cfg(feature = "conf")]
pub use socialite_conf::*;
