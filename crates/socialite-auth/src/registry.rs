//! Provider registry
//!
//! Maps provider identifiers to their registration metadata and factories,
//! and provider codes back to identifiers. Host extensions may register
//! providers lazily through callbacks that run once, before the first lookup.

use parking_lot::{Mutex, RwLock};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use crate::error::SocialiteError;
use crate::provider::{ConfigExtender, ProviderContext, ProviderInfo, SocialProvider};
use crate::providers::{FacebookProvider, GoogleProvider, TwitterProvider};

/// Builds an adapter from its context
pub type ProviderFactory = Arc<dyn Fn(ProviderContext) -> Arc<dyn SocialProvider> + Send + Sync>;

/// Deferred registration: returns `(identifier, info)` pairs to register
pub type RegistrationCallback = Box<dyn FnOnce() -> Vec<(String, ProviderInfo)> + Send>;

/// Derive a provider code from an identifier
///
/// # Examples
///
/// ```
/// use socialite_auth::registry::derive_code;
///
/// assert_eq!(derive_code("socialite::providers::Facebook"), "socialite_providers_facebook");
/// assert_eq!(derive_code("Acme\\Social\\Classes\\BaseProvider"), "acme_social_classes_baseprovider");
/// ```
pub fn derive_code(identifier: &str) -> String {
	let mut code = String::with_capacity(identifier.len());
	let mut pending_separator = false;
	for c in identifier.chars() {
		if c.is_ascii_alphanumeric() {
			if pending_separator && !code.is_empty() {
				code.push('_');
			}
			pending_separator = false;
			code.push(c.to_ascii_lowercase());
		} else {
			pending_separator = true;
		}
	}
	code
}

#[derive(Default)]
struct Registrations {
	/// identifier -> info
	providers: BTreeMap<String, ProviderInfo>,
	/// code -> identifier
	hints: HashMap<String, String>,
}

/// Registry of social login providers
///
/// # Examples
///
/// ```
/// use socialite_auth::registry::ProviderRegistry;
///
/// let registry = ProviderRegistry::with_builtin_providers();
///
/// assert_eq!(
///     registry.resolve("google").as_deref(),
///     Some("socialite::providers::Google")
/// );
/// assert_eq!(registry.list().len(), 3);
/// ```
#[derive(Default)]
pub struct ProviderRegistry {
	registrations: RwLock<Registrations>,
	callbacks: Mutex<Vec<RegistrationCallback>>,
	factories: RwLock<HashMap<String, ProviderFactory>>,
	config_extenders: RwLock<Vec<ConfigExtender>>,
}

impl ProviderRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// A registry with the Facebook, Google and Twitter adapters
	pub fn with_builtin_providers() -> Self {
		let registry = Self::new();
		registry.register_implementation(FacebookProvider::IDENTIFIER, |context| {
			Arc::new(FacebookProvider::new(context))
		});
		registry.register_implementation(GoogleProvider::IDENTIFIER, |context| {
			Arc::new(GoogleProvider::new(context))
		});
		registry.register_implementation(TwitterProvider::IDENTIFIER, |context| {
			Arc::new(TwitterProvider::new(context))
		});
		registry.register_many([
			(FacebookProvider::IDENTIFIER, FacebookProvider::info()),
			(GoogleProvider::IDENTIFIER, GoogleProvider::info()),
			(TwitterProvider::IDENTIFIER, TwitterProvider::info()),
		]);
		registry
	}

	/// Register a provider
	///
	/// An empty `info.code` is derived from the identifier. The last
	/// registration for a code wins.
	pub fn register(&self, identifier: impl Into<String>, mut info: ProviderInfo) {
		let identifier = identifier.into();
		if info.code.is_empty() {
			info.code = derive_code(&identifier);
		}

		let mut registrations = self.registrations.write();
		registrations
			.hints
			.retain(|code, target| *target != identifier || *code == info.code);
		registrations
			.hints
			.insert(info.code.clone(), identifier.clone());
		tracing::debug!(%identifier, code = %info.code, "registered socialite provider");
		registrations.providers.insert(identifier, info);
	}

	pub fn register_many<I, S>(&self, providers: I)
	where
		I: IntoIterator<Item = (S, ProviderInfo)>,
		S: Into<String>,
	{
		for (identifier, info) in providers {
			self.register(identifier, info);
		}
	}

	/// Queue a deferred registration
	///
	/// Callbacks run before the next lookup. They must not look providers up
	/// in this registry themselves.
	pub fn register_callback<F>(&self, callback: F)
	where
		F: FnOnce() -> Vec<(String, ProviderInfo)> + Send + 'static,
	{
		self.callbacks.lock().push(Box::new(callback));
	}

	/// Register the factory that builds the adapter for `identifier`
	pub fn register_implementation<F>(&self, identifier: impl Into<String>, factory: F)
	where
		F: Fn(ProviderContext) -> Arc<dyn SocialProvider> + Send + Sync + 'static,
	{
		self.factories
			.write()
			.insert(identifier.into(), Arc::new(factory));
	}

	/// Register a callback that adjusts every adapter's OAuth client
	/// configuration
	pub fn extend_config<F>(&self, extender: F)
	where
		F: Fn(&str, &mut crate::client::OAuthClientConfig) + Send + Sync + 'static,
	{
		self.config_extenders.write().push(Arc::new(extender));
	}

	/// Run pending deferred registrations
	///
	/// The callback queue lock is held while the callbacks run, so concurrent
	/// lookups wait for their registrations instead of missing them.
	fn load_pending(&self) {
		let mut callbacks = self.callbacks.lock();
		if callbacks.is_empty() {
			return;
		}
		for callback in callbacks.drain(..) {
			self.register_many(callback());
		}
	}

	/// Identifier registered for `code`
	pub fn resolve(&self, code: &str) -> Option<String> {
		self.load_pending();
		self.registrations.read().hints.get(code).cloned()
	}

	/// Registration info by code or identifier
	pub fn find(&self, name: &str) -> Option<ProviderInfo> {
		let identifier = self.resolve(name).unwrap_or_else(|| name.to_string());
		self.registrations.read().providers.get(&identifier).cloned()
	}

	/// All registered providers keyed by identifier
	pub fn list(&self) -> BTreeMap<String, ProviderInfo> {
		self.load_pending();
		self.registrations.read().providers.clone()
	}

	/// Build the adapter for `identifier`
	pub fn instantiate(
		&self,
		identifier: &str,
		mut context: ProviderContext,
	) -> Result<Arc<dyn SocialProvider>, SocialiteError> {
		let factory = self
			.factories
			.read()
			.get(identifier)
			.cloned()
			.ok_or_else(|| SocialiteError::ProviderNotRegistered(identifier.to_string()))?;

		context
			.config_extenders
			.extend(self.config_extenders.read().iter().cloned());
		Ok(factory(context))
	}
}

impl fmt::Debug for ProviderRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ProviderRegistry")
			.field("providers", &self.registrations.read().providers)
			.field("pending_callbacks", &self.callbacks.lock().len())
			.field("factories", &self.factories.read().len())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::sync::atomic::{AtomicUsize, Ordering};

	#[rstest]
	#[case("socialite::providers::Facebook", "socialite_providers_facebook")]
	#[case("Acme\\Social\\Classes\\BaseProvider", "acme_social_classes_baseprovider")]
	#[case("::Leading::Trailing::", "leading_trailing")]
	#[case("my--provider  v2", "my_provider_v2")]
	#[case("Google", "google")]
	fn test_derive_code(#[case] identifier: &str, #[case] expected: &str) {
		assert_eq!(derive_code(identifier), expected);
	}

	#[rstest]
	fn test_register_and_resolve() {
		let registry = ProviderRegistry::new();

		registry.register("app::Test", ProviderInfo::new("test", "Test", ""));

		assert_eq!(registry.resolve("test").as_deref(), Some("app::Test"));
		assert_eq!(registry.list().len(), 1);
	}

	#[rstest]
	fn test_register_without_code_derives_one() {
		let registry = ProviderRegistry::new();

		registry.register("app::providers::Custom", ProviderInfo::default());

		assert_eq!(
			registry.resolve("app_providers_custom").as_deref(),
			Some("app::providers::Custom")
		);
		assert_eq!(
			registry.find("app::providers::Custom").unwrap().code,
			"app_providers_custom"
		);
	}

	#[rstest]
	fn test_find_by_code_or_identifier() {
		let registry = ProviderRegistry::with_builtin_providers();

		let by_code = registry.find("facebook").unwrap();
		let by_identifier = registry.find(FacebookProvider::IDENTIFIER).unwrap();

		assert_eq!(by_code, by_identifier);
		assert_eq!(by_code.description, "Log in with Facebook");
		assert!(registry.find("nonexistent").is_none());
	}

	#[rstest]
	fn test_last_registration_for_code_wins() {
		let registry = ProviderRegistry::new();

		registry.register("app::First", ProviderInfo::new("shared", "First", ""));
		registry.register("app::Second", ProviderInfo::new("shared", "Second", ""));

		assert_eq!(registry.resolve("shared").as_deref(), Some("app::Second"));
	}

	#[rstest]
	fn test_reregistering_identifier_overwrites_info() {
		let registry = ProviderRegistry::new();

		registry.register("app::Test", ProviderInfo::new("old", "Old", ""));
		registry.register("app::Test", ProviderInfo::new("new", "New", ""));

		assert_eq!(registry.list().len(), 1);
		assert_eq!(registry.find("app::Test").unwrap().label, "New");
		assert!(registry.resolve("old").is_none());
		assert_eq!(registry.resolve("new").as_deref(), Some("app::Test"));
	}

	#[rstest]
	fn test_callbacks_run_once_and_keep_direct_registrations() {
		// Arrange
		let registry = ProviderRegistry::new();
		let calls = Arc::new(AtomicUsize::new(0));
		let counter = calls.clone();
		registry.register("app::Direct", ProviderInfo::new("direct", "Direct", ""));
		registry.register_callback(move || {
			counter.fetch_add(1, Ordering::SeqCst);
			vec![(
				"app::Deferred".to_string(),
				ProviderInfo::new("deferred", "Deferred", ""),
			)]
		});

		// Act
		let first = registry.resolve("deferred");
		let second = registry.find("deferred");
		let listed = registry.list();

		// Assert
		assert_eq!(first.as_deref(), Some("app::Deferred"));
		assert!(second.is_some());
		assert_eq!(listed.len(), 2);
		assert_eq!(calls.load(Ordering::SeqCst), 1);
	}

	#[rstest]
	fn test_callbacks_run_once_under_concurrent_lookups() {
		let registry = Arc::new(ProviderRegistry::new());
		let calls = Arc::new(AtomicUsize::new(0));
		let counter = calls.clone();
		registry.register_callback(move || {
			counter.fetch_add(1, Ordering::SeqCst);
			vec![("app::Test".to_string(), ProviderInfo::new("test", "Test", ""))]
		});

		let handles: Vec<_> = (0..8)
			.map(|_| {
				let registry = registry.clone();
				std::thread::spawn(move || registry.resolve("test"))
			})
			.collect();

		for handle in handles {
			assert_eq!(handle.join().unwrap().as_deref(), Some("app::Test"));
		}
		assert_eq!(calls.load(Ordering::SeqCst), 1);
	}

	#[rstest]
	fn test_instantiate_without_factory_fails() {
		use crate::routes::EntryPointRoutes;
		use socialite_conf::ProviderSettings;

		let registry = ProviderRegistry::new();
		registry.register("app::Missing", ProviderInfo::new("missing", "Missing", ""));
		let context = ProviderContext::new(
			"missing",
			ProviderSettings::default(),
			EntryPointRoutes::new("http://localhost", "socialite").unwrap(),
		);

		let result = registry.instantiate("app::Missing", context);

		assert!(matches!(
			result,
			Err(SocialiteError::ProviderNotRegistered(identifier)) if identifier == "app::Missing"
		));
	}

	#[rstest]
	fn test_instantiate_builtin() {
		use crate::routes::EntryPointRoutes;
		use socialite_conf::ProviderSettings;

		let registry = ProviderRegistry::with_builtin_providers();
		let context = ProviderContext::new(
			"google",
			ProviderSettings::enabled("id", "secret"),
			EntryPointRoutes::new("http://localhost", "socialite").unwrap(),
		);

		let provider = registry.instantiate(GoogleProvider::IDENTIFIER, context).unwrap();

		assert_eq!(provider.driver(), "google");
		assert_eq!(provider.label(), "Google");
		assert!(provider.is_enabled());
	}
}
