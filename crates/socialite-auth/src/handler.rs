//! HTTP adapter for the entry point routes
//!
//! Loads the browser's session from a cookie, runs the entry point and
//! answers with a redirect. [`SocialiteHandler`] is a hyper `Service`, and
//! [`SocialiteHandler::handle`] takes any `http::Request` for use inside a
//! larger router.

use bytes::Bytes;
use http::header::{CONTENT_TYPE, COOKIE, HeaderValue, LOCATION, SET_COOKIE};
use http::{Request, Response, StatusCode};
use http_body_util::Full;
use socialite_core::{Session, SessionId, SessionStore};
use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use url::Url;

use crate::client::QueryParams;
use crate::error::SocialiteError;
use crate::manager::ProviderManager;

/// Serves `/{prefix}/{code}/{action}`
///
/// # Examples
///
/// ```
/// use socialite_auth::handler::SocialiteHandler;
/// use socialite_auth::manager::ProviderManager;
/// use socialite_auth::registry::ProviderRegistry;
/// use socialite_auth::account_link::InMemoryAccountLinkStore;
/// use socialite_auth::users::InMemoryUserProvider;
/// use socialite_conf::SocialiteSettings;
/// use socialite_core::InMemorySessionStore;
/// use std::sync::Arc;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let manager = ProviderManager::new(
///     SocialiteSettings::default(),
///     Arc::new(ProviderRegistry::with_builtin_providers()),
///     Arc::new(InMemoryAccountLinkStore::new()),
///     Arc::new(InMemoryUserProvider::new("customers")),
/// )
/// .unwrap();
/// let handler = SocialiteHandler::new(Arc::new(manager), Arc::new(InMemorySessionStore::new()));
///
/// let request = http::Request::get("/socialite/unknown/auth").body(()).unwrap();
/// let response = handler.handle(&request).await;
///
/// assert_eq!(response.status(), http::StatusCode::FOUND);
/// assert_eq!(response.headers()["location"], "http://localhost/login");
/// # });
/// ```
#[derive(Clone)]
pub struct SocialiteHandler {
	manager: Arc<ProviderManager>,
	sessions: Arc<dyn SessionStore>,
	cookie_name: String,
	secure_cookie: bool,
}

impl SocialiteHandler {
	pub fn new(manager: Arc<ProviderManager>, sessions: Arc<dyn SessionStore>) -> Self {
		let settings = manager.settings();
		let cookie_name = settings.session_cookie_name.clone();
		let secure_cookie = Url::parse(&settings.base_url)
			.map(|base| base.scheme() == "https")
			.unwrap_or(false);
		Self {
			manager,
			sessions,
			cookie_name,
			secure_cookie,
		}
	}

	pub fn manager(&self) -> &ProviderManager {
		&self.manager
	}

	/// Answer one request
	///
	/// Paths outside the entry point pattern get `404`. A provider that is
	/// registered without an implementation gets `500`.
	pub async fn handle<B>(&self, request: &Request<B>) -> Response<Full<Bytes>> {
		let Some(entry) = self.manager.routes().match_path(request.uri().path()) else {
			return plain_response(StatusCode::NOT_FOUND, "Not Found");
		};
		let query = QueryParams::parse(request.uri().query().unwrap_or_default());

		let session_id = self
			.session_id(request)
			.unwrap_or_else(|| self.sessions.create_session_id());
		let mut session = self
			.sessions
			.load(&session_id)
			.await
			.unwrap_or_else(Session::new);

		let result = self
			.manager
			.run_entry_point(&mut session, &entry.provider, &entry.action, &query)
			.await;
		self.sessions.save(&session_id, &session).await;

		let mut response = match result {
			Ok(redirect) => {
				let mut response = Response::new(Full::new(Bytes::new()));
				*response.status_mut() = redirect.status();
				match HeaderValue::from_str(redirect.location()) {
					Ok(location) => {
						response.headers_mut().insert(LOCATION, location);
					}
					Err(error) => {
						tracing::error!(location = redirect.location(), %error, "unusable redirect location");
						return plain_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error");
					}
				}
				response
			}
			Err(error) => server_error(&error),
		};

		if let Ok(cookie) = HeaderValue::from_str(&self.cookie_header(&session_id)) {
			response.headers_mut().insert(SET_COOKIE, cookie);
		}
		response
	}

	fn session_id<B>(&self, request: &Request<B>) -> Option<SessionId> {
		let header = request.headers().get(COOKIE)?.to_str().ok()?;
		header.split(';').find_map(|cookie| {
			let (name, value) = cookie.trim().split_once('=')?;
			(name == self.cookie_name && !value.is_empty()).then(|| value.to_string())
		})
	}

	fn cookie_header(&self, session_id: &str) -> String {
		let mut parts = vec![
			format!("{}={}", self.cookie_name, session_id),
			"Path=/".to_string(),
			"HttpOnly".to_string(),
		];
		if self.secure_cookie {
			parts.push("Secure".to_string());
		}
		parts.push("SameSite=Lax".to_string());
		parts.join("; ")
	}
}

impl<B> hyper::service::Service<Request<B>> for SocialiteHandler {
	type Response = Response<Full<Bytes>>;
	type Error = Infallible;
	type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

	fn call(&self, request: Request<B>) -> Self::Future {
		let handler = self.clone();
		// The body is never read
		let (parts, _) = request.into_parts();
		let request = Request::from_parts(parts, ());
		Box::pin(async move { Ok(handler.handle(&request).await) })
	}
}

fn server_error(error: &SocialiteError) -> Response<Full<Bytes>> {
	tracing::error!(%error, "socialite entry point failed");
	plain_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
}

fn plain_response(status: StatusCode, body: &'static str) -> Response<Full<Bytes>> {
	let mut response = Response::new(Full::new(Bytes::from_static(body.as_bytes())));
	*response.status_mut() = status;
	response
		.headers_mut()
		.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"));
	response
}
