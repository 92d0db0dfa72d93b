//! OAuth2 authorization code client
//!
//! Builds the authorization URL, keeps the CSRF state in the session,
//! exchanges the returned code for a token and fetches the user profile.

pub mod config;
pub mod pkce;
pub mod query;
pub mod state;
pub mod token;

pub use config::{OAuthClientConfig, TokenAuthMethod};
pub use pkce::{CodeChallenge, CodeVerifier};
pub use query::{CallbackQuery, QueryParams};
pub use state::{OAUTH_STATE_SESSION_KEY, StateData, generate_state};
pub use token::TokenResponse;

use socialite_core::Session;
use url::Url;

use crate::error::SocialiteError;

/// OAuth2 client for one provider
#[derive(Debug, Clone)]
pub struct OAuth2Client {
	http: reqwest::Client,
	config: OAuthClientConfig,
}

impl OAuth2Client {
	pub fn new(config: OAuthClientConfig) -> Self {
		Self::with_http_client(reqwest::Client::new(), config)
	}

	/// Use a preconfigured `reqwest` client (timeouts, proxies)
	pub fn with_http_client(http: reqwest::Client, config: OAuthClientConfig) -> Self {
		Self { http, config }
	}

	pub fn config(&self) -> &OAuthClientConfig {
		&self.config
	}

	/// Build the authorization URL
	///
	/// # Examples
	///
	/// ```
	/// use socialite_auth::client::{OAuth2Client, OAuthClientConfig};
	///
	/// let mut config = OAuthClientConfig::new(
	///     "https://provider.example/authorize",
	///     "https://provider.example/token",
	///     "https://provider.example/me",
	/// )
	/// .with_scopes(["email"]);
	/// config.client_id = "my-app".to_string();
	/// config.redirect_uri = "https://shop.example/socialite/test/callback".to_string();
	///
	/// let url = OAuth2Client::new(config).authorization_url("xyz", None).unwrap();
	///
	/// assert!(url.starts_with("https://provider.example/authorize?"));
	/// assert!(url.contains("client_id=my-app"));
	/// assert!(url.contains("state=xyz"));
	/// ```
	pub fn authorization_url(
		&self,
		state: &str,
		challenge: Option<&CodeChallenge>,
	) -> Result<String, SocialiteError> {
		let mut url = Url::parse(&self.config.authorize_url).map_err(|e| {
			SocialiteError::Configuration(format!(
				"authorization endpoint '{}': {}",
				self.config.authorize_url, e
			))
		})?;

		{
			let mut query = url.query_pairs_mut();
			query
				.append_pair("client_id", &self.config.client_id)
				.append_pair("redirect_uri", &self.config.redirect_uri)
				.append_pair("response_type", "code");
			if !self.config.scopes.is_empty() {
				query.append_pair("scope", &self.config.scope_param());
			}
			query.append_pair("state", state);
			if let Some(challenge) = challenge {
				query
					.append_pair("code_challenge", challenge.as_str())
					.append_pair("code_challenge_method", CodeChallenge::METHOD);
			}
			for (key, value) in &self.config.authorize_params {
				query.append_pair(key, value);
			}
		}

		Ok(url.into())
	}

	/// Start an authorization: park a fresh state in the session and return
	/// the URL to send the browser to
	pub fn begin(&self, session: &mut Session, provider: &str) -> Result<String, SocialiteError> {
		if self.config.client_id.is_empty() {
			return Err(SocialiteError::Configuration(format!(
				"provider '{}' has no client_id",
				provider
			)));
		}

		let state = generate_state();
		let verifier = self.config.use_pkce.then(CodeVerifier::generate);
		let challenge = verifier.as_ref().map(CodeVerifier::challenge);
		let url = self.authorization_url(&state, challenge.as_ref())?;

		StateData::new(provider, state, verifier.map(|v| v.as_str().to_string())).store(session)?;
		tracing::debug!(provider, pkce = self.config.use_pkce, "authorization started");

		Ok(url)
	}

	/// Finish an authorization from the callback query: verify the state,
	/// exchange the code and fetch the profile
	pub async fn complete(
		&self,
		session: &mut Session,
		provider: &str,
		query: &CallbackQuery,
	) -> Result<(TokenResponse, serde_json::Value), SocialiteError> {
		if let Some(error) = &query.error {
			// Drop the pending state so it cannot be replayed
			session.remove(OAUTH_STATE_SESSION_KEY);
			let message = query.error_description.as_deref().unwrap_or(error);
			return Err(SocialiteError::Provider(message.to_string()));
		}

		let pending = StateData::verify(session, provider, query.state.as_deref())?;
		let code = query.code.as_deref().ok_or_else(|| {
			SocialiteError::InvalidResponse("authorization code missing".to_string())
		})?;

		let token = self
			.exchange_code(code, pending.code_verifier.as_deref())
			.await?;
		let profile = self.fetch_user(&token.access_token).await?;

		Ok((token, profile))
	}

	/// Exchange an authorization code for tokens
	pub async fn exchange_code(
		&self,
		code: &str,
		code_verifier: Option<&str>,
	) -> Result<TokenResponse, SocialiteError> {
		let mut params = vec![
			("grant_type", "authorization_code"),
			("code", code),
			("redirect_uri", self.config.redirect_uri.as_str()),
			("client_id", self.config.client_id.as_str()),
		];
		if self.config.token_auth == TokenAuthMethod::RequestBody {
			params.push(("client_secret", self.config.client_secret.as_str()));
		}
		if let Some(verifier) = code_verifier {
			params.push(("code_verifier", verifier));
		}

		let mut request = self
			.http
			.post(&self.config.token_url)
			.header(reqwest::header::ACCEPT, "application/json")
			.form(&params);
		if self.config.token_auth == TokenAuthMethod::BasicAuth {
			request = request.basic_auth(&self.config.client_id, Some(&self.config.client_secret));
		}

		let response = request
			.send()
			.await
			.map_err(|e| SocialiteError::Network(e.to_string()))?;

		if !response.status().is_success() {
			let status = response.status();
			let error_body = response
				.text()
				.await
				.unwrap_or_else(|_| "Unknown error".to_string());

			return Err(SocialiteError::TokenExchange(format!(
				"Token exchange failed ({}): {}",
				status, error_body
			)));
		}

		let body = response.text().await?;
		let token: TokenResponse = serde_json::from_str(&body)?;
		Ok(token)
	}

	/// Fetch the raw profile of the token's owner
	pub async fn fetch_user(&self, access_token: &str) -> Result<serde_json::Value, SocialiteError> {
		let response = self
			.http
			.get(&self.config.userinfo_url)
			.query(&self.config.userinfo_params)
			.bearer_auth(access_token)
			.header(reqwest::header::ACCEPT, "application/json")
			.send()
			.await
			.map_err(|e| SocialiteError::Network(e.to_string()))?;

		if !response.status().is_success() {
			return Err(SocialiteError::Provider(format!(
				"profile request failed ({})",
				response.status()
			)));
		}

		let body = response.text().await?;
		Ok(serde_json::from_str(&body)?)
	}
}
