//! Mock OAuth2 provider for testing

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::{Method, Request, Response, StatusCode, body::Incoming};
use hyper_util::rt::TokioIo;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// Error simulation mode
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorMode {
	Success,
	InvalidResponse,
	Unauthorized,
	ServerError,
}

/// A request the server received
#[derive(Clone, Debug)]
pub struct RecordedRequest {
	pub path: String,
	pub query: Option<String>,
	pub authorization: Option<String>,
	/// Decoded form body (token endpoint)
	pub form: HashMap<String, String>,
}

struct MockServerState {
	error_mode: ErrorMode,
	access_token: String,
	profile: Value,
	requests: Vec<RecordedRequest>,
}

/// Mock OAuth2 provider serving `/authorize`, `/token` and `/userinfo`
pub struct MockOAuthServer {
	state: Arc<Mutex<MockServerState>>,
	local_addr: SocketAddr,
}

impl MockOAuthServer {
	pub async fn new() -> Self {
		let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
		let local_addr = listener.local_addr().unwrap();

		let state = Arc::new(Mutex::new(MockServerState {
			error_mode: ErrorMode::Success,
			access_token: "test_access_token".to_string(),
			profile: json!({
				"id": "test_user",
				"name": "Test User",
				"email": "test@example.com",
			}),
			requests: Vec::new(),
		}));

		let state_clone = state.clone();
		tokio::spawn(async move {
			let state = state_clone;
			loop {
				if let Ok((stream, _)) = listener.accept().await {
					let io = TokioIo::new(stream);
					let state = state.clone();

					tokio::spawn(async move {
						let service = hyper::service::service_fn(move |req: Request<Incoming>| {
							let state = state.clone();
							async move { handle_request(req, state).await }
						});

						let _ = hyper::server::conn::http1::Builder::new()
							.serve_connection(io, service)
							.await;
					});
				}
			}
		});

		Self { state, local_addr }
	}

	pub fn set_error_mode(&self, mode: ErrorMode) {
		self.state.lock().unwrap().error_mode = mode;
	}

	pub fn set_access_token(&self, token: &str) {
		self.state.lock().unwrap().access_token = token.to_string();
	}

	/// Profile returned by `/userinfo`
	pub fn set_profile(&self, profile: Value) {
		self.state.lock().unwrap().profile = profile;
	}

	pub fn requests(&self) -> Vec<RecordedRequest> {
		self.state.lock().unwrap().requests.clone()
	}

	pub fn last_request(&self, path: &str) -> Option<RecordedRequest> {
		self.requests().into_iter().rev().find(|r| r.path == path)
	}

	pub fn base_url(&self) -> String {
		format!("http://{}", self.local_addr)
	}

	pub fn authorization_url(&self) -> String {
		format!("{}/authorize", self.base_url())
	}

	pub fn token_url(&self) -> String {
		format!("{}/token", self.base_url())
	}

	pub fn userinfo_url(&self) -> String {
		format!("{}/userinfo", self.base_url())
	}
}

fn empty(status: StatusCode) -> Response<Full<Bytes>> {
	Response::builder()
		.status(status)
		.body(Full::default())
		.unwrap()
}

fn json_response(body: String) -> Response<Full<Bytes>> {
	Response::builder()
		.status(StatusCode::OK)
		.header("Content-Type", "application/json")
		.body(Full::from(Bytes::from(body)))
		.unwrap()
}

async fn handle_request(
	req: Request<Incoming>,
	state: Arc<Mutex<MockServerState>>,
) -> Result<Response<Full<Bytes>>, hyper::Error> {
	let method = req.method().clone();
	let path = req.uri().path().to_string();
	let query = req.uri().query().map(str::to_string);
	let authorization = req
		.headers()
		.get("authorization")
		.and_then(|value| value.to_str().ok())
		.map(str::to_string);
	let body = req.into_body().collect().await?.to_bytes();
	let form = serde_urlencoded::from_bytes::<Vec<(String, String)>>(&body)
		.map(|pairs| pairs.into_iter().collect())
		.unwrap_or_default();

	let mut state = state.lock().unwrap();
	state.requests.push(RecordedRequest {
		path: path.clone(),
		query,
		authorization,
		form,
	});

	match state.error_mode {
		ErrorMode::InvalidResponse => {
			return Ok(json_response("{invalid json!!! not valid".to_string()));
		}
		ErrorMode::Unauthorized => return Ok(empty(StatusCode::UNAUTHORIZED)),
		ErrorMode::ServerError => return Ok(empty(StatusCode::INTERNAL_SERVER_ERROR)),
		ErrorMode::Success => {}
	}

	match (&method, path.as_str()) {
		(&Method::POST, "/token") => {
			let token = json!({
				"access_token": state.access_token,
				"token_type": "Bearer",
				"expires_in": 3600,
				"refresh_token": "test_refresh_token",
			});
			Ok(json_response(token.to_string()))
		}
		(&Method::GET, "/userinfo") => Ok(json_response(state.profile.to_string())),
		_ => Ok(empty(StatusCode::NOT_FOUND)),
	}
}
