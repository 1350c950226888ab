//! tests/common/mod.rs
//! Shared helper that spawns the app on an ephemeral port with in-memory stores
//! and drives it over HTTP.

#![allow(dead_code)]

use std::sync::Arc;

use login_dashboard::{create_app, AppState, EnvironmentVariables, SessionStore, UserStore};
use reqwest::header::{AUTHORIZATION, COOKIE, SET_COOKIE};
use reqwest::StatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// Credentials used by the login scenarios
pub const TEST_USERNAME: &str = "testuser";
pub const TEST_PASSWORD: &str = "secret123";

/// Configuration for spawned apps: cheap hashing, small body limit
pub fn test_environment() -> EnvironmentVariables {
    EnvironmentVariables {
        bcrypt_cost: 4,
        default_timeout_seconds: 5,
        max_request_body_size: 16 * 1024,
        ..EnvironmentVariables::default()
    }
}

/// Status, enveloped body and issued session token of one HTTP exchange
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Value,
    pub session_token: Option<String>,
    /// `Max-Age` of the session cookie, when one was set
    pub session_max_age: Option<u64>,
}

impl ApiResponse {
    async fn read(response: reqwest::Response) -> Self {
        let status: StatusCode = response.status();
        let session_cookie: Option<String> = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find(|value| value.starts_with("session_token="))
            .map(str::to_string);
        let session_token: Option<String> = session_cookie.as_deref().and_then(session_token_from_set_cookie);
        let session_max_age: Option<u64> = session_cookie.as_deref().and_then(max_age_from_set_cookie);
        let body: Value = response.json().await.unwrap_or(Value::Null);

        Self { status, body, session_token, session_max_age }
    }

    /// First envelope message, or "" when there is none
    pub fn message(&self) -> &str {
        self.body["messages"][0].as_str().unwrap_or_default()
    }
}

/// `session_token=<value>; ...` -> `<value>`; an emptied cookie yields `None`
pub fn session_token_from_set_cookie(header: &str) -> Option<String> {
    let pair: &str = header.split(';').next()?.trim();
    let value: &str = pair.strip_prefix("session_token=")?;
    (!value.is_empty()).then(|| value.to_string())
}

/// `...; Max-Age=<n>; ...` -> `n`
pub fn max_age_from_set_cookie(header: &str) -> Option<u64> {
    header
        .split(';')
        .find_map(|attr| attr.trim().strip_prefix("Max-Age="))
        .and_then(|value| value.parse().ok())
}

/// A running instance of the app plus handles on its stores.
#[derive(Debug, Clone)]
pub struct TestApp {
    pub base_url: String,
    pub users: Arc<dyn UserStore>,
    pub sessions: Arc<dyn SessionStore>,
    client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(test_environment()).await
    }

    pub async fn spawn_with(environment: EnvironmentVariables) -> Self {
        let state: AppState = AppState::in_memory(Arc::new(environment));
        let users: Arc<dyn UserStore> = state.users.clone();
        let sessions: Arc<dyn SessionStore> = state.sessions.clone();
        let app = create_app(state);

        // * Bind an ephemeral port and serve in the background
        let listener: TcpListener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let addr: std::net::SocketAddr = listener.local_addr().expect("Listener has no address");

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Server failed");
        });

        Self {
            base_url: format!("http://{addr}"),
            users,
            sessions,
            client: reqwest::Client::new(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn register(&self, username: &str, password: &str) -> ApiResponse {
        self.post_json("/auth/register", json!({ "username": username, "password": password })).await
    }

    pub async fn login(&self, username: &str, password: &str) -> ApiResponse {
        self.post_json("/auth/login", json!({ "username": username, "password": password })).await
    }

    /// GET /dashboard presenting `token` as the session cookie
    pub async fn dashboard(&self, token: Option<&str>) -> ApiResponse {
        let mut request = self.client.get(self.url("/dashboard"));
        if let Some(token) = token {
            request = request.header(COOKIE, format!("session_token={token}"));
        }
        ApiResponse::read(request.send().await.expect("Failed to execute request.")).await
    }

    /// GET /dashboard presenting `token` as a bearer token
    pub async fn dashboard_with_bearer(&self, token: &str) -> ApiResponse {
        let response = self
            .client
            .get(self.url("/dashboard"))
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .send()
            .await
            .expect("Failed to execute request.");
        ApiResponse::read(response).await
    }

    pub async fn logout(&self, token: &str) -> ApiResponse {
        let response = self
            .client
            .post(self.url("/auth/logout"))
            .header(COOKIE, format!("session_token={token}"))
            .send()
            .await
            .expect("Failed to execute request.");
        ApiResponse::read(response).await
    }

    pub async fn get(&self, path: &str) -> ApiResponse {
        let response = self.client.get(self.url(path)).send().await.expect("Failed to execute request.");
        ApiResponse::read(response).await
    }

    pub async fn post_json(&self, path: &str, body: Value) -> ApiResponse {
        let response = self
            .client
            .post(self.url(path))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request.");
        ApiResponse::read(response).await
    }

    /// POST with a raw body labelled as JSON
    pub async fn post_raw(&self, path: &str, body: Vec<u8>) -> ApiResponse {
        let response = self
            .client
            .post(self.url(path))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .expect("Failed to execute request.");
        ApiResponse::read(response).await
    }
}
