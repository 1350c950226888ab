use axum::{
    extract::{Request, State},
    http::{
        header::{AUTHORIZATION, COOKIE},
        HeaderMap, HeaderValue, StatusCode,
    },
    middleware::Next,
    response::Response,
};
use axum::http::header::InvalidHeaderValue;
use serde_json::json;

use crate::config::state::AppState;
use crate::database::Session;
use crate::utils::response_handler::HandlerResponse;

/// Cookie carrying the session token
pub const SESSION_COOKIE: &str = "session_token";

/// Session context stored in request extensions for protected handlers
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub session: Session,
}

/// Reads the token from the session cookie, falling back to `Authorization: Bearer`
pub fn session_token_from_headers(headers: &HeaderMap) -> Option<String> {
    cookie_value(headers, SESSION_COOKIE).or_else(|| bearer_token(headers))
}

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|header| header.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, value)| *key == name && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

/// `Set-Cookie` value issuing `token` for `max_age_seconds`
pub fn session_cookie(token: &str, max_age_seconds: u64) -> Result<HeaderValue, InvalidHeaderValue> {
    HeaderValue::from_str(&format!(
        "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_seconds}"
    ))
}

/// `Set-Cookie` value that makes the browser drop the session cookie
pub fn cleared_session_cookie() -> HeaderValue {
    HeaderValue::from_static("session_token=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// Middleware that rejects requests without a live session
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, HandlerResponse> {
    // 1. Extract the token
    let token: String = session_token_from_headers(request.headers()).ok_or_else(|| {
        HandlerResponse::new(StatusCode::UNAUTHORIZED)
            .message("Missing session token")
            .data(json!({ "error": "missing_session" }))
    })?;

    // 2. Validate against the session store
    let session: Session = match state.sessions.validate_session(&token).await {
        Ok(Some(session)) => session,
        Ok(None) => {
            return Err(HandlerResponse::new(StatusCode::UNAUTHORIZED)
                .message("Invalid or expired session")
                .data(json!({ "error": "invalid_session" })));
        }
        Err(e) => {
            tracing::error!("Session lookup failed: {}", e);
            return Err(HandlerResponse::new(StatusCode::INTERNAL_SERVER_ERROR)
                .message("Internal Service Error"));
        }
    };

    tracing::debug!(user_id = %session.user_id, "Session validated");

    // 3. Store in Request Extensions
    request.extensions_mut().insert(SessionContext { session });

    Ok(next.run(request).await)
}
