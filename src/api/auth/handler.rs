use axum::{extract::{State, Extension}, Json, http::{header::SET_COOKIE, StatusCode}};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::api::middleware::session::{cleared_session_cookie, session_cookie, SessionContext};
use crate::config::state::AppState;
use crate::database::{Session, StoreError, User};
use crate::utils::response_handler::HandlerResponse;

/// Where a freshly logged-in user is sent
pub const DASHBOARD_PATH: &str = "/dashboard";

// =============================================================================
// DTOs
// =============================================================================

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user_id: Uuid,
    pub username: String,
    pub expires_at: String,
    pub redirect: &'static str,
}

// =============================================================================
// HANDLERS
// =============================================================================

/// Register a new user
#[instrument(name = "register", skip(state, payload), fields(username = %payload.username))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> HandlerResponse {
    match state.users.create_user(&payload.username, &payload.password).await {
        Ok(user) => {
            info!(user_id = %user.id, "User registered");
            HandlerResponse::new(StatusCode::CREATED)
                .message("User registered successfully")
                .data(json!({ "user_id": user.id, "username": user.username }))
        }
        Err(StoreError::DuplicateUser(_)) => {
            HandlerResponse::new(StatusCode::CONFLICT)
                .message("Username already registered")
                .data(json!({ "error": "duplicate_username" }))
        }
        Err(StoreError::InvalidInput(reason)) => {
            HandlerResponse::new(StatusCode::BAD_REQUEST)
                .message("Invalid registration request")
                .data(json!({ "error": reason }))
        }
        Err(e) => {
            error!("Registration failed: {}", e);
            HandlerResponse::new(StatusCode::INTERNAL_SERVER_ERROR)
                .message("Registration failed")
        }
    }
}

/// Login and create a session
#[instrument(name = "login", skip(state, payload), fields(username = %payload.username))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> HandlerResponse {
    // 1. Verify credentials
    let user: User = match state.users.verify_credentials(&payload.username, &payload.password).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            warn!("Rejected login");
            return HandlerResponse::new(StatusCode::UNAUTHORIZED)
                .message("Invalid credentials");
        }
        Err(e) => {
            error!("Login failed: {}", e);
            return HandlerResponse::new(StatusCode::INTERNAL_SERVER_ERROR)
                .message("Login failed");
        }
    };

    // 2. Create the session
    let session: Session = match state.sessions.create_session(&user).await {
        Ok(session) => session,
        Err(e) => {
            error!("Failed to create session: {}", e);
            return HandlerResponse::new(StatusCode::INTERNAL_SERVER_ERROR)
                .message("Failed to create session");
        }
    };

    // 3. Hand the token back as body field and cookie
    let cookie = match session_cookie(&session.token, session.lifetime_seconds()) {
        Ok(cookie) => cookie,
        Err(e) => {
            error!("Failed to build session cookie: {}", e);
            return HandlerResponse::new(StatusCode::INTERNAL_SERVER_ERROR)
                .message("Failed to create session");
        }
    };

    info!(user_id = %user.id, "Login successful");
    HandlerResponse::new(StatusCode::OK)
        .message("Login successful")
        .data(json!(AuthResponse {
            token: session.token,
            user_id: user.id,
            username: user.username,
            expires_at: session.expires_at.to_rfc3339(),
            redirect: DASHBOARD_PATH,
        }))
        .header(SET_COOKIE, cookie)
}

/// Revoke the current session
#[instrument(name = "logout", skip(state, ctx), fields(user_id = %ctx.session.user_id))]
pub async fn logout(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
) -> HandlerResponse {
    match state.sessions.revoke_session(&ctx.session.token).await {
        Ok(_) => HandlerResponse::new(StatusCode::OK)
            .message("Logged out")
            .header(SET_COOKIE, cleared_session_cookie()),
        Err(e) => {
            error!("Logout failed: {}", e);
            HandlerResponse::new(StatusCode::INTERNAL_SERVER_ERROR)
                .message("Logout failed")
        }
    }
}
