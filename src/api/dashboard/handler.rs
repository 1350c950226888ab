use axum::{extract::Extension, http::StatusCode};
use serde_json::json;
use tracing::{info, instrument};

use crate::api::middleware::session::SessionContext;
use crate::utils::response_handler::HandlerResponse;

/// Greeting shown at the top of the dashboard
pub fn welcome_message(username: &str) -> String {
    format!("Welcome, {username}!")
}

/// Dashboard for the logged-in user
#[instrument(name = "dashboard", skip(ctx), fields(user_id = %ctx.session.user_id))]
pub async fn dashboard(Extension(ctx): Extension<SessionContext>) -> HandlerResponse {
    info!("Dashboard requested");

    let session = ctx.session;
    HandlerResponse::new(StatusCode::OK)
        .message("Dashboard loaded")
        .data(json!({
            "user_id": session.user_id,
            "username": session.username,
            "welcome_message": welcome_message(&session.username),
            "session_expires_at": session.expires_at.to_rfc3339(),
        }))
}
