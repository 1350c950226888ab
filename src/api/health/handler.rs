use axum::{extract::State, http::StatusCode};
use serde_json::json;

use crate::config::state::AppState;
use crate::utils::response_handler::HandlerResponse;

/// Liveness probe naming the instance that answered
pub async fn health_handler(State(state): State<AppState>) -> HandlerResponse {
    let instance: String = hostname::get()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|_| "unknown".to_string());

    HandlerResponse::new(StatusCode::OK)
        .data(json!({
            "status": "ok",
            "environment": state.environment.environment,
            "instance": instance,
        }))
        .message("Service is healthy")
}
