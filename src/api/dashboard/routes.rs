use axum::{middleware::from_fn_with_state, routing::get, Router};
use crate::api::middleware::session::require_session;
use crate::config::state::AppState;
use super::handler;

/// Session-protected dashboard routes
pub fn dashboard_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(handler::dashboard))
        .route_layer(from_fn_with_state(state, require_session))
}
