use axum::{routing::get, Router};
use crate::config::state::AppState;
use super::handler;

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handler::health_handler))
}
