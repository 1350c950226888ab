use axum::{middleware::from_fn_with_state, routing::post, Router};
use crate::api::middleware::session::require_session;
use crate::config::state::AppState;
use super::handler;

pub fn auth_routes(state: AppState) -> Router<AppState> {
    let protected: Router<AppState> = Router::new()
        .route("/auth/logout", post(handler::logout))
        .route_layer(from_fn_with_state(state, require_session));

    Router::new()
        .route("/auth/register", post(handler::register))
        .route("/auth/login", post(handler::login))
        .merge(protected)
}
