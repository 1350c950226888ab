// Global error handling for HTTP middleware layers

use axum::{BoxError, http::StatusCode};
use std::error::Error;
// tower's error type for timeouts
use tower::timeout::error::Elapsed;
// Axum uses http_body_util for length-limiting
use http_body_util::LengthLimitError;
use tracing::{error, warn};

use crate::utils::response_handler::HandlerResponse;

/// Maps errors escaping the layer stack to enveloped HTTP responses
pub async fn handle_global_error(err: BoxError) -> HandlerResponse {
    // 413 if the body was too large
    if is_caused_by::<LengthLimitError>(&*err) {
        warn!("Request body exceeded the configured limit");
        return HandlerResponse::new(StatusCode::PAYLOAD_TOO_LARGE)
            .message("Request body too large");
    }

    // 408 if the request took too long
    if is_caused_by::<Elapsed>(&*err) {
        warn!("Request exceeded the configured timeout");
        return HandlerResponse::new(StatusCode::REQUEST_TIMEOUT)
            .message("Request timed out");
    }

    // Otherwise, 500
    error!("Unhandled internal error: {err}");
    HandlerResponse::new(StatusCode::INTERNAL_SERVER_ERROR)
        .message("Unhandled internal error")
}

/// True when `err` itself or anything in its source chain is a `T`
pub fn is_caused_by<T: Error + 'static>(err: &(dyn Error + 'static)) -> bool {
    err.is::<T>() || find_cause::<T>(err).is_some()
}

/// Helper function to find specific error type in error chain
pub fn find_cause<'a, T: Error + 'static>(err: &'a (dyn Error + 'static)) -> Option<&'a T> {
    let mut source: Option<&(dyn Error + 'static)> = err.source();

    while let Some(s) = source {
        if let Some(typed) = s.downcast_ref::<T>() {
            return Some(typed);
        }
        source = s.source();
    }

    None
}
