// Every response leaves the service as a `ResponseFormat` envelope.
// Handlers return `HandlerResponse`; the wrapper middleware builds the envelope
// from it, or from the bare status for responses axum produced on its own.

use axum::{
    body::Body,
    http::{
        header::{CONTENT_LENGTH, CONTENT_TYPE}, HeaderName, HeaderValue, Request, Response,
        StatusCode,
    },
    middleware::Next,
    response::IntoResponse,
};
use chrono::Utc;
use tracing::{debug, error};
use std::convert::Infallible;
use serde_json::Value;
use serde::{Serialize, Deserialize};
use crate::utils::json::to_two_space_indented_json;

/// Standard JSON response format for all API endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct ResponseFormat {
    pub status: String,          // e.g. "OK", "NOT_FOUND"
    pub code: u16,
    pub data: Value,
    pub messages: Vec<String>,
    pub date: String,            // RFC 3339
}

impl ResponseFormat {
    /// Envelope for `status`, taking data and messages from the handler when there is one
    pub fn envelope(status: StatusCode, handler: Option<&HandlerResponse>) -> Self {
        let (data, messages) = handler
            .map(|h| (h.data.clone(), h.messages.clone()))
            .unwrap_or_default();

        Self {
            status: formatted_status(status),
            code: status.as_u16(),
            data,
            messages,
            date: Utc::now().to_rfc3339(),
        }
    }
}

/// What a handler answers with: status, payload, messages and extra headers such as `Set-Cookie`
#[derive(Debug, Clone)]
pub struct HandlerResponse {
    pub status_code: StatusCode,
    pub data: Value,
    pub messages: Vec<String>,
    pub headers: Vec<(HeaderName, HeaderValue)>,
}

impl HandlerResponse {
    pub fn new(status_code: StatusCode) -> Self {
        Self {
            status_code,
            data: Value::Null,
            messages: Vec::new(),
            headers: Vec::new(),
        }
    }

    pub fn data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.messages.push(message.into());
        self
    }

    /// Adds a header that survives the response wrapper
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.push((name, value));
        self
    }
}

impl IntoResponse for HandlerResponse {
    // The body is written by `response_wrapper`; the handler result rides along in the extensions
    fn into_response(self) -> axum::response::Response {
        let mut response: Response<Body> = self.status_code.into_response();

        for (name, value) in &self.headers {
            response.headers_mut().append(name.clone(), value.clone());
        }
        response.extensions_mut().insert(self);
        response
    }
}

/// "Not Found" -> "NOT_FOUND", falling back to the numeric code for unnamed statuses
pub fn formatted_status(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => reason.to_uppercase().replace(' ', "_"),
        None => status.as_str().to_string(),
    }
}

/// Middleware that replaces every response body with its `ResponseFormat` envelope
pub async fn response_wrapper(
    req: Request<Body>,
    next: Next,
) -> Result<Response<Body>, Infallible> {
    let (mut parts, _) = next.run(req).await.into_parts();

    let wrapped: ResponseFormat = ResponseFormat::envelope(parts.status, parts.extensions.get());

    match to_two_space_indented_json(&wrapped) {
        Ok(pretty) => debug!("\nFinal response:\n{}", pretty),
        Err(err) => error!("Failed to format response JSON: {:?}", err),
    }

    let body: Vec<u8> = serde_json::to_vec(&wrapped).unwrap_or_else(|_| b"{}".to_vec());
    parts.headers.remove(CONTENT_LENGTH);
    parts.headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    Ok(Response::from_parts(parts, Body::from(body)))
}
