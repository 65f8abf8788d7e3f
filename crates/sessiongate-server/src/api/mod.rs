// ABOUTME: API module containing all HTTP handler functions for the sessiongate REST API.
// ABOUTME: Organized into sub-modules for session introspection, command submission, and the event feed.

pub mod commands;
pub mod events;
pub mod session;
pub mod stream;

use axum::body::Body;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Serialize `value` as a 200 JSON response. Encoding failures are logged and
/// yield an empty body; there is no separate error status for them.
pub(crate) fn to_json<T: Serialize + ?Sized>(value: &T) -> Response {
    let body = match serde_json::to_vec(value) {
        Ok(body) => Body::from(body),
        Err(e) => {
            tracing::error!("error while encoding object to JSON: {}", e);
            Body::empty()
        }
    };
    ([(header::CONTENT_TYPE, "application/json")], body).into_response()
}

pub(crate) fn bad_request() -> Response {
    (StatusCode::BAD_REQUEST, "Bad Request").into_response()
}

pub(crate) fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "Not Found").into_response()
}
