// ABOUTME: Command submission handler: decodes {"cmd": "..."} and forwards it to the command runner.
// ABOUTME: Success is a JSON envelope; interpreter rejection is the interpreter's error as plain text.

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use super::{bad_request, to_json};
use crate::app_state::SharedState;

/// Request body for command submission.
#[derive(Debug, Default, Deserialize)]
pub struct CommandRequest {
    #[serde(default)]
    pub cmd: String,
}

/// Response body for a successfully executed command.
#[derive(Debug, Serialize)]
pub struct ApiResponse {
    pub success: bool,
    pub message: String,
}

impl CommandRequest {
    /// Decode a request body. Anything but a JSON object with an optional
    /// string `cmd` is rejected.
    pub fn decode(body: &[u8]) -> Option<Self> {
        if body.is_empty() {
            return None;
        }
        let value: serde_json::Value = serde_json::from_slice(body).ok()?;
        if !value.is_object() {
            return None;
        }
        serde_json::from_value(value).ok()
    }
}

/// POST /api/session - Run a command line through the interpreter.
///
/// The runner executes on its own task so that a client hanging up does
/// not abort a command that has already been issued.
pub async fn run_session_command(state: &SharedState, body: &[u8]) -> Response {
    let Some(req) = CommandRequest::decode(body) else {
        return bad_request();
    };

    let runner = Arc::clone(&state.runner);
    let task = tokio::spawn(async move { runner.run(&req.cmd).await });

    match task.await {
        Ok(Ok(())) => to_json(&ApiResponse {
            success: true,
            message: String::new(),
        }),
        Ok(Err(e)) => {
            tracing::debug!(error = %e, "command rejected");
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
        Err(e) => {
            tracing::error!("command task failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}
