// ABOUTME: Events route: windowed pull of the sorted history, WebSocket push, and clear.
// ABOUTME: Uses only the event pool's own lock, never the session lock.

use axum::body::Body;
use axum::extract::{FromRequestParts, Query, State, WebSocketUpgrade};
use axum::http::{Method, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use sessiongate_core::Event;

use super::{bad_request, stream, to_json};
use crate::app_state::SharedState;
use crate::config::EventFeedMode;

/// The last `n` events, oldest first.
///
/// A missing, unparsable, or too-large `n` selects everything; a negative
/// `n` selects nothing. Surrounding whitespace makes `n` unparsable.
pub fn window<'a>(events: &'a [Event], n: Option<&str>) -> &'a [Event] {
    let total = events.len();
    let n = match n.map(|raw| raw.parse::<i64>()) {
        Some(Ok(n)) if n < 0 => 0,
        Some(Ok(n)) => usize::try_from(n).map_or(total, |n| n.min(total)),
        _ => total,
    };
    &events[total - n..]
}

/// Handler for `/api/events`.
pub async fn events_route(State(state): State<SharedState>, req: Request<Body>) -> Response {
    let method = req.method().clone();
    if method == Method::GET {
        show_events(&state, req).await
    } else if method == Method::DELETE {
        clear_events(&state).await
    } else {
        bad_request()
    }
}

/// GET /api/events - Stream or pull depending on the configured feed mode.
async fn show_events(state: &SharedState, req: Request<Body>) -> Response {
    let (mut parts, _body) = req.into_parts();

    if state.event_feed == EventFeedMode::Stream {
        return match WebSocketUpgrade::from_request_parts(&mut parts, state).await {
            Ok(ws) => stream::stream_events(ws, state.session.events().subscribe()),
            Err(rejection) => {
                tracing::debug!("event stream upgrade rejected: {}", rejection);
                rejection.into_response()
            }
        };
    }

    // Repeated keys are allowed; the first `n` wins.
    let params = Query::<Vec<(String, String)>>::try_from_uri(&parts.uri)
        .map(|Query(params)| params)
        .unwrap_or_default();
    let n = params
        .iter()
        .find(|(key, _)| key == "n")
        .map(|(_, value)| value.as_str());

    let events = state.session.events().sorted().await;
    to_json(window(&events, n))
}

/// DELETE /api/events - Drop the whole history. No body.
async fn clear_events(state: &SharedState) -> Response {
    state.session.events().clear().await;
    StatusCode::OK.into_response()
}
