// ABOUTME: Session route: command submission on POST and snapshot introspection on GET.
// ABOUTME: GET dispatch runs entirely under the session read lock so each response is one consistent instant.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{Method, Uri};
use axum::response::Response;
use serde::Serialize;
use std::borrow::Cow;
use sessiongate_core::{Ble, Hid, Lan, SessionState};

use super::{bad_request, commands, not_found, to_json};
use crate::app_state::SharedState;

/// What a matched session path projects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Session,
    Env,
    Gateway,
    Interface,
    Modules,
    Lan,
    Options,
    Packets,
    StartedAt,
    Ble,
    Hid,
    WiFi,
}

#[derive(Debug, Clone, Copy)]
enum Rule {
    Exact(&'static str),
    /// Matches the path itself or the path followed by `/<identifier>`.
    Prefix(&'static str),
}

impl Rule {
    /// On a match, returns the identifier segment (empty if none).
    fn matches<'p>(&self, path: &'p str) -> Option<&'p str> {
        match *self {
            Rule::Exact(p) => (path == p).then_some(""),
            Rule::Prefix(p) => {
                let rest = path.strip_prefix(p)?;
                if rest.is_empty() {
                    Some("")
                } else {
                    rest.strip_prefix('/')
                }
            }
        }
    }
}

/// Ordered dispatch table. First match wins.
const ROUTES: &[(Rule, View)] = &[
    (Rule::Exact("/api/session"), View::Session),
    (Rule::Exact("/api/session/env"), View::Env),
    (Rule::Exact("/api/session/gateway"), View::Gateway),
    (Rule::Exact("/api/session/interface"), View::Interface),
    (Rule::Prefix("/api/session/modules"), View::Modules),
    (Rule::Prefix("/api/session/lan"), View::Lan),
    (Rule::Exact("/api/session/options"), View::Options),
    (Rule::Exact("/api/session/packets"), View::Packets),
    (Rule::Exact("/api/session/started-at"), View::StartedAt),
    (Rule::Prefix("/api/session/ble"), View::Ble),
    (Rule::Prefix("/api/session/hid"), View::Hid),
    (Rule::Prefix("/api/session/wifi"), View::WiFi),
];

fn resolve(path: &str) -> Option<(View, &str)> {
    ROUTES
        .iter()
        .find_map(|(rule, view)| rule.matches(path).map(|id| (*view, id)))
}

/// Handler for `/api/session` and everything below it.
pub async fn session_route(
    State(state): State<SharedState>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Response {
    if method == Method::POST {
        return commands::run_session_command(&state, &body).await;
    }
    if method != Method::GET {
        return bad_request();
    }

    let snapshot = state.session.read().await;
    let resp = show(&snapshot, uri.path());
    drop(snapshot);
    resp
}

/// Project the locked snapshot for `path`. The body is fully serialized
/// before returning, so the caller may release the lock afterwards.
fn show(state: &SessionState, path: &str) -> Response {
    let Some((view, id)) = resolve(path) else {
        return not_found();
    };
    // Identifiers may arrive percent-encoded (`AA%3ABB%3A...`).
    let mac = urlencoding::decode(id)
        .unwrap_or(Cow::Borrowed(id))
        .to_lowercase();

    match view {
        View::Session => to_json(state),
        View::Env => to_json(&state.env),
        View::Gateway => to_json(&state.gateway),
        View::Interface => to_json(&state.interface),
        View::Modules => to_json(&state.modules),
        View::Options => to_json(&state.options),
        View::Packets => to_json(&state.packets),
        View::StartedAt => to_json(&state.started_at),
        View::Lan => keyed(&state.lan, &mac, Lan::get),
        View::Ble => keyed(&state.ble, &mac, Ble::get),
        View::Hid => keyed(&state.hid, &mac, Hid::get),
        View::WiFi => {
            if mac.is_empty() {
                to_json(&state.wifi)
            } else if let Some(station) = state.wifi.get(&mac) {
                to_json(station)
            } else if let Some(client) = state.wifi.get_client(&mac) {
                to_json(client)
            } else {
                not_found()
            }
        }
    }
}

/// The whole collection when `mac` is empty, otherwise the single entry.
fn keyed<'a, C, E>(all: &'a C, mac: &str, lookup: fn(&'a C, &str) -> Option<&'a E>) -> Response
where
    C: Serialize,
    E: Serialize,
{
    if mac.is_empty() {
        return to_json(all);
    }
    match lookup(all, mac) {
        Some(entry) => to_json(entry),
        None => not_found(),
    }
}
