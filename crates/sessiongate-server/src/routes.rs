// ABOUTME: Route definitions for the sessiongate HTTP API.
// ABOUTME: Assembles the session and events routes with the auth gate and response shaper into one Router.

use axum::Router;
use axum::http::Method;
use axum::response::{IntoResponse, Response};
use axum::routing::options;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::app_state::SharedState;
use crate::auth::AuthLayer;
use crate::config::GatewayConfig;
use crate::headers::{SecurityHeadersLayer, preflight};

/// Build the complete Axum router with all routes, middleware, and shared state.
///
/// Layer order, outermost first: tracing, response shaper, credential gate.
pub fn create_router(state: SharedState, config: &GatewayConfig) -> Router {
    // OPTIONS goes to the CORS preflight; every other method to the route handler.
    let session = || options(preflight).fallback(api::session::session_route);
    let events = options(preflight).fallback(api::events::events_route);

    Router::new()
        .route("/api/session", session())
        .route("/api/session/{*rest}", session())
        .route("/api/events", events)
        .fallback(fallback)
        .layer(AuthLayer::new(config.credentials.clone()))
        .layer(SecurityHeadersLayer::new(config.allow_origin.clone()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Unknown paths: preflight still answers 204, anything else is 404.
async fn fallback(method: Method) -> Response {
    if method == Method::OPTIONS {
        preflight().await.into_response()
    } else {
        api::not_found()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_state::AppState;
    use crate::auth::Credentials;
    use crate::config::EventFeedMode;
    use axum::body::Body;
    use axum::http::{StatusCode, header};
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use http::Request;
    use sessiongate_core::{
        AccessPoint, BleDevice, Endpoint, HidDevice, Module, Session, SessionState, Station,
    };
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;

    const STATION: &str = "aa:bb:cc:dd:ee:ff";
    const CLIENT: &str = "11:22:33:44:55:66";

    fn seeded_session() -> Arc<Session> {
        let mut state = SessionState::new(
            Default::default(),
            Endpoint::new("192.168.1.10", "de:ad:be:ef:00:01").with_hostname("probe"),
            Endpoint::new("192.168.1.1", "de:ad:be:ef:00:fe").with_vendor("Netgear"),
        );
        state.env.set("iface", "wlan0");
        state.modules.push(Module::new("wifi", "WiFi recon"));
        state
            .lan
            .add(Endpoint::new("192.168.1.20", "0a:1b:2c:3d:4e:5f").with_hostname("laptop"));
        let mut ap = AccessPoint::new(Station::new(STATION, "home-net", 6));
        ap.add_client(Station::new(CLIENT, "phone", 6));
        state.wifi.add(ap);
        state.ble.add(BleDevice::new("c0:ff:ee:00:00:01", "tracker"));
        state.hid.add(HidDevice::new("0a:0b:0c:0d:0e", "logitech"));
        state.packets.track("TCP", "192.168.1.10", "192.168.1.1", 64);
        Arc::new(Session::new(state))
    }

    fn test_app_with(config: GatewayConfig) -> (Arc<Session>, Router) {
        let session = seeded_session();
        let state = Arc::new(AppState::with_interpreter(
            Arc::clone(&session),
            config.event_feed,
        ));
        (session, create_router(state, &config))
    }

    fn test_app() -> (Arc<Session>, Router) {
        test_app_with(GatewayConfig::default())
    }

    fn authed_config() -> GatewayConfig {
        GatewayConfig {
            credentials: Credentials::new("admin", "s3cret"),
            ..GatewayConfig::default()
        }
    }

    fn basic(user: &str, pass: &str) -> String {
        format!("Basic {}", STANDARD.encode(format!("{user}:{pass}")))
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let resp = app
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    async fn text(resp: Response) -> String {
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(body.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn full_session_snapshot() {
        let (_, app) = test_app();
        let (status, json) = get(app, "/api/session").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["interface"]["hostname"], "probe");
        assert_eq!(json["gateway"]["vendor"], "Netgear");
        assert_eq!(json["modules"][0]["name"], "wifi");
    }

    #[tokio::test]
    async fn collection_views() {
        for (uri, check) in [
            ("/api/session/env", "/data/iface"),
            ("/api/session/gateway", "/ipv4"),
            ("/api/session/interface", "/mac"),
            ("/api/session/modules", "/0/running"),
            ("/api/session/options", "/debug"),
            ("/api/session/packets", "/stats/pkt_received"),
        ] {
            let (_, app) = test_app();
            let (status, json) = get(app, uri).await;
            assert_eq!(status, StatusCode::OK, "{uri}");
            assert!(json.pointer(check).is_some(), "{uri} missing {check}: {json}");
        }

        let (_, app) = test_app();
        let (status, json) = get(app, "/api/session/started-at").await;
        assert_eq!(status, StatusCode::OK);
        assert!(json.is_string());
    }

    #[tokio::test]
    async fn keyed_views_return_collection_without_id() {
        for (uri, field) in [
            ("/api/session/lan", "hosts"),
            ("/api/session/wifi", "aps"),
            ("/api/session/ble", "devices"),
            ("/api/session/hid", "devices"),
        ] {
            let (_, app) = test_app();
            let (status, json) = get(app, uri).await;
            assert_eq!(status, StatusCode::OK, "{uri}");
            assert_eq!(json[field].as_array().unwrap().len(), 1, "{uri}");
        }
    }

    #[tokio::test]
    async fn keyed_lookup_ignores_case() {
        let (_, app) = test_app();

        let (s1, lower) = get(app.clone(), "/api/session/lan/0a:1b:2c:3d:4e:5f").await;
        let (s2, upper) = get(app, "/api/session/lan/0A:1B:2C:3D:4E:5F").await;

        assert_eq!(s1, StatusCode::OK);
        assert_eq!(s2, StatusCode::OK);
        assert_eq!(lower, upper);
        assert_eq!(lower["hostname"], "laptop");
    }

    #[tokio::test]
    async fn keyed_lookup_decodes_percent_encoded_id() {
        let (_, app) = test_app();

        let (s1, plain) = get(app.clone(), "/api/session/lan/0a:1b:2c:3d:4e:5f").await;
        let (s2, encoded) = get(app.clone(), "/api/session/lan/0A%3A1B%3A2C%3A3D%3A4E%3A5F").await;
        assert_eq!(s1, StatusCode::OK);
        assert_eq!(s2, StatusCode::OK);
        assert_eq!(plain, encoded);

        let (status, json) = get(app, "/api/session/wifi/11%3A22%3A33%3A44%3A55%3A66").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["hostname"], "phone");
    }

    #[tokio::test]
    async fn snapshot_waits_for_writer_and_sees_its_changes() {
        let (session, app) = test_app();

        let mut guard = session.write().await;
        let pending = tokio::spawn(get(app, "/api/session/env"));

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!pending.is_finished(), "GET must block while the session is written");

        guard.env.set("iface", "mon0");
        drop(guard);

        let (status, json) = tokio::time::timeout(Duration::from_secs(2), pending)
            .await
            .expect("GET should complete once the writer releases the lock")
            .unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["iface"], "mon0");
    }

    #[tokio::test]
    async fn wifi_falls_back_to_clients() {
        let (_, app1) = test_app();
        let (status, json) = get(app1, &format!("/api/session/wifi/{STATION}")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["hostname"], "home-net");

        let (_, app2) = test_app();
        let (status, json) = get(app2, &format!("/api/session/wifi/{CLIENT}")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["hostname"], "phone");
    }

    #[tokio::test]
    async fn keyed_miss_is_plain_not_found() {
        for uri in [
            "/api/session/lan/ff:ff:ff:ff:ff:ff",
            "/api/session/ble/ff:ff:ff:ff:ff:ff",
            "/api/session/hid/ff:ff:ff:ff:ff",
            "/api/session/wifi/ff:ff:ff:ff:ff:ff",
        ] {
            let (_, app) = test_app();
            let resp = app
                .oneshot(Request::get(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
            assert_eq!(text(resp).await, "Not Found");
        }
    }

    #[tokio::test]
    async fn unknown_session_path_is_not_found() {
        let (_, app) = test_app();
        let (status, _) = get(app, "/api/session/teleport").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, app) = test_app();
        let (status, _) = get(app, "/nowhere").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn query_string_does_not_affect_matching() {
        let (_, app) = test_app();
        let (status, json) = get(app, "/api/session/env?pretty=1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["iface"], "wlan0");
    }

    #[tokio::test]
    async fn unsupported_method_is_bad_request() {
        for method in [Method::PUT, Method::DELETE, Method::PATCH] {
            let (_, app) = test_app();
            let resp = app
                .oneshot(
                    Request::builder()
                        .method(method.clone())
                        .uri("/api/session")
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{method}");
            assert_eq!(text(resp).await, "Bad Request");
        }
    }

    #[tokio::test]
    async fn post_runs_command_against_session() {
        let (session, app) = test_app();

        let resp = app
            .oneshot(
                Request::post("/api/session")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"cmd":"wifi.recon on"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(text(resp).await, r#"{"success":true,"message":""}"#);
        assert!(session.read().await.module("wifi").unwrap().running);
    }

    #[tokio::test]
    async fn post_empty_command_returns_interpreter_error() {
        let (_, app) = test_app();

        let resp = app
            .oneshot(
                Request::post("/api/session")
                    .body(Body::from(r#"{"cmd":""}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(text(resp).await, "empty command");
    }

    #[tokio::test]
    async fn auth_required_when_configured() {
        let (_, app) = test_app_with(authed_config());
        let uri = "/api/session/wifi/AA:BB:CC:DD:EE:FF";

        let resp = app
            .clone()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(resp.headers()[header::X_FRAME_OPTIONS], "DENY");

        let mut bodies = Vec::new();
        for uri in [uri, "/api/session/wifi/aa:bb:cc:dd:ee:ff"] {
            let resp = app
                .clone()
                .oneshot(
                    Request::get(uri)
                        .header("authorization", basic("admin", "s3cret"))
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::OK);
            bodies.push(text(resp).await);
        }
        assert_eq!(bodies[0], bodies[1]);
    }

    #[tokio::test]
    async fn rejected_auth_runs_no_command() {
        let (session, app) = test_app_with(authed_config());

        let resp = app
            .oneshot(
                Request::post("/api/session")
                    .header("authorization", basic("admin", "guess"))
                    .body(Body::from(r#"{"cmd":"wifi on"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert!(!session.read().await.module("wifi").unwrap().running);
        assert!(session.events().is_empty().await);
    }

    #[tokio::test]
    async fn rejected_auth_keeps_event_history() {
        let (session, app) = test_app_with(authed_config());
        session.events().add("sys.log", serde_json::json!("keep me")).await;

        for auth in [None, Some(basic("admin", "guess"))] {
            let mut req = Request::delete("/api/events");
            if let Some(auth) = auth {
                req = req.header("authorization", auth);
            }
            let resp = app
                .clone()
                .oneshot(req.body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        }

        assert_eq!(session.events().len().await, 1);
    }

    #[tokio::test]
    async fn preflight_skips_auth_everywhere() {
        for uri in ["/api/session", "/api/session/lan/x", "/api/events", "/whatever"] {
            let (_, app) = test_app_with(authed_config());
            let resp = app
                .oneshot(Request::options(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::NO_CONTENT, "{uri}");
            assert_eq!(resp.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
            assert!(text(resp).await.is_empty());
        }
    }

    #[tokio::test]
    async fn events_pull_window_and_clear() {
        let (session, app) = test_app();
        for i in 0..4 {
            session.events().add("sys.log", serde_json::json!(i)).await;
        }

        let (status, json) = get(app.clone(), "/api/events?n=2").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json.as_array().unwrap().len(), 2);
        assert_eq!(json[0]["data"], 2);
        assert_eq!(json[1]["data"], 3);

        let (_, json) = get(app.clone(), "/api/events?n=-3").await;
        assert_eq!(json, serde_json::json!([]));

        let (_, json) = get(app.clone(), "/api/events?n=lots").await;
        assert_eq!(json.as_array().unwrap().len(), 4);

        let (_, json) = get(app.clone(), "/api/events?n=%203").await;
        assert_eq!(json.as_array().unwrap().len(), 4);

        for _ in 0..2 {
            let resp = app
                .clone()
                .oneshot(Request::delete("/api/events").body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::OK);
            assert!(text(resp).await.is_empty());
        }

        let (_, json) = get(app, "/api/events").await;
        assert_eq!(json, serde_json::json!([]));
    }

    #[tokio::test]
    async fn events_other_methods_are_bad_request() {
        let (_, app) = test_app();
        let resp = app
            .oneshot(Request::post("/api/events").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn stream_mode_never_pulls() {
        let config = GatewayConfig {
            event_feed: EventFeedMode::Stream,
            ..GatewayConfig::default()
        };
        let (session, app) = test_app_with(config);
        session.events().add("sys.log", serde_json::json!("x")).await;

        let resp = app
            .oneshot(Request::get("/api/events").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert!(resp.status().is_client_error(), "got {}", resp.status());
        assert_ne!(
            resp.headers().get(header::CONTENT_TYPE).map(|v| v.as_bytes()),
            Some(&b"application/json"[..])
        );
    }
}
