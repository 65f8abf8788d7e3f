// ABOUTME: HTTP gateway for sessiongate, providing session introspection, command submission, and the event feed.
// ABOUTME: Uses Axum with a basic-auth gate, a security-header shaper, and WebSocket event streaming.

pub mod api;
pub mod app_state;
pub mod auth;
pub mod config;
pub mod headers;
pub mod routes;

pub use app_state::{AppState, SharedState};
pub use auth::Credentials;
pub use config::{ConfigError, EventFeedMode, GatewayConfig};
pub use routes::create_router;
