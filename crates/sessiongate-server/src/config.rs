// ABOUTME: Configuration loading and validation for the sessiongate HTTP gateway.
// ABOUTME: Validates the bind address, basic-auth credentials, CORS origin, and event feed mode.

use std::net::SocketAddr;

use axum::http::HeaderValue;
use thiserror::Error;

use crate::auth::Credentials;

pub const DEFAULT_BIND: &str = "127.0.0.1:8081";
pub const DEFAULT_ALLOW_ORIGIN: &str = "*";

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("bind is not a valid socket address: {0}")]
    InvalidBind(String),

    #[error("allow origin is not a valid header value: {0}")]
    InvalidOrigin(String),
}

/// How the events route delivers events to a client. Chosen once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventFeedMode {
    /// One-shot windowed JSON snapshot of the history.
    Pull,
    /// Live WebSocket feed of new events.
    Stream,
}

/// Gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub bind: SocketAddr,
    pub credentials: Credentials,
    pub allow_origin: HeaderValue,
    pub event_feed: EventFeedMode,
}

impl GatewayConfig {
    /// Validate and assemble a configuration from raw values.
    pub fn build(
        bind: &str,
        username: String,
        password: String,
        allow_origin: &str,
        websocket: bool,
    ) -> Result<Self, ConfigError> {
        let bind: SocketAddr = bind
            .parse()
            .map_err(|_| ConfigError::InvalidBind(bind.to_string()))?;

        let allow_origin = HeaderValue::from_str(allow_origin)
            .map_err(|_| ConfigError::InvalidOrigin(allow_origin.to_string()))?;

        let credentials = Credentials::new(username, password);
        if !credentials.is_enabled() && !bind.ip().is_loopback() {
            tracing::warn!(%bind, "listening on a non-loopback address without authentication");
        }

        Ok(Self {
            bind,
            credentials,
            allow_origin,
            event_feed: if websocket {
                EventFeedMode::Stream
            } else {
                EventFeedMode::Pull
            },
        })
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8081)),
            credentials: Credentials::default(),
            allow_origin: HeaderValue::from_static(DEFAULT_ALLOW_ORIGIN),
            event_feed: EventFeedMode::Pull,
        }
    }
}
