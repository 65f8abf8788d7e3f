// ABOUTME: Entry point for the sessiongate binary.
// ABOUTME: Parses CLI flags (with environment fallbacks), initializes tracing, builds the session, and serves the API.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use clap::builder::BoolishValueParser;
use sessiongate_core::{Endpoint, Module, Options, Session, SessionState};
use sessiongate_server::config::{DEFAULT_ALLOW_ORIGIN, DEFAULT_BIND};
use sessiongate_server::{AppState, ConfigError, GatewayConfig, create_router};

/// Control-and-introspection HTTP gateway over a shared recon session.
#[derive(Parser, Debug)]
#[command(name = "sessiongate", version, about)]
struct Cli {
    /// Socket address to bind
    #[arg(long, env = "SESSIONGATE_BIND", default_value = DEFAULT_BIND)]
    bind: String,

    /// Basic-auth username; auth stays off unless a password is set too
    #[arg(long, env = "SESSIONGATE_USERNAME", default_value = "")]
    username: String,

    /// Basic-auth password
    #[arg(long, env = "SESSIONGATE_PASSWORD", default_value = "", hide_env_values = true)]
    password: String,

    /// Access-Control-Allow-Origin value
    #[arg(long, env = "SESSIONGATE_ALLOW_ORIGIN", default_value = DEFAULT_ALLOW_ORIGIN)]
    allow_origin: String,

    /// Stream events over a WebSocket instead of serving windowed snapshots
    #[arg(
        long,
        env = "SESSIONGATE_WEBSOCKET",
        value_parser = BoolishValueParser::new()
    )]
    websocket: bool,

    /// Network interface the session is attached to
    #[arg(short, long, default_value = "eth0")]
    interface: String,
}

impl Cli {
    fn gateway_config(&self) -> Result<GatewayConfig, ConfigError> {
        GatewayConfig::build(
            &self.bind,
            self.username.clone(),
            self.password.clone(),
            &self.allow_origin,
            self.websocket,
        )
    }
}

/// Modules the interpreter can toggle with `<name> on|off`.
fn builtin_modules() -> Vec<Module> {
    vec![
        Module::new("net.recon", "Passive LAN host discovery"),
        Module::new("net.probe", "Active LAN host probing"),
        Module::new("wifi", "WiFi access point and client discovery"),
        Module::new("ble.recon", "Bluetooth Low Energy device discovery"),
        Module::new("hid", "Wireless HID device discovery"),
        Module::new("net.sniff", "Packet capture and protocol accounting"),
    ]
}

fn build_session(interface: &str) -> Arc<Session> {
    let options = Options {
        interface: interface.to_string(),
        ..Options::default()
    };
    let mut state = SessionState::new(options, Endpoint::default(), Endpoint::default());
    state.modules = builtin_modules();
    Arc::new(Session::new(state))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("sessiongate=info,tower_http=info")
            }),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.gateway_config().context("invalid configuration")?;
    let interface = cli.interface;

    let session = build_session(&interface);
    session
        .events()
        .add(
            "session.started",
            serde_json::json!({ "interface": interface }),
        )
        .await;

    let state = Arc::new(AppState::with_interpreter(
        Arc::clone(&session),
        config.event_feed,
    ));
    let app = create_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;

    tracing::info!(
        bind = %config.bind,
        auth = config.credentials.is_enabled(),
        feed = ?config.event_feed,
        "sessiongate listening"
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

    tracing::info!("sessiongate stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
    }
}
