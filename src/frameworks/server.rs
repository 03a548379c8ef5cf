// Framework bootstrap for the tictactoe server runtime.

use crate::frameworks::config;
use crate::interface_adapters::http::{game_status_labels, game_winner_labels};
use crate::interface_adapters::net::{self, ChannelBroadcaster, ConnectionTable, ws_handler};
use crate::interface_adapters::registry::InMemoryRegistry;
use crate::interface_adapters::state::AppState;
use crate::use_cases::SessionDirectory;

use axum::{Router, routing::get};
use std::io::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::mpsc;

fn init_runtime() {
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

pub async fn run(listener: tokio::net::TcpListener) -> Result<()> {
    let address = listener.local_addr()?;
    let state = build_state();

    let app = Router::new()
        .route("/ws", get(ws_handler))
        .route("/api/game_status", get(game_status_labels))
        .route("/api/game_winner", get(game_winner_labels))
        .with_state(state);

    tracing::info!(%address, "listening");

    // Serve app and report errors rather than panicking.
    axum::serve(listener, app).await.inspect_err(|e| {
        tracing::error!(error = %e, "server error");
    })
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    let address = SocketAddr::from(([127, 0, 0, 1], config::http_port()));

    // Bind TCP listener with error handling.
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .inspect_err(|e| {
            tracing::error!(%address, error = %e, "failed to bind");
        })?;

    run(listener).await
}

fn build_state() -> Arc<AppState> {
    let (broadcast_tx, broadcast_rx) = mpsc::channel(config::BROADCAST_CHANNEL_CAPACITY);
    let connections = Arc::new(ConnectionTable::new());
    // Single fan-out consumer keeps per-session snapshot ordering.
    tokio::spawn(net::snapshot_fanout(broadcast_rx, connections.clone()));

    let registry = Arc::new(InMemoryRegistry::new());
    let directory = Arc::new(SessionDirectory::new(
        ChannelBroadcaster::new(broadcast_tx),
        registry.clone(),
    ));

    Arc::new(AppState {
        directory,
        registry,
        connections,
    })
}
