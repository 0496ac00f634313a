use anyhow::{Context, Result};
use backend::api::{self, AppState};
use backend::config::ServerArgs;
use chess_session::game::{LivenessSweeper, Registry};
use clap::Parser;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("backend=info,chess_session=info")),
        )
        .init();

    let args = ServerArgs::parse();
    let config = args
        .session_config()
        .context("invalid session configuration")?;

    let registry = Registry::shared(config.capacity);
    let sweeper = LivenessSweeper::spawn(
        registry.clone(),
        config.sweep_interval(),
        config.heartbeat_timeout(),
    );

    let state = AppState::new(registry, args.allow_shutdown);
    let shutdown = state.shutdown.clone();
    let app = api::router(state);

    let listener = TcpListener::bind(args.bind)
        .await
        .with_context(|| format!("binding {}", args.bind))?;
    tracing::info!(
        "[BACKEND] Listening on {} (capacity {} games)",
        args.bind,
        config.capacity
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await
        .context("server error")?;

    sweeper.stop();
    tracing::info!("[BACKEND] Server stopped");
    Ok(())
}

/// Resolves on Ctrl-C or when a client sends the shutdown message
async fn shutdown_signal(requested: Arc<Notify>) {
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                tracing::warn!("[BACKEND] Could not listen for Ctrl-C: {}", e);
                requested.notified().await;
            }
        }
        _ = requested.notified() => {}
    }
}
