//! Command line and environment configuration of the server

use chess_session::core::{CoreResult, SessionConfig};
use clap::{ArgAction, Parser};
use std::net::SocketAddr;
use std::path::PathBuf;

/// CLI arguments. Every flag can also come from the environment or `.env`.
#[derive(Parser, Debug, Clone)]
#[command(name = "backend")]
#[command(about = "Two-player chess session server")]
pub struct ServerArgs {
    /// HTTP listen address.
    #[arg(long, env = "CHESS_BIND", default_value = "127.0.0.1:2137")]
    pub bind: SocketAddr,

    /// JSON session config file. Missing or invalid files fall back to defaults.
    #[arg(long, env = "CHESS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Maximum number of concurrent games.
    #[arg(long, env = "CHESS_CAPACITY")]
    pub capacity: Option<usize>,

    /// Seconds of silence before a player is marked disconnected.
    #[arg(long, env = "CHESS_HEARTBEAT_TIMEOUT_SECS")]
    pub heartbeat_timeout_secs: Option<u64>,

    /// Seconds between liveness sweeps.
    #[arg(long, env = "CHESS_SWEEP_INTERVAL_SECS")]
    pub sweep_interval_secs: Option<u64>,

    /// Honour the shutdown message.
    #[arg(long, env = "CHESS_ALLOW_SHUTDOWN", default_value_t = true, action = ArgAction::Set)]
    pub allow_shutdown: bool,
}

impl ServerArgs {
    /// File config (or defaults) with command line overrides applied on top
    pub fn session_config(&self) -> CoreResult<SessionConfig> {
        let mut config = match &self.config {
            Some(path) => SessionConfig::load_or_default(path),
            None => SessionConfig::default(),
        };

        if let Some(capacity) = self.capacity {
            config.capacity = capacity;
        }
        if let Some(secs) = self.heartbeat_timeout_secs {
            config.heartbeat_timeout_secs = secs;
        }
        if let Some(secs) = self.sweep_interval_secs {
            config.sweep_interval_secs = secs;
        }

        config.validate()?;
        Ok(config)
    }
}
