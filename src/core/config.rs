//! Session configuration
//!
//! Loads [`SessionConfig`] from a JSON file. Every field has a default, so a
//! partial file only overrides what it names.
//!
//! # Error Handling
//!
//! - [`SessionConfig::load`] surfaces I/O, parse and range errors to the caller
//! - [`SessionConfig::load_or_default`] logs the failure and falls back to defaults
//!
//! # Example file
//!
//! ```json
//! {
//!   "capacity": 100,
//!   "heartbeat_timeout_secs": 30,
//!   "sweep_interval_secs": 5
//! }
//! ```

use super::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

/// Default number of concurrent games the registry holds
pub const DEFAULT_CAPACITY: usize = 100;

/// Default silence after which a player is considered disconnected
pub const DEFAULT_HEARTBEAT_TIMEOUT_SECS: u64 = 30;

/// Default period of the liveness sweep
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 5;

/// Tunables for the game registry and the liveness sweeper
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Maximum number of games held at once
    pub capacity: usize,

    /// Seconds without a heartbeat before a player is marked disconnected
    pub heartbeat_timeout_secs: u64,

    /// Seconds between two liveness sweeps
    pub sweep_interval_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            heartbeat_timeout_secs: DEFAULT_HEARTBEAT_TIMEOUT_SECS,
            sweep_interval_secs: DEFAULT_SWEEP_INTERVAL_SECS,
        }
    }
}

impl SessionConfig {
    /// Read and validate a config file
    pub fn load(path: impl AsRef<Path>) -> CoreResult<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        let config: SessionConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a config file, falling back to defaults on any failure
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => {
                info!("[CONFIG] Loaded session config from {:?}", path);
                config
            }
            Err(e) => {
                warn!(
                    "[CONFIG] Failed to load session config at {:?}: {}. Using defaults.",
                    path, e
                );
                Self::default()
            }
        }
    }

    /// Reject values the registry or sweeper cannot run with
    pub fn validate(&self) -> CoreResult<()> {
        if self.capacity == 0 {
            return Err(CoreError::InvalidConfig {
                field: "capacity",
                message: "must hold at least one game".to_string(),
            });
        }
        if self.heartbeat_timeout_secs == 0 {
            return Err(CoreError::InvalidConfig {
                field: "heartbeat_timeout_secs",
                message: "must be at least one second".to_string(),
            });
        }
        if self.sweep_interval_secs == 0 {
            return Err(CoreError::InvalidConfig {
                field: "sweep_interval_secs",
                message: "must be at least one second".to_string(),
            });
        }
        Ok(())
    }

    pub fn heartbeat_timeout(&self) -> Duration {
        Duration::from_secs(self.heartbeat_timeout_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SessionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.capacity, 100);
        assert_eq!(config.heartbeat_timeout(), Duration::from_secs(30));
        assert_eq!(config.sweep_interval(), Duration::from_secs(5));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: SessionConfig =
            serde_json::from_str(r#"{"capacity": 8}"#).expect("Should deserialize");
        assert_eq!(config.capacity, 8);
        assert_eq!(config.heartbeat_timeout_secs, DEFAULT_HEARTBEAT_TIMEOUT_SECS);
        assert_eq!(config.sweep_interval_secs, DEFAULT_SWEEP_INTERVAL_SECS);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let config = SessionConfig {
            capacity: 0,
            ..SessionConfig::default()
        };
        match config.validate() {
            Err(CoreError::InvalidConfig { field, .. }) => assert_eq!(field, "capacity"),
            other => panic!("Expected InvalidConfig, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_sweep_interval_rejected() {
        let config = SessionConfig {
            sweep_interval_secs: 0,
            ..SessionConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let result = SessionConfig::load("/definitely/not/here/session.json");
        assert!(matches!(result, Err(CoreError::ConfigIo(_))));
    }

    #[test]
    fn test_load_or_default_falls_back() {
        let config = SessionConfig::load_or_default("/definitely/not/here/session.json");
        assert_eq!(config, SessionConfig::default());
    }
}
