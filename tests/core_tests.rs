//! Integration tests for session configuration loading
//!
//! Writes real files to the temp directory and reads them back through the
//! public API, the way the backend does at startup.

use chess_session::core::{CoreError, SessionConfig};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Unique temp path per test so parallel runs do not collide
fn temp_config(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "chess-session-{}-{}.json",
        name,
        std::process::id()
    ));
    fs::write(&path, contents).expect("Should write temp config");
    path
}

#[test]
fn test_load_full_file() {
    let path = temp_config(
        "full",
        r#"{"capacity": 12, "heartbeat_timeout_secs": 45, "sweep_interval_secs": 2}"#,
    );

    let config = SessionConfig::load(&path).expect("Should load");
    assert_eq!(config.capacity, 12);
    assert_eq!(config.heartbeat_timeout(), Duration::from_secs(45));
    assert_eq!(config.sweep_interval(), Duration::from_secs(2));

    fs::remove_file(path).ok();
}

#[test]
fn test_load_rejects_malformed_json() {
    let path = temp_config("malformed", "{ capacity: ");

    let result = SessionConfig::load(&path);
    assert!(
        matches!(result, Err(CoreError::ConfigSerialization(_))),
        "Got {:?}",
        result
    );

    fs::remove_file(path).ok();
}

#[test]
fn test_load_rejects_zero_timeout() {
    let path = temp_config("zero", r#"{"heartbeat_timeout_secs": 0}"#);

    match SessionConfig::load(&path) {
        Err(CoreError::InvalidConfig { field, .. }) => {
            assert_eq!(field, "heartbeat_timeout_secs")
        }
        other => panic!("Expected InvalidConfig, got {:?}", other),
    }
    // The lenient loader never hands out an unusable config
    assert_eq!(SessionConfig::load_or_default(&path), SessionConfig::default());

    fs::remove_file(path).ok();
}

#[test]
fn test_config_round_trips_through_json() {
    let config = SessionConfig {
        capacity: 3,
        heartbeat_timeout_secs: 10,
        sweep_interval_secs: 1,
    };
    let path = temp_config(
        "roundtrip",
        &serde_json::to_string_pretty(&config).expect("Should serialize"),
    );

    assert_eq!(SessionConfig::load(&path).expect("Should load"), config);

    fs::remove_file(path).ok();
}
