//! Core module - configuration and infrastructure shared by every session component
//!
//! # Module Structure
//!
//! - `config` - [`SessionConfig`], the tunables of the registry and liveness sweeper
//! - `error` - [`CoreError`] for configuration loading failures
//!
//! Game logic lives in [`crate::game`]; this module carries no chess semantics.

pub mod config;
pub mod error;

// Re-export commonly used items
pub use config::SessionConfig;
pub use error::{CoreError, CoreResult};
