//! Shared utilities for totool
//!
//! Logging setup and environment-driven configuration used by the CLI and
//! by applications embedding the tool crates.

pub mod config;
pub mod logging;

pub use config::{Config, ConfigError, LogFormat};
pub use logging::{init_tracing, init_tracing_json, init_tracing_with};
