//! # TC Telemetry
//!
//! Logging setup shared by the toolkit's binaries.
//!
//! Library crates only emit `tracing` events; this crate installs the
//! subscriber that renders them, either as human-readable lines or as JSON.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tc_telemetry::{init_logging, TelemetryConfig};
//!
//! let config = TelemetryConfig::for_service("tc-watch");
//! init_logging(&config)?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod config;
mod logging;

pub use config::{TelemetryConfig, DEFAULT_LOG_LEVEL, DEFAULT_SERVICE_NAME};
pub use logging::{build_filter, init_logging};

/// Telemetry initialization errors
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// A global subscriber could not be installed
    #[error("Failed to install subscriber: {0}")]
    SubscriberInit(String),
}

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
