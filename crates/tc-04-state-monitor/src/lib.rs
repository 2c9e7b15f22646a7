//! # TC-04 State Monitor
//!
//! Off-chain watcher that polls a contract's getters and reports when the
//! tracked value changes.
//!
//! **Subsystem ID:** 4  
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)  
//! **Status:** Production-Ready
//!
//! ## Tick Semantics
//!
//! | Ledger reply | Outcome | Notification |
//! |--------------|---------|--------------|
//! | First successful read | `Updated` | yes |
//! | Same value as snapshot | `Unchanged` | no |
//! | Different value | `Updated` | yes |
//! | Transport error, non-zero exit, decode error | `Failed` | no (logged) |
//!
//! The interval is fixed. Cancellation is cooperative and checked between
//! ticks; it never interrupts a tick in flight.
//!
//! ## Module Structure
//!
//! ```text
//! tc-04-state-monitor/
//! ├── domain/          # CheckpointId, GetterResult, TickOutcome, MonitorError
//! ├── ports/           # LedgerQuery, SubmissionChannel
//! ├── adapters/        # HttpLedgerClient (ton-api v4), InMemoryLedger, RecordingChannel
//! ├── application/     # StateProbe implementations, StateMonitor, MonitorHandle
//! └── config.rs        # MonitorConfig, HttpLedgerConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports
pub use adapters::{HttpLedgerClient, InMemoryLedger, RecordingChannel};
pub use application::{
    BalanceProbe, FullStateProbe, LatestSenderProbe, MonitorHandle, StateMonitor, StateProbe,
    StorageProbe,
};
pub use config::{HttpLedgerConfig, MonitorConfig};
pub use domain::{
    AccountStatus, CheckpointId, GetterResult, MonitorError, MonitorPhase, MonitorStats,
    StateChange, SubmissionReceipt, TickOutcome,
};
pub use ports::{LedgerQuery, SubmissionChannel};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
