//! # State Monitor Configuration
//!
//! Configuration for the polling loop and the HTTP ledger adapter. Nothing
//! here reads the environment; callers fill these structs in.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tc_03_message_protocol::DecodeMode;

/// Default poll interval (the on-chain watcher script polls every 2 s).
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 2_000;

/// Default per-tick request budget.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 5_000;

/// Default notification channel capacity.
pub const DEFAULT_NOTIFICATION_BUFFER: usize = 64;

/// Public ton-api v4 endpoint (mainnet).
pub const MAINNET_V4_ENDPOINT: &str = "https://mainnet-v4.tonhubapi.com";

/// Public ton-api v4 endpoint (testnet).
pub const TESTNET_V4_ENDPOINT: &str = "https://testnet-v4.tonhubapi.com";

/// Monitor configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Fixed delay between tick starts, in milliseconds. No backoff.
    pub poll_interval_ms: u64,

    /// Reject getter stacks with entries left over after decoding.
    pub strict_decoding: bool,

    /// Capacity of the notification channel.
    pub notification_buffer: usize,

    /// Fail ticks until the contract account is active.
    pub require_active_account: bool,

    /// Upper bound on one tick's ledger round trips, in milliseconds.
    pub request_timeout_ms: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            strict_decoding: true,
            notification_buffer: DEFAULT_NOTIFICATION_BUFFER,
            require_active_account: true,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }
}

impl MonitorConfig {
    /// Create a config for testing (short interval, no account check).
    pub fn for_testing() -> Self {
        Self {
            poll_interval_ms: 100,
            strict_decoding: true,
            notification_buffer: 16,
            require_active_account: false,
            request_timeout_ms: 1_000,
        }
    }

    /// Poll interval as a duration.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Request timeout as a duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Decode mode implied by `strict_decoding`.
    pub fn decode_mode(&self) -> DecodeMode {
        if self.strict_decoding {
            DecodeMode::Strict
        } else {
            DecodeMode::Lenient
        }
    }

    /// Check invariants.
    pub fn validate(&self) -> Result<(), String> {
        if self.poll_interval_ms == 0 {
            return Err("poll_interval_ms must be > 0".to_string());
        }
        if self.notification_buffer == 0 {
            return Err("notification_buffer must be > 0".to_string());
        }
        if self.request_timeout_ms == 0 {
            return Err("request_timeout_ms must be > 0".to_string());
        }
        Ok(())
    }
}

/// HTTP ledger adapter configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpLedgerConfig {
    /// ton-api v4 base URL, without a trailing slash.
    pub endpoint: String,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Connect timeout in milliseconds.
    pub connect_timeout_ms: u64,
}

impl Default for HttpLedgerConfig {
    fn default() -> Self {
        Self {
            endpoint: MAINNET_V4_ENDPOINT.to_string(),
            timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            connect_timeout_ms: 2_000,
        }
    }
}

impl HttpLedgerConfig {
    /// Public endpoint for the chosen network.
    pub fn public(testnet: bool) -> Self {
        let endpoint = if testnet {
            TESTNET_V4_ENDPOINT
        } else {
            MAINNET_V4_ENDPOINT
        };
        Self {
            endpoint: endpoint.to_string(),
            ..Self::default()
        }
    }
}
