//! # Domain Errors
//!
//! Error types for the state monitor. Every variant is absorbed into a
//! `Failed` tick by the polling loop; none of them stops it.

use thiserror::Error;
use tc_03_message_protocol::{ExitCondition, ProtocolError};

use super::entities::AccountStatus;

/// State monitor error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MonitorError {
    /// Query or submission could not complete (network, timeout, HTTP status).
    #[error("Transport failure: {0}")]
    TransportFailure(String),

    /// Getter finished with a non-zero exit code.
    #[error("Getter {method} failed: {condition}")]
    LedgerRejected {
        /// Getter name
        method: String,
        /// Classified exit code
        condition: ExitCondition,
    },

    /// Ledger answered with something that is not a valid response.
    #[error("Invalid ledger response: {0}")]
    InvalidResponse(String),

    /// Getter result could not be decoded.
    #[error("Decode failed: {0}")]
    Decode(#[from] ProtocolError),

    /// Contract account is not active.
    #[error("Account is not active: {0:?}")]
    AccountInactive(AccountStatus),

    /// Submission channel refused the message.
    #[error("Submission rejected: {0}")]
    SubmissionRejected(String),
}

impl MonitorError {
    /// True for failures a later tick may not see again.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::TransportFailure(_) | Self::AccountInactive(_))
    }
}
