//! # Outbound Ports
//!
//! Collaborators the monitor depends on: the ledger it queries and the
//! channel outbound messages are submitted through.

use async_trait::async_trait;
use tc_01_cell_codec::Address;
use tc_03_message_protocol::OutboundMessage;

use crate::domain::{AccountStatus, CheckpointId, GetterResult, MonitorError, SubmissionReceipt};

/// Ledger query channel - outbound port.
#[async_trait]
pub trait LedgerQuery: Send + Sync {
    /// Latest finalized checkpoint.
    async fn latest_checkpoint(&self) -> Result<CheckpointId, MonitorError>;

    /// Run a getter on `address` at `checkpoint`.
    async fn run_getter(
        &self,
        checkpoint: CheckpointId,
        address: &Address,
        method: &str,
    ) -> Result<GetterResult, MonitorError>;

    /// Lifecycle state of `address` at `checkpoint`.
    async fn account_status(
        &self,
        checkpoint: CheckpointId,
        address: &Address,
    ) -> Result<AccountStatus, MonitorError>;

    /// Endpoint identifier (for logging).
    fn endpoint_id(&self) -> &str;
}

/// Submission channel - outbound port.
///
/// Signing and delivery are the channel's business; the core only builds
/// the message.
#[async_trait]
pub trait SubmissionChannel: Send + Sync {
    /// Enqueue `message`, or reject it immediately.
    async fn submit(&self, message: OutboundMessage) -> Result<SubmissionReceipt, MonitorError>;
}
