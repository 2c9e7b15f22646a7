//! # Domain Entities
//!
//! Values exchanged with the ledger and reported by the monitor.

use std::fmt;

use serde::{Deserialize, Serialize};
use tc_01_cell_codec::{Address, CellHash};
use tc_03_message_protocol::{ExitCondition, StackEntry, StackReader};

use super::errors::MonitorError;

/// Finalized ledger checkpoint (masterchain block seqno).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CheckpointId(pub u64);

impl fmt::Display for CheckpointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Raw getter reply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GetterResult {
    /// Compute-phase exit code.
    pub exit_code: i32,
    /// Result stack, first entry first.
    pub stack: Vec<StackEntry>,
}

impl GetterResult {
    /// Successful reply carrying `stack`.
    pub fn ok(stack: Vec<StackEntry>) -> Self {
        Self { exit_code: 0, stack }
    }

    /// Failed reply with `exit_code` and no stack.
    pub fn failed(exit_code: i32) -> Self {
        Self {
            exit_code,
            stack: Vec::new(),
        }
    }

    /// Classified exit code.
    pub fn condition(&self) -> ExitCondition {
        ExitCondition::from_code(self.exit_code)
    }

    /// Reader over the stack, or `LedgerRejected` when the getter failed.
    pub fn into_reader(self, method: &str) -> Result<StackReader, MonitorError> {
        let condition = self.condition();
        if !condition.is_ok() {
            return Err(MonitorError::LedgerRejected {
                method: method.to_string(),
                condition,
            });
        }
        Ok(StackReader::new(self.stack))
    }
}

/// Account lifecycle state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountStatus {
    /// Deployed and running.
    Active,
    /// Has a balance but no code yet.
    Uninit,
    /// Frozen for unpaid storage.
    Frozen,
    /// Never seen by the ledger.
    NonExistent,
}

/// Acknowledgement from a submission channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    /// Recipient.
    pub destination: Address,
    /// Attached value.
    pub value: u64,
    /// Representation hash of the body.
    pub body_hash: CellHash,
}

/// Notification payload for an `Updated` tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateChange<V> {
    /// Checkpoint the new value was read at.
    pub checkpoint: CheckpointId,
    /// Last observed value; `None` on the first successful tick.
    pub previous: Option<V>,
    /// Newly observed value.
    pub current: V,
}

/// Result of one poll.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome<V> {
    /// Value differs from the snapshot (or there was none).
    Updated(StateChange<V>),
    /// Value equals the snapshot.
    Unchanged {
        /// Checkpoint the value was read at.
        checkpoint: CheckpointId,
    },
    /// Query or decode failed; the snapshot is untouched.
    Failed(MonitorError),
}

impl<V> TickOutcome<V> {
    /// True for [`TickOutcome::Updated`].
    pub fn is_updated(&self) -> bool {
        matches!(self, Self::Updated(_))
    }

    /// True for [`TickOutcome::Unchanged`].
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged { .. })
    }

    /// True for [`TickOutcome::Failed`].
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Where the monitor is in its cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MonitorPhase {
    /// No tick has run.
    Idle,
    /// A tick is in flight.
    Polling,
    /// Last tick saw a new value.
    Updated,
    /// Last tick saw the same value.
    Unchanged,
    /// Last tick failed.
    Failed,
    /// Loop stopped.
    Cancelled,
}

/// Counters over the monitor's lifetime.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorStats {
    /// Ticks started.
    pub ticks: u64,
    /// `Updated` outcomes.
    pub updates: u64,
    /// `Unchanged` outcomes.
    pub unchanged: u64,
    /// `Failed` outcomes.
    pub failures: u64,
    /// Failures a later tick may not see again (transport, inactive account).
    pub transient_failures: u64,
}
