//! # In-Memory Adapters
//!
//! Scripted ledger and recording submission channel for tests and dry runs.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use parking_lot::Mutex;
use tc_01_cell_codec::Address;
use tc_03_message_protocol::OutboundMessage;

use crate::domain::{AccountStatus, CheckpointId, GetterResult, MonitorError, SubmissionReceipt};
use crate::ports::{LedgerQuery, SubmissionChannel};

/// Ledger that replays scripted getter replies.
///
/// Each getter has a queue of replies. Replies are consumed front to back and
/// the last one repeats forever. Every `latest_checkpoint` call advances the
/// checkpoint by one.
pub struct InMemoryLedger {
    id: String,
    state: Mutex<LedgerState>,
}

struct LedgerState {
    checkpoint: u64,
    status: AccountStatus,
    checkpoint_failures: VecDeque<MonitorError>,
    getters: HashMap<String, VecDeque<Result<GetterResult, MonitorError>>>,
    getter_calls: HashMap<String, usize>,
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryLedger {
    /// Empty ledger with an active account at checkpoint 0.
    pub fn new() -> Self {
        Self {
            id: "in-memory".to_string(),
            state: Mutex::new(LedgerState {
                checkpoint: 0,
                status: AccountStatus::Active,
                checkpoint_failures: VecDeque::new(),
                getters: HashMap::new(),
                getter_calls: HashMap::new(),
            }),
        }
    }

    /// Queue a reply for `method`.
    pub fn push_getter(&self, method: &str, result: GetterResult) {
        self.push(method, Ok(result));
    }

    /// Queue a failure for `method`.
    pub fn push_getter_error(&self, method: &str, error: MonitorError) {
        self.push(method, Err(error));
    }

    fn push(&self, method: &str, reply: Result<GetterResult, MonitorError>) {
        self.state
            .lock()
            .getters
            .entry(method.to_string())
            .or_default()
            .push_back(reply);
    }

    /// Make the next `latest_checkpoint` call fail.
    pub fn fail_next_checkpoint(&self, error: MonitorError) {
        self.state.lock().checkpoint_failures.push_back(error);
    }

    /// Set the reported account status.
    pub fn set_status(&self, status: AccountStatus) {
        self.state.lock().status = status;
    }

    /// Number of `run_getter` calls for `method`.
    pub fn getter_calls(&self, method: &str) -> usize {
        self.state
            .lock()
            .getter_calls
            .get(method)
            .copied()
            .unwrap_or(0)
    }

    /// Last checkpoint handed out.
    pub fn current_checkpoint(&self) -> CheckpointId {
        CheckpointId(self.state.lock().checkpoint)
    }
}

#[async_trait]
impl LedgerQuery for InMemoryLedger {
    async fn latest_checkpoint(&self) -> Result<CheckpointId, MonitorError> {
        let mut state = self.state.lock();
        if let Some(error) = state.checkpoint_failures.pop_front() {
            return Err(error);
        }
        state.checkpoint += 1;
        Ok(CheckpointId(state.checkpoint))
    }

    async fn run_getter(
        &self,
        _checkpoint: CheckpointId,
        _address: &Address,
        method: &str,
    ) -> Result<GetterResult, MonitorError> {
        let mut state = self.state.lock();
        *state.getter_calls.entry(method.to_string()).or_default() += 1;
        let queue = state.getters.get_mut(method).ok_or_else(|| {
            MonitorError::InvalidResponse(format!("no scripted reply for getter {method}"))
        })?;
        let reply = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };
        reply.unwrap_or_else(|| {
            Err(MonitorError::InvalidResponse(format!(
                "no scripted reply for getter {method}"
            )))
        })
    }

    async fn account_status(
        &self,
        _checkpoint: CheckpointId,
        _address: &Address,
    ) -> Result<AccountStatus, MonitorError> {
        Ok(self.state.lock().status)
    }

    fn endpoint_id(&self) -> &str {
        &self.id
    }
}

/// Submission channel that records every message it accepts.
#[derive(Default)]
pub struct RecordingChannel {
    submitted: Mutex<Vec<OutboundMessage>>,
    reject_with: Mutex<Option<String>>,
}

impl RecordingChannel {
    /// Channel that accepts everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every following submission with `reason`.
    pub fn reject_all(&self, reason: impl Into<String>) {
        *self.reject_with.lock() = Some(reason.into());
    }

    /// Messages accepted so far.
    pub fn submitted(&self) -> Vec<OutboundMessage> {
        self.submitted.lock().clone()
    }
}

#[async_trait]
impl SubmissionChannel for RecordingChannel {
    async fn submit(&self, message: OutboundMessage) -> Result<SubmissionReceipt, MonitorError> {
        if let Some(reason) = self.reject_with.lock().clone() {
            return Err(MonitorError::SubmissionRejected(reason));
        }
        let receipt = SubmissionReceipt {
            destination: message.destination,
            value: message.value,
            body_hash: message.body.hash(),
        };
        self.submitted.lock().push(message);
        Ok(receipt)
    }
}
