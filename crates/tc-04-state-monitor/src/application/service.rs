//! # State Monitor Service
//!
//! Polls one contract field and reports changes.
//!
//! ```text
//! Idle → Polling → (Updated | Unchanged | Failed) → Polling → … → Cancelled
//! ```
//!
//! Ticks are strictly sequential: the next tick is not scheduled until the
//! previous outcome, including its snapshot update, has been committed.
//! Failures are logged and absorbed; they never stop the loop.

use std::sync::Arc;

use tc_01_cell_codec::Address;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use super::probes::StateProbe;
use crate::config::MonitorConfig;
use crate::domain::{
    AccountStatus, CheckpointId, MonitorError, MonitorPhase, MonitorStats, StateChange,
    TickOutcome,
};
use crate::ports::LedgerQuery;

/// State monitor for one contract and one probe.
pub struct StateMonitor<L: LedgerQuery, P: StateProbe> {
    /// Configuration.
    config: MonitorConfig,
    /// Ledger query channel.
    ledger: Arc<L>,
    /// What is tracked.
    probe: P,
    /// Contract being watched.
    address: Address,
    /// Last successfully observed value.
    snapshot: Option<P::Value>,
    /// Current phase.
    phase: MonitorPhase,
    /// Lifetime counters.
    stats: MonitorStats,
    /// Account status already confirmed active.
    account_confirmed: bool,
}

impl<L: LedgerQuery + 'static, P: StateProbe> StateMonitor<L, P> {
    /// Create a monitor for `address`.
    pub fn new(config: MonitorConfig, ledger: Arc<L>, probe: P, address: Address) -> Self {
        Self {
            config,
            ledger,
            probe,
            address,
            snapshot: None,
            phase: MonitorPhase::Idle,
            stats: MonitorStats::default(),
            account_confirmed: false,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> MonitorPhase {
        self.phase
    }

    /// Lifetime counters.
    pub fn stats(&self) -> MonitorStats {
        self.stats
    }

    /// Last observed value.
    pub fn snapshot(&self) -> Option<&P::Value> {
        self.snapshot.as_ref()
    }

    /// Contract being watched.
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Run one poll and commit its outcome.
    pub async fn tick(&mut self) -> TickOutcome<P::Value> {
        self.phase = MonitorPhase::Polling;
        self.stats.ticks += 1;

        let polled = match tokio::time::timeout(self.config.request_timeout(), self.poll()).await {
            Ok(result) => result,
            Err(_) => Err(MonitorError::TransportFailure(format!(
                "tick exceeded {} ms",
                self.config.request_timeout_ms
            ))),
        };

        match polled {
            Ok((checkpoint, value)) if self.snapshot.as_ref() == Some(&value) => {
                debug!(
                    "[tc-04] {} unchanged at {}",
                    self.probe.name(),
                    checkpoint
                );
                self.phase = MonitorPhase::Unchanged;
                self.stats.unchanged += 1;
                TickOutcome::Unchanged { checkpoint }
            }
            Ok((checkpoint, value)) => {
                info!(
                    "[tc-04] {} updated at {}: {:?}",
                    self.probe.name(),
                    checkpoint,
                    value
                );
                let previous = self.snapshot.replace(value.clone());
                self.phase = MonitorPhase::Updated;
                self.stats.updates += 1;
                TickOutcome::Updated(StateChange {
                    checkpoint,
                    previous,
                    current: value,
                })
            }
            Err(error) => {
                if error.is_transient() {
                    warn!(
                        "[tc-04] {} tick failed via {}: {}",
                        self.probe.name(),
                        self.ledger.endpoint_id(),
                        error
                    );
                    self.stats.transient_failures += 1;
                } else {
                    error!(
                        "[tc-04] {} tick failed via {}: {}",
                        self.probe.name(),
                        self.ledger.endpoint_id(),
                        error
                    );
                }
                self.phase = MonitorPhase::Failed;
                self.stats.failures += 1;
                TickOutcome::Failed(error)
            }
        }
    }

    async fn poll(&mut self) -> Result<(CheckpointId, P::Value), MonitorError> {
        let checkpoint = self.ledger.latest_checkpoint().await?;

        if self.config.require_active_account && !self.account_confirmed {
            let status = self.ledger.account_status(checkpoint, &self.address).await?;
            if status != AccountStatus::Active {
                return Err(MonitorError::AccountInactive(status));
            }
            self.account_confirmed = true;
        }

        let value = self
            .probe
            .probe(
                self.ledger.as_ref(),
                checkpoint,
                &self.address,
                self.config.decode_mode(),
            )
            .await?;
        Ok((checkpoint, value))
    }

    /// Run the polling loop on a tokio task.
    ///
    /// Notifications carry every `Updated` outcome. The loop ends when the
    /// handle cancels it, the handle is dropped, or the receiver is dropped.
    pub fn spawn(self) -> (MonitorHandle, mpsc::Receiver<StateChange<P::Value>>) {
        let (notify_tx, notify_rx) = mpsc::channel(self.config.notification_buffer.max(1));
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let task = tokio::spawn(self.run(notify_tx, cancel_rx));
        (MonitorHandle { cancel_tx, task }, notify_rx)
    }

    async fn run(
        mut self,
        notify: mpsc::Sender<StateChange<P::Value>>,
        mut cancel: watch::Receiver<bool>,
    ) -> MonitorStats {
        let mut interval = tokio::time::interval(self.config.poll_interval());
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            "[tc-04] Monitoring {} ({}) every {} ms via {}",
            self.address,
            self.probe.name(),
            self.config.poll_interval_ms,
            self.ledger.endpoint_id()
        );

        loop {
            tokio::select! {
                biased;
                _ = cancel.changed() => break,
                _ = interval.tick() => {}
            }
            if *cancel.borrow() {
                break;
            }

            if let TickOutcome::Updated(change) = self.tick().await {
                tokio::select! {
                    biased;
                    _ = cancel.changed() => break,
                    sent = notify.send(change) => {
                        if sent.is_err() {
                            info!("[tc-04] Notification receiver dropped");
                            break;
                        }
                    }
                }
            }
        }

        self.phase = MonitorPhase::Cancelled;
        info!(
            "[tc-04] Monitor stopped after {} ticks ({} updates, {} failures)",
            self.stats.ticks, self.stats.updates, self.stats.failures
        );
        self.stats
    }
}

/// Handle to a spawned monitor loop. Dropping it cancels the loop.
pub struct MonitorHandle {
    cancel_tx: watch::Sender<bool>,
    task: JoinHandle<MonitorStats>,
}

impl MonitorHandle {
    /// Stop scheduling ticks. A tick already in flight completes.
    pub fn cancel(&self) {
        let _ = self.cancel_tx.send(true);
    }

    /// True once the loop has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the loop to exit and return its counters.
    pub async fn join(self) -> Result<MonitorStats, tokio::task::JoinError> {
        let Self { cancel_tx, task } = self;
        let stats = task.await;
        drop(cancel_tx);
        stats
    }

    /// Cancel and wait.
    pub async fn shutdown(self) -> Result<MonitorStats, tokio::task::JoinError> {
        self.cancel();
        self.join().await
    }
}
