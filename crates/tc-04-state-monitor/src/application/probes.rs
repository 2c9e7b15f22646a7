//! # State Probes
//!
//! A probe decides which contract field a monitor tracks and how it is read
//! from the ledger.
//!
//! | Probe | Getters | Value |
//! |-------|---------|-------|
//! | [`LatestSenderProbe`] | `get_the_latest_sender` | `Option<Address>` |
//! | [`StorageProbe`] | `get_contract_storage_data` | `ContractStorage` |
//! | [`BalanceProbe`] | `balance` | `u64` |
//! | [`FullStateProbe`] | storage + balance | `ContractState` |

use std::fmt::Debug;

use async_trait::async_trait;
use tc_01_cell_codec::Address;
use tc_03_message_protocol::{
    decode_balance, decode_latest_sender, decode_storage_result, ContractState, ContractStorage,
    DecodeMode, ProtocolError, StackReader, GETTER_BALANCE, GETTER_LATEST_SENDER,
    GETTER_STORAGE_DATA,
};

use crate::domain::{CheckpointId, MonitorError};
use crate::ports::LedgerQuery;

/// Reads one tracked value from the ledger.
#[async_trait]
pub trait StateProbe: Send + Sync + 'static {
    /// Tracked value; compared by equality between ticks.
    type Value: Clone + PartialEq + Debug + Send + Sync + 'static;

    /// Probe name (for logging).
    fn name(&self) -> &'static str;

    /// Read the value at `checkpoint`.
    async fn probe(
        &self,
        ledger: &dyn LedgerQuery,
        checkpoint: CheckpointId,
        address: &Address,
        mode: DecodeMode,
    ) -> Result<Self::Value, MonitorError>;
}

async fn getter_stack(
    ledger: &dyn LedgerQuery,
    checkpoint: CheckpointId,
    address: &Address,
    method: &str,
) -> Result<StackReader, MonitorError> {
    ledger
        .run_getter(checkpoint, address, method)
        .await?
        .into_reader(method)
}

fn finish(reader: &StackReader, method: &str, mode: DecodeMode) -> Result<(), MonitorError> {
    if mode == DecodeMode::Strict && reader.remaining() != 0 {
        return Err(ProtocolError::MalformedState(format!(
            "{method} returned {} unread stack entries",
            reader.remaining()
        ))
        .into());
    }
    Ok(())
}

/// Tracks the most recent sender.
#[derive(Clone, Copy, Debug, Default)]
pub struct LatestSenderProbe;

#[async_trait]
impl StateProbe for LatestSenderProbe {
    type Value = Option<Address>;

    fn name(&self) -> &'static str {
        "latest_sender"
    }

    async fn probe(
        &self,
        ledger: &dyn LedgerQuery,
        checkpoint: CheckpointId,
        address: &Address,
        mode: DecodeMode,
    ) -> Result<Self::Value, MonitorError> {
        let mut reader = getter_stack(ledger, checkpoint, address, GETTER_LATEST_SENDER).await?;
        let sender = decode_latest_sender(&mut reader)?;
        finish(&reader, GETTER_LATEST_SENDER, mode)?;
        Ok(sender)
    }
}

/// Tracks the three storage fields.
#[derive(Clone, Copy, Debug, Default)]
pub struct StorageProbe;

#[async_trait]
impl StateProbe for StorageProbe {
    type Value = ContractStorage;

    fn name(&self) -> &'static str {
        "storage"
    }

    async fn probe(
        &self,
        ledger: &dyn LedgerQuery,
        checkpoint: CheckpointId,
        address: &Address,
        mode: DecodeMode,
    ) -> Result<Self::Value, MonitorError> {
        let mut reader = getter_stack(ledger, checkpoint, address, GETTER_STORAGE_DATA).await?;
        let storage = decode_storage_result(&mut reader)?;
        finish(&reader, GETTER_STORAGE_DATA, mode)?;
        Ok(storage)
    }
}

/// Tracks the contract balance.
#[derive(Clone, Copy, Debug, Default)]
pub struct BalanceProbe;

#[async_trait]
impl StateProbe for BalanceProbe {
    type Value = u64;

    fn name(&self) -> &'static str {
        "balance"
    }

    async fn probe(
        &self,
        ledger: &dyn LedgerQuery,
        checkpoint: CheckpointId,
        address: &Address,
        mode: DecodeMode,
    ) -> Result<Self::Value, MonitorError> {
        let mut reader = getter_stack(ledger, checkpoint, address, GETTER_BALANCE).await?;
        let balance = decode_balance(&mut reader)?;
        finish(&reader, GETTER_BALANCE, mode)?;
        Ok(balance)
    }
}

/// Tracks storage and balance together, both read at the same checkpoint.
#[derive(Clone, Copy, Debug, Default)]
pub struct FullStateProbe;

#[async_trait]
impl StateProbe for FullStateProbe {
    type Value = ContractState;

    fn name(&self) -> &'static str {
        "full_state"
    }

    async fn probe(
        &self,
        ledger: &dyn LedgerQuery,
        checkpoint: CheckpointId,
        address: &Address,
        mode: DecodeMode,
    ) -> Result<Self::Value, MonitorError> {
        let storage = StorageProbe.probe(ledger, checkpoint, address, mode).await?;
        let balance = BalanceProbe.probe(ledger, checkpoint, address, mode).await?;
        Ok(ContractState::new(storage, balance))
    }
}
