//! # Contract State
//!
//! Read-only snapshots of the counter contract. The persisted layout is
//! `uint32(counter) · address(recent_sender) · address(owner_address)` and
//! must not be reordered.

use serde::{Deserialize, Serialize};
use tc_01_cell_codec::{Address, Builder, Cell, CellError};

/// Bits in a persisted storage cell: counter plus two standard addresses.
pub const STORAGE_BITS: usize = 32 + 267 + 267;

/// How strictly a storage slice is decoded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecodeMode {
    /// Unread bits or references after the last field are an error.
    #[default]
    Strict,
    /// Trailing data is ignored.
    Lenient,
}

/// The three persisted storage fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContractStorage {
    /// Counter value.
    pub counter: u32,
    /// Sender of the most recent increment.
    pub recent_sender: Address,
    /// Only address allowed to withdraw.
    pub owner_address: Address,
}

impl ContractStorage {
    /// Encode into the persisted storage layout.
    pub fn to_cell(&self) -> Result<Cell, CellError> {
        let mut builder = Builder::new();
        builder
            .store_uint(u64::from(self.counter), 32)?
            .store_address(Some(&self.recent_sender))?
            .store_address(Some(&self.owner_address))?;
        Ok(builder.end_cell())
    }
}

/// Storage fields plus the contract balance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContractState {
    /// Counter value.
    pub counter: u32,
    /// Sender of the most recent increment.
    pub recent_sender: Address,
    /// Only address allowed to withdraw.
    pub owner_address: Address,
    /// Balance in nanounits.
    pub balance: u64,
}

impl ContractState {
    /// Combine a storage snapshot with a balance reading.
    pub fn new(storage: ContractStorage, balance: u64) -> Self {
        Self {
            counter: storage.counter,
            recent_sender: storage.recent_sender,
            owner_address: storage.owner_address,
            balance,
        }
    }

    /// Storage fields only.
    pub fn storage(&self) -> ContractStorage {
        ContractStorage {
            counter: self.counter,
            recent_sender: self.recent_sender,
            owner_address: self.owner_address,
        }
    }
}
