//! # Contract Config
//!
//! Initial storage for a new counter contract and the deploy bundle built
//! from it.

use serde::{Deserialize, Serialize};
use tc_01_cell_codec::{Address, Cell, CellError};
use tc_02_address_deriver::{derive_address, StateInit};

use super::state::ContractStorage;

/// Initial storage values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractConfig {
    /// Initial counter.
    pub number: u32,
    /// Initial recent-sender field.
    pub address: Address,
    /// Owner allowed to withdraw.
    pub owner_address: Address,
}

impl ContractConfig {
    /// Initial storage cell.
    pub fn to_data_cell(&self) -> Result<Cell, CellError> {
        ContractStorage::from(*self).to_cell()
    }

    /// Address and state init of a contract running `code` with this config.
    pub fn deploy(&self, code: Cell, workchain: i8) -> Result<(Address, StateInit), CellError> {
        let data = self.to_data_cell()?;
        let address = derive_address(workchain, &code, &data);
        Ok((address, StateInit::new(code, data)))
    }
}

impl From<ContractConfig> for ContractStorage {
    fn from(config: ContractConfig) -> Self {
        Self {
            counter: config.number,
            recent_sender: config.address,
            owner_address: config.owner_address,
        }
    }
}
