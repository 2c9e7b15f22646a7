//! One-line renderings of tracked values.

use tc_01_cell_codec::{Address, FriendlyFlags};
use tc_03_message_protocol::{from_nano, ContractState, ContractStorage};

/// Text shown for a tracked value.
pub trait Render {
    /// Single-line rendering.
    fn render(&self, testnet: bool) -> String;
}

fn friendly(address: &Address, testnet: bool) -> String {
    let flags = if testnet {
        FriendlyFlags::testnet()
    } else {
        FriendlyFlags::default()
    };
    address.to_friendly(flags)
}

impl Render for Option<Address> {
    fn render(&self, testnet: bool) -> String {
        match self {
            Some(address) => format!("sender={}", friendly(address, testnet)),
            None => "sender=none".to_string(),
        }
    }
}

impl Render for u64 {
    fn render(&self, _testnet: bool) -> String {
        format!("balance={}", from_nano(*self))
    }
}

impl Render for ContractStorage {
    fn render(&self, testnet: bool) -> String {
        format!(
            "counter={} sender={} owner={}",
            self.counter,
            friendly(&self.recent_sender, testnet),
            friendly(&self.owner_address, testnet)
        )
    }
}

impl Render for ContractState {
    fn render(&self, testnet: bool) -> String {
        format!(
            "{} balance={}",
            self.storage().render(testnet),
            from_nano(self.balance)
        )
    }
}
