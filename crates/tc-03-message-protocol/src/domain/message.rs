//! # Outbound Messages
//!
//! What the core hands to a submission channel: destination, value, body,
//! send mode and (for deploys) the state init. Signing and delivery belong to
//! the channel.

use std::fmt;
use std::ops::BitOr;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use tc_01_cell_codec::{Address, Cell, CellError, FriendlyFlags};
use tc_02_address_deriver::StateInit;
use url::Url;

use super::contract_config::ContractConfig;
use super::operation::Operation;

/// Message send mode flags.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SendMode(u8);

impl SendMode {
    /// Fees come out of the attached value.
    pub const ORDINARY: Self = Self(0);
    /// Sender pays forwarding fees separately.
    pub const PAY_GAS_SEPARATELY: Self = Self(1);
    /// Ignore errors in the action phase.
    pub const IGNORE_ERRORS: Self = Self(2);
    /// Destroy the sender if its balance reaches zero.
    pub const DESTROY_IF_ZERO: Self = Self(32);
    /// Carry the remaining value of the inbound message.
    pub const CARRY_REMAINING_VALUE: Self = Self(64);
    /// Carry the whole balance.
    pub const CARRY_ALL_BALANCE: Self = Self(128);

    /// Raw flag byte.
    pub fn bits(&self) -> u8 {
        self.0
    }

    /// True when every flag in `other` is set.
    pub fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl Default for SendMode {
    fn default() -> Self {
        Self::PAY_GAS_SEPARATELY
    }
}

impl BitOr for SendMode {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl fmt::Debug for SendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SendMode({})", self.0)
    }
}

/// Message ready for a submission channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutboundMessage {
    /// Recipient.
    pub destination: Address,
    /// Attached value in nanounits.
    pub value: u64,
    /// Encoded body.
    pub body: Cell,
    /// Send mode.
    pub send_mode: SendMode,
    /// State init, present only on deploy.
    pub state_init: Option<StateInit>,
}

impl OutboundMessage {
    /// Message carrying `operation` to `destination`.
    pub fn new(destination: Address, value: u64, operation: &Operation) -> Result<Self, CellError> {
        Ok(Self {
            destination,
            value,
            body: operation.encode()?,
            send_mode: SendMode::default(),
            state_init: None,
        })
    }

    /// Deploy message for a contract with `config` running `code` on `workchain`.
    pub fn deploy(
        config: &ContractConfig,
        code: Cell,
        workchain: i8,
        value: u64,
    ) -> Result<Self, CellError> {
        let (destination, state_init) = config.deploy(code, workchain)?;
        Ok(Self {
            destination,
            value,
            body: Operation::Deploy.encode()?,
            send_mode: SendMode::default(),
            state_init: Some(state_init),
        })
    }

    /// Override the send mode.
    pub fn with_send_mode(mut self, send_mode: SendMode) -> Self {
        self.send_mode = send_mode;
        self
    }
}

/// Wallet transfer deep link.
///
/// Renders as `https://[test.]tonhub.com/transfer/<address>?text=..&amount=..&bin=..`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferRequest {
    /// Recipient.
    pub destination: Address,
    /// Value in nanounits.
    pub amount: u64,
    /// Comment shown by the wallet.
    pub text: Option<String>,
    /// Body, sent as a base64 BOC.
    pub body: Option<Cell>,
    /// Use the test network host and test-only address form.
    pub testnet: bool,
}

impl TransferRequest {
    /// Mainnet host.
    pub const MAINNET_HOST: &'static str = "tonhub.com";
    /// Test network host.
    pub const TESTNET_HOST: &'static str = "test.tonhub.com";

    /// Link carrying an outbound message's destination, value and body.
    pub fn from_message(message: &OutboundMessage, text: Option<String>, testnet: bool) -> Self {
        Self {
            destination: message.destination,
            amount: message.value,
            text,
            body: Some(message.body.clone()),
            testnet,
        }
    }

    /// Render the deep link.
    pub fn to_deep_link(&self) -> Result<Url, url::ParseError> {
        let host = if self.testnet {
            Self::TESTNET_HOST
        } else {
            Self::MAINNET_HOST
        };
        let flags = FriendlyFlags {
            test_only: self.testnet,
            ..FriendlyFlags::default()
        };
        let mut link = Url::parse(&format!(
            "https://{host}/transfer/{}",
            self.destination.to_friendly(flags)
        ))?;
        {
            let mut query = link.query_pairs_mut();
            if let Some(text) = &self.text {
                query.append_pair("text", text);
            }
            query.append_pair("amount", &self.amount.to_string());
            if let Some(body) = &self.body {
                query.append_pair("bin", &STANDARD.encode(body.to_boc()));
            }
        }
        Ok(link)
    }
}
