//! # Operations
//!
//! Typed requests the counter contract understands. Every variant has a
//! fixed body layout:
//!
//! | Operation | Body |
//! |-----------|------|
//! | `Deploy` | `uint32(2)` |
//! | `Increment { amount }` | `uint32(1) · uint32(amount)` |
//! | `Deposit` | `uint32(2)` |
//! | `NoOpDeposit` | empty |
//! | `Withdraw { amount }` | `uint32(3) · coins(amount)` |
//! | `RawTransfer { body }` | `body` as given |
//!
//! Deploy and Deposit share op code 2 on the wire. They stay separate
//! variants so call sites say what they mean.

use tc_01_cell_codec::Cell;

/// Width of the op-code prefix.
pub const OP_CODE_BITS: u32 = 32;

/// Add `amount` to the counter and record the sender.
pub const OP_INCREMENT: u32 = 1;

/// Accept the attached value.
pub const OP_DEPOSIT: u32 = 2;

/// Owner-only withdrawal of `amount` nanounits.
pub const OP_WITHDRAW: u32 = 3;

/// Body sent alongside the state init; same prefix as a deposit.
pub const OP_DEPLOY: u32 = OP_DEPOSIT;

/// Operation carried in a message body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Operation {
    /// First message to a new contract.
    Deploy,
    /// Increment the counter.
    Increment {
        /// Amount added to the counter.
        amount: u32,
    },
    /// Deposit the attached value.
    Deposit,
    /// Empty body; the contract bounces the value back.
    NoOpDeposit,
    /// Withdraw funds to the owner.
    Withdraw {
        /// Nanounits requested.
        amount: u64,
    },
    /// Caller-built body, passed through unchanged.
    RawTransfer {
        /// Body cell.
        body: Cell,
    },
}

impl Operation {
    /// Leading op code, or `None` when the body has no prefix of its own.
    pub fn op_code(&self) -> Option<u32> {
        match self {
            Self::Deploy => Some(OP_DEPLOY),
            Self::Increment { .. } => Some(OP_INCREMENT),
            Self::Deposit => Some(OP_DEPOSIT),
            Self::NoOpDeposit => None,
            Self::Withdraw { .. } => Some(OP_WITHDRAW),
            Self::RawTransfer { .. } => None,
        }
    }

    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Deploy => "deploy",
            Self::Increment { .. } => "increment",
            Self::Deposit => "deposit",
            Self::NoOpDeposit => "no_op_deposit",
            Self::Withdraw { .. } => "withdraw",
            Self::RawTransfer { .. } => "raw_transfer",
        }
    }
}
