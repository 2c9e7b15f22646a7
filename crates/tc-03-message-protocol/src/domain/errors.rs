//! # Domain Errors
//!
//! Error types for the message protocol.

use thiserror::Error;
use tc_01_cell_codec::CellError;

/// Message protocol error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// Underlying codec failure (overflow, underflow, bad address, bad BOC).
    #[error(transparent)]
    Cell(#[from] CellError),

    /// A decoded structure violates a domain invariant.
    #[error("Malformed state: {0}")]
    MalformedState(String),

    /// Message body starts with an op code the contract does not handle.
    #[error("Unknown op code: {0}")]
    UnknownOpCode(u32),

    /// Getter stack entry has the wrong type.
    #[error("Unexpected stack entry: expected {expected}, found {found}")]
    UnexpectedStackEntry {
        /// Entry kind the decoder needed
        expected: &'static str,
        /// Entry kind actually present
        found: &'static str,
    },

    /// Getter stack holds fewer entries than the decoder needs.
    #[error("Stack underflow: needed entry #{index}, stack has {len}")]
    StackUnderflow {
        /// Zero-based index that was requested
        index: usize,
        /// Stack length
        len: usize,
    },

    /// Amount text could not be converted to nanounits.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
}

impl ProtocolError {
    /// True when the codec ran out of bits or references.
    pub fn is_underflow(&self) -> bool {
        matches!(self, Self::Cell(err) if err.is_underflow())
    }

    /// Classify a field-level codec failure: underflow stays an underflow,
    /// anything else is a malformed field.
    pub(crate) fn field(name: &str, err: CellError) -> Self {
        if err.is_underflow() {
            Self::Cell(err)
        } else {
            Self::MalformedState(format!("{name}: {err}"))
        }
    }
}
