//! # Domain Errors
//!
//! Error types for the cell codec.

use thiserror::Error;

/// Cell codec error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CellError {
    /// A value or field does not fit in its allotted bits, or a builder would
    /// exceed the per-cell bit or reference limit.
    #[error("Encoding overflow: {0}")]
    EncodingOverflow(String),

    /// A slice was asked for more bits or references than remain.
    #[error("Cell underflow: requested {requested} {unit}, {remaining} remaining")]
    Underflow {
        /// Amount requested
        requested: usize,
        /// Amount left in the slice
        remaining: usize,
        /// "bits" or "refs"
        unit: &'static str,
    },

    /// Strict parsing finished with unread data.
    #[error("Trailing data: {bits} bits and {refs} refs left unread")]
    TrailingData {
        /// Unread bits
        bits: usize,
        /// Unread references
        refs: usize,
    },

    /// Address tag is neither "none" nor "standard internal".
    #[error("Invalid address tag: {0:#04b}")]
    InvalidAddressTag(u8),

    /// Address text or binary payload is malformed.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Bag-of-cells bytes are malformed.
    #[error("Invalid BOC: {0}")]
    InvalidBoc(String),

    /// Exotic or non-zero-level cells are not handled by this codec.
    #[error("Unsupported cell type (d1 = {0:#04x})")]
    UnsupportedCellType(u8),
}

impl CellError {
    /// Underflow of data bits.
    pub(crate) fn bits_underflow(requested: usize, remaining: usize) -> Self {
        Self::Underflow {
            requested,
            remaining,
            unit: "bits",
        }
    }

    /// Underflow of child references.
    pub(crate) fn refs_underflow(requested: usize, remaining: usize) -> Self {
        Self::Underflow {
            requested,
            remaining,
            unit: "refs",
        }
    }

    /// True for [`CellError::Underflow`].
    pub fn is_underflow(&self) -> bool {
        matches!(self, Self::Underflow { .. })
    }
}
