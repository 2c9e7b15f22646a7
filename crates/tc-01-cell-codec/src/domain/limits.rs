//! # Format Limits
//!
//! Fixed sizes of the cell format and of the compound fields stored in it.

/// Maximum number of data bits in a single cell.
pub const MAX_CELL_BITS: usize = 1023;

/// Maximum number of child references in a single cell.
pub const MAX_CELL_REFS: usize = 4;

/// Width of the byte-length prefix of a coins amount.
pub const COINS_LENGTH_BITS: u32 = 4;

/// Largest magnitude of a coins amount, in bytes (the prefix is 4 bits wide).
pub const MAX_COINS_BYTES: usize = 15;

/// Bits taken by a standard internal address: tag(2) + anycast(1) + workchain(8) + hash(256).
pub const ADDRESS_STD_BITS: usize = 267;

/// Bits taken by an absent address (tag `00`).
pub const ADDRESS_NONE_BITS: usize = 2;

/// Two-bit tag of an absent address.
pub(crate) const ADDRESS_TAG_NONE: u8 = 0b00;

/// Two-bit tag of a standard internal address.
pub(crate) const ADDRESS_TAG_STD: u8 = 0b10;
