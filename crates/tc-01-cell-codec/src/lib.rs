//! # TC-01 Cell Codec
//!
//! Bit-packed binary containers ("cells") used for contract storage and
//! message bodies, plus the bag-of-cells (BOC) exchange format.
//!
//! **Subsystem ID:** 1  
//! **Architecture:** Hexagonal (DDD)  
//! **Status:** Production-Ready
//!
//! ## Data Model
//!
//! | Type | Role |
//! |------|------|
//! | [`Builder`] | Mutable, single-use accumulator of bits and references |
//! | [`Cell`] | Immutable, reference-counted, hash-identified container |
//! | [`Slice`] | Read cursor over a cell's bits and references |
//! | [`Address`] | `(workchain, account hash)` with raw and friendly text forms |
//!
//! A cell holds at most [`MAX_CELL_BITS`] bits and [`MAX_CELL_REFS`] child
//! references. Its representation hash is a pure function of its bits and its
//! children's hashes, so identical content always hashes identically.
//!
//! ## Module Structure
//!
//! ```text
//! tc-01-cell-codec/
//! ├── domain/          # Cell, Builder, Slice, Address, errors, limits
//! └── algorithms/      # Representation hash, BOC codec, checksums
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algorithms;
pub mod domain;

// Re-exports
pub use algorithms::{
    crc16, crc32c, deserialize_boc, representation_hash, serialize_boc, BocOptions,
    BOC_GENERIC_MAGIC, BOC_INDEXED_CRC32_MAGIC, BOC_INDEXED_MAGIC,
};
pub use domain::{
    Address, Builder, Cell, CellError, CellHash, FriendlyAddress, FriendlyFlags, Slice,
    ADDRESS_NONE_BITS, ADDRESS_STD_BITS, COINS_LENGTH_BITS, MAX_CELL_BITS, MAX_CELL_REFS,
    MAX_COINS_BYTES,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
