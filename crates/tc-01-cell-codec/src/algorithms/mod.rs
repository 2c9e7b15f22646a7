//! # Algorithms Module
//!
//! Pure transformations over cells:
//! - Representation hashing and depth
//! - Bag-of-cells serialization and parsing
//! - Checksums (CRC16 for friendly addresses, CRC32C for BOC)

pub mod boc;
pub mod checksum;
pub mod repr_hash;

pub use boc::{
    deserialize_boc, serialize_boc, BocOptions, BOC_GENERIC_MAGIC, BOC_INDEXED_CRC32_MAGIC,
    BOC_INDEXED_MAGIC,
};
pub use checksum::{crc16, crc32c};
pub use repr_hash::{cell_depth, representation_hash};
