//! # Cell
//!
//! Immutable bit-packed container with up to four child references.

use std::fmt;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use super::errors::CellError;
use super::limits::{MAX_CELL_BITS, MAX_CELL_REFS};
use super::slice::Slice;
use crate::algorithms::boc::{deserialize_boc, serialize_boc, BocOptions};
use crate::algorithms::repr_hash::{cell_depth, hash_parts};

/// Representation hash of a cell (32-byte SHA-256).
pub type CellHash = [u8; 32];

/// Finalized cell.
///
/// Cloning is cheap (reference-counted) and the content never changes after
/// construction, so cells can be shared across threads freely. Two cells are
/// equal iff their representation hashes are equal.
#[derive(Clone)]
pub struct Cell(Arc<CellInner>);

struct CellInner {
    /// Data bytes, `ceil(bit_len / 8)` long, bits past `bit_len` cleared.
    data: Vec<u8>,
    bit_len: usize,
    refs: Vec<Cell>,
    hash: CellHash,
    depth: u16,
}

impl Cell {
    /// Build a cell from raw parts.
    ///
    /// `data` must hold at least `ceil(bit_len / 8)` bytes; extra bytes and
    /// bits past `bit_len` are discarded.
    pub fn new(mut data: Vec<u8>, bit_len: usize, refs: Vec<Cell>) -> Result<Self, CellError> {
        if bit_len > MAX_CELL_BITS {
            return Err(CellError::EncodingOverflow(format!(
                "{bit_len} bits exceed the cell limit of {MAX_CELL_BITS}"
            )));
        }
        if refs.len() > MAX_CELL_REFS {
            return Err(CellError::EncodingOverflow(format!(
                "{} references exceed the cell limit of {MAX_CELL_REFS}",
                refs.len()
            )));
        }
        let byte_len = bit_len.div_ceil(8);
        if data.len() < byte_len {
            return Err(CellError::bits_underflow(bit_len, data.len() * 8));
        }
        data.truncate(byte_len);
        if bit_len % 8 != 0 {
            if let Some(last) = data.last_mut() {
                *last &= 0xFFu8 << (8 - bit_len % 8);
            }
        }
        Ok(Self::from_checked_parts(data, bit_len, refs))
    }

    /// Finalize parts the builder has already validated.
    pub(crate) fn from_checked_parts(data: Vec<u8>, bit_len: usize, refs: Vec<Cell>) -> Self {
        let hash = hash_parts(&data, bit_len, &refs);
        let depth = cell_depth(&refs);
        Self(Arc::new(CellInner {
            data,
            bit_len,
            refs,
            hash,
            depth,
        }))
    }

    /// The empty cell (no bits, no references).
    pub fn empty() -> Self {
        Self::from_checked_parts(Vec::new(), 0, Vec::new())
    }

    /// Number of data bits.
    pub fn bit_len(&self) -> usize {
        self.0.bit_len
    }

    /// Data bytes; the last byte is zero-padded when `bit_len` is not a multiple of 8.
    pub fn data(&self) -> &[u8] {
        &self.0.data
    }

    /// Child references in storage order.
    pub fn refs(&self) -> &[Cell] {
        &self.0.refs
    }

    /// Child reference at `index`.
    pub fn reference(&self, index: usize) -> Option<&Cell> {
        self.0.refs.get(index)
    }

    /// Representation hash.
    pub fn hash(&self) -> CellHash {
        self.0.hash
    }

    /// Representation hash as lowercase hex.
    pub fn hash_hex(&self) -> String {
        hex::encode(self.0.hash)
    }

    /// Depth: 0 for a leaf, otherwise one more than the deepest child.
    pub fn depth(&self) -> u16 {
        self.0.depth
    }

    /// True when the cell carries neither bits nor references.
    pub fn is_empty(&self) -> bool {
        self.0.bit_len == 0 && self.0.refs.is_empty()
    }

    /// Bit at `index` (most significant bit of byte 0 first).
    pub(crate) fn bit(&self, index: usize) -> bool {
        self.0.data[index / 8] & (0x80 >> (index % 8)) != 0
    }

    /// Start reading this cell.
    pub fn begin_parse(&self) -> Slice {
        Slice::new(self.clone())
    }

    /// Serialize to a bag of cells with default options (no index, CRC32C).
    pub fn to_boc(&self) -> Vec<u8> {
        serialize_boc(std::slice::from_ref(self), BocOptions::default())
    }

    /// Serialize to a bag of cells with explicit options.
    pub fn to_boc_with(&self, options: BocOptions) -> Vec<u8> {
        serialize_boc(std::slice::from_ref(self), options)
    }

    /// Default BOC as lowercase hex.
    pub fn to_boc_hex(&self) -> String {
        hex::encode(self.to_boc())
    }

    /// Default BOC as standard base64.
    pub fn to_boc_base64(&self) -> String {
        STANDARD.encode(self.to_boc())
    }

    /// Parse a bag of cells that holds exactly one root.
    pub fn from_boc(bytes: &[u8]) -> Result<Self, CellError> {
        let mut roots = deserialize_boc(bytes)?;
        if roots.len() != 1 {
            return Err(CellError::InvalidBoc(format!(
                "expected exactly one root, found {}",
                roots.len()
            )));
        }
        Ok(roots.remove(0))
    }

    /// Parse a hex-encoded single-root bag of cells (compiled contract code is shipped this way).
    pub fn from_boc_hex(text: &str) -> Result<Self, CellError> {
        let bytes = hex::decode(text.trim())
            .map_err(|e| CellError::InvalidBoc(format!("bad hex: {e}")))?;
        Self::from_boc(&bytes)
    }

    /// Parse a base64-encoded single-root bag of cells.
    pub fn from_boc_base64(text: &str) -> Result<Self, CellError> {
        let bytes = STANDARD
            .decode(text.trim())
            .map_err(|e| CellError::InvalidBoc(format!("bad base64: {e}")))?;
        Self::from_boc(&bytes)
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.0.hash == other.0.hash
    }
}

impl Eq for Cell {}

impl std::hash::Hash for Cell {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.hash.hash(state);
    }
}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cell")
            .field("bits", &self.0.bit_len)
            .field("refs", &self.0.refs.len())
            .field("hash", &self.hash_hex())
            .finish()
    }
}
