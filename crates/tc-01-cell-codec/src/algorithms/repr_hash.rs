//! # Representation Hash
//!
//! Hash of an ordinary cell:
//!
//! ```text
//! sha256( d1 || d2 || data_with_completion_tag || depth(ref_i)... || hash(ref_i)... )
//! d1 = number of references
//! d2 = floor(bits / 8) + ceil(bits / 8)
//! ```
//!
//! When `bits % 8 != 0` the data is closed with a single `1` bit and zero
//! padding (the completion tag), so `d2` being odd signals a partial byte.

use sha2::{Digest, Sha256};

use crate::domain::{Cell, CellError, CellHash, MAX_CELL_BITS, MAX_CELL_REFS};

/// Descriptor bytes `(d1, d2)` of an ordinary cell.
///
/// Callers guarantee `bit_len <= MAX_CELL_BITS` and `ref_count <= MAX_CELL_REFS`.
pub(crate) fn descriptors(bit_len: usize, ref_count: usize) -> [u8; 2] {
    [ref_count as u8, (bit_len / 8 + bit_len.div_ceil(8)) as u8]
}

/// Data bytes with the completion tag applied.
///
/// `data` must hold `ceil(bit_len / 8)` bytes with bits past `bit_len` cleared.
pub(crate) fn padded_data(data: &[u8], bit_len: usize) -> Vec<u8> {
    let mut padded = data[..bit_len.div_ceil(8)].to_vec();
    if bit_len % 8 != 0 {
        if let Some(last) = padded.last_mut() {
            *last |= 0x80 >> (bit_len % 8);
        }
    }
    padded
}

/// Depth of a cell with the given children.
pub fn cell_depth(refs: &[Cell]) -> u16 {
    refs.iter()
        .map(|child| child.depth().saturating_add(1))
        .max()
        .unwrap_or(0)
}

/// Representation hash of an ordinary cell built from these parts.
///
/// Rejects parts no cell could hold: more than [`MAX_CELL_BITS`] bits, more
/// than [`MAX_CELL_REFS`] references, or fewer data bytes than `bit_len` needs.
pub fn representation_hash(
    data: &[u8],
    bit_len: usize,
    refs: &[Cell],
) -> Result<CellHash, CellError> {
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
    if data.len() * 8 < bit_len {
        return Err(CellError::bits_underflow(bit_len, data.len() * 8));
    }
    Ok(hash_parts(data, bit_len, refs))
}

/// Representation hash of parts already checked against the cell limits.
pub(crate) fn hash_parts(data: &[u8], bit_len: usize, refs: &[Cell]) -> CellHash {
    let mut hasher = Sha256::new();
    hasher.update(descriptors(bit_len, refs.len()));
    hasher.update(padded_data(data, bit_len));
    for child in refs {
        hasher.update(child.depth().to_be_bytes());
    }
    for child in refs {
        hasher.update(child.hash());
    }
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}
