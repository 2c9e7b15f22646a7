//! # Bag of Cells
//!
//! Canonical exchange format for a DAG of cells.
//!
//! ```text
//! magic:u32 = 0xb5ee9c72
//! flags:u8  = has_idx(1) has_crc32c(1) has_cache_bits(1) zero(2) size_bytes(3)
//! off_bytes:u8
//! cells:size  roots:size  absent:size  tot_cells_size:off
//! root_list:[size; roots]
//! index:[off; cells]                  -- only with has_idx
//! cell_data:[u8; tot_cells_size]      -- d1 d2 data ref_index...
//! crc32c:u32 (little-endian)          -- only with has_crc32c
//! ```
//!
//! Cells are deduplicated by hash and every parent precedes its children, so
//! child indices always point strictly forward.

use std::collections::{HashMap, HashSet};

use super::checksum::crc32c;
use super::repr_hash::{descriptors, padded_data};
use crate::domain::{Cell, CellError, CellHash, MAX_CELL_REFS};

/// Magic of the generic serialization.
pub const BOC_GENERIC_MAGIC: u32 = 0xb5ee_9c72;

/// Magic of the legacy indexed serialization.
pub const BOC_INDEXED_MAGIC: u32 = 0x68ff_65f3;

/// Magic of the legacy indexed serialization with CRC32C.
pub const BOC_INDEXED_CRC32_MAGIC: u32 = 0xacc3_a728;

const FLAG_HAS_IDX: u8 = 0x80;
const FLAG_HAS_CRC32C: u8 = 0x40;
const SIZE_BYTES_MASK: u8 = 0x07;

const D1_REFS_MASK: u8 = 0x07;
const D1_EXOTIC: u8 = 0x08;
const D1_WITH_HASHES: u8 = 0x10;
const D1_LEVEL_SHIFT: u8 = 5;

/// Serialization options.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BocOptions {
    /// Emit the offset index.
    pub with_index: bool,
    /// Append a CRC32C of the whole serialization.
    pub with_crc32c: bool,
}

impl Default for BocOptions {
    fn default() -> Self {
        Self {
            with_index: false,
            with_crc32c: true,
        }
    }
}

/// Serialize `roots` (and everything reachable from them).
pub fn serialize_boc(roots: &[Cell], options: BocOptions) -> Vec<u8> {
    let cells = topological_order(roots);
    let index: HashMap<CellHash, usize> = cells
        .iter()
        .enumerate()
        .map(|(i, cell)| (cell.hash(), i))
        .collect();

    let size_bytes = bytes_for(cells.len());
    let record_sizes: Vec<usize> = cells
        .iter()
        .map(|cell| 2 + cell.bit_len().div_ceil(8) + cell.refs().len() * size_bytes)
        .collect();
    let total_size: usize = record_sizes.iter().sum();
    let off_bytes = bytes_for(total_size);

    let mut out = Vec::with_capacity(32 + total_size);
    out.extend_from_slice(&BOC_GENERIC_MAGIC.to_be_bytes());
    let mut flags = size_bytes as u8;
    if options.with_index {
        flags |= FLAG_HAS_IDX;
    }
    if options.with_crc32c {
        flags |= FLAG_HAS_CRC32C;
    }
    out.push(flags);
    out.push(off_bytes as u8);
    write_uint(&mut out, cells.len(), size_bytes);
    write_uint(&mut out, roots.len(), size_bytes);
    write_uint(&mut out, 0, size_bytes);
    write_uint(&mut out, total_size, off_bytes);
    for root in roots {
        write_uint(&mut out, index[&root.hash()], size_bytes);
    }
    if options.with_index {
        let mut end_offset = 0;
        for size in &record_sizes {
            end_offset += size;
            write_uint(&mut out, end_offset, off_bytes);
        }
    }
    for cell in &cells {
        out.extend_from_slice(&descriptors(cell.bit_len(), cell.refs().len()));
        out.extend_from_slice(&padded_data(cell.data(), cell.bit_len()));
        for child in cell.refs() {
            write_uint(&mut out, index[&child.hash()], size_bytes);
        }
    }
    if options.with_crc32c {
        let checksum = crc32c(&out);
        out.extend_from_slice(&checksum.to_le_bytes());
    }
    out
}

/// Parse a bag of cells, returning its roots in order.
pub fn deserialize_boc(bytes: &[u8]) -> Result<Vec<Cell>, CellError> {
    let mut reader = ByteReader::new(bytes);
    let magic = reader.read_uint(4)? as u32;

    let header = match magic {
        BOC_GENERIC_MAGIC => {
            let flags = reader.read_u8()?;
            BocHeader {
                has_idx: flags & FLAG_HAS_IDX != 0,
                has_crc32c: flags & FLAG_HAS_CRC32C != 0,
                has_root_list: true,
                size_bytes: (flags & SIZE_BYTES_MASK) as usize,
            }
        }
        BOC_INDEXED_MAGIC | BOC_INDEXED_CRC32_MAGIC => BocHeader {
            has_idx: true,
            has_crc32c: magic == BOC_INDEXED_CRC32_MAGIC,
            has_root_list: false,
            size_bytes: reader.read_u8()? as usize,
        },
        other => {
            return Err(CellError::InvalidBoc(format!("unknown magic {other:#010x}")));
        }
    };

    if header.has_crc32c {
        if bytes.len() < 8 {
            return Err(CellError::InvalidBoc("too short for a checksum".to_string()));
        }
        let (body, tail) = bytes.split_at(bytes.len() - 4);
        let expected = u32::from_le_bytes([tail[0], tail[1], tail[2], tail[3]]);
        let actual = crc32c(body);
        if expected != actual {
            return Err(CellError::InvalidBoc(format!(
                "crc32c mismatch: stored {expected:#010x}, computed {actual:#010x}"
            )));
        }
        reader.limit(bytes.len() - 4);
    }

    let size_bytes = header.size_bytes;
    if !(1..=4).contains(&size_bytes) {
        return Err(CellError::InvalidBoc(format!(
            "size_bytes {size_bytes} outside 1..=4"
        )));
    }
    let off_bytes = reader.read_u8()? as usize;
    if !(1..=8).contains(&off_bytes) {
        return Err(CellError::InvalidBoc(format!(
            "off_bytes {off_bytes} outside 1..=8"
        )));
    }

    let cell_count = reader.read_uint(size_bytes)?;
    let root_count = reader.read_uint(size_bytes)?;
    let absent = reader.read_uint(size_bytes)?;
    let total_size = reader.read_uint(off_bytes)?;

    if absent != 0 {
        return Err(CellError::InvalidBoc(format!(
            "{absent} absent cells are not supported"
        )));
    }
    if root_count == 0 || root_count > cell_count {
        return Err(CellError::InvalidBoc(format!(
            "{root_count} roots for {cell_count} cells"
        )));
    }

    let root_indices = if header.has_root_list {
        (0..root_count)
            .map(|_| reader.read_uint(size_bytes))
            .collect::<Result<Vec<_>, _>>()?
    } else {
        vec![0]
    };
    if let Some(bad) = root_indices.iter().find(|&&i| i >= cell_count) {
        return Err(CellError::InvalidBoc(format!(
            "root index {bad} out of range for {cell_count} cells"
        )));
    }

    if header.has_idx {
        reader.skip(cell_count * off_bytes)?;
    }

    let data_start = reader.position();
    let mut raw_cells = Vec::with_capacity(cell_count.min(4096));
    for index in 0..cell_count {
        raw_cells.push(read_raw_cell(&mut reader, index, cell_count, size_bytes)?);
    }
    let consumed = reader.position() - data_start;
    if consumed != total_size {
        return Err(CellError::InvalidBoc(format!(
            "cell data is {consumed} bytes, header declares {total_size}"
        )));
    }
    if reader.remaining() != 0 {
        return Err(CellError::InvalidBoc(format!(
            "{} trailing bytes after cell data",
            reader.remaining()
        )));
    }

    let mut built: Vec<Option<Cell>> = vec![None; cell_count];
    for (index, raw) in raw_cells.into_iter().enumerate().rev() {
        let refs = raw
            .refs
            .iter()
            .map(|&child| {
                built[child].clone().ok_or_else(|| {
                    CellError::InvalidBoc(format!("cell {index} references unbuilt cell {child}"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        built[index] = Some(Cell::new(raw.data, raw.bit_len, refs)?);
    }

    root_indices
        .iter()
        .map(|&i| {
            built[i]
                .clone()
                .ok_or_else(|| CellError::InvalidBoc(format!("root {i} was not built")))
        })
        .collect()
}

struct BocHeader {
    has_idx: bool,
    has_crc32c: bool,
    has_root_list: bool,
    size_bytes: usize,
}

struct RawCell {
    data: Vec<u8>,
    bit_len: usize,
    refs: Vec<usize>,
}

fn read_raw_cell(
    reader: &mut ByteReader<'_>,
    index: usize,
    cell_count: usize,
    size_bytes: usize,
) -> Result<RawCell, CellError> {
    let d1 = reader.read_u8()?;
    let d2 = reader.read_u8()?;

    if d1 & D1_EXOTIC != 0 || d1 >> D1_LEVEL_SHIFT != 0 {
        return Err(CellError::UnsupportedCellType(d1));
    }
    let ref_count = (d1 & D1_REFS_MASK) as usize;
    if ref_count > MAX_CELL_REFS {
        return Err(CellError::InvalidBoc(format!(
            "cell {index} declares {ref_count} references"
        )));
    }
    if d1 & D1_WITH_HASHES != 0 {
        // Level-0 cell: one stored hash and one stored depth.
        reader.skip(32 + 2)?;
    }

    let byte_len = (d2 as usize).div_ceil(2);
    let mut data = reader.read_bytes(byte_len)?.to_vec();
    let bit_len = if d2 % 2 == 0 {
        byte_len * 8
    } else {
        let last = data.last().copied().unwrap_or(0);
        if last == 0 {
            return Err(CellError::InvalidBoc(format!(
                "cell {index} is missing its completion tag"
            )));
        }
        let padding = last.trailing_zeros() as usize + 1;
        if let Some(byte) = data.last_mut() {
            *byte &= !(1u8 << (padding - 1));
        }
        byte_len * 8 - padding
    };

    let mut refs = Vec::with_capacity(ref_count);
    for _ in 0..ref_count {
        let child = reader.read_uint(size_bytes)?;
        if child <= index || child >= cell_count {
            return Err(CellError::InvalidBoc(format!(
                "cell {index} references cell {child}, which does not follow it"
            )));
        }
        refs.push(child);
    }

    Ok(RawCell {
        data,
        bit_len,
        refs,
    })
}

/// Parents before children, roots in the order given, duplicates removed.
fn topological_order(roots: &[Cell]) -> Vec<Cell> {
    let mut visited: HashSet<CellHash> = HashSet::new();
    let mut postorder: Vec<Cell> = Vec::new();
    let mut stack: Vec<(Cell, usize)> = Vec::new();

    for root in roots.iter().rev() {
        if !visited.insert(root.hash()) {
            continue;
        }
        stack.push((root.clone(), 0));
        while let Some((cell, done)) = stack.last_mut() {
            let cell = cell.clone();
            let ref_count = cell.refs().len();
            if *done < ref_count {
                // Children are walked last-to-first so they come out first-to-last.
                let child = cell.refs()[ref_count - 1 - *done].clone();
                *done += 1;
                if visited.insert(child.hash()) {
                    stack.push((child, 0));
                }
            } else {
                stack.pop();
                postorder.push(cell);
            }
        }
    }

    postorder.reverse();
    postorder
}

/// Minimal number of bytes to hold `value` (at least one).
fn bytes_for(value: usize) -> usize {
    let bits = usize::BITS - value.leading_zeros();
    (bits as usize).div_ceil(8).max(1)
}

fn write_uint(out: &mut Vec<u8>, value: usize, width: usize) {
    let bytes = (value as u64).to_be_bytes();
    out.extend_from_slice(&bytes[8 - width..]);
}

struct ByteReader<'a> {
    bytes: &'a [u8],
    pos: usize,
    end: usize,
}

impl<'a> ByteReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            pos: 0,
            end: bytes.len(),
        }
    }

    fn limit(&mut self, end: usize) {
        self.end = end.min(self.bytes.len());
    }

    fn position(&self) -> usize {
        self.pos
    }

    fn remaining(&self) -> usize {
        self.end.saturating_sub(self.pos)
    }

    fn read_bytes(&mut self, count: usize) -> Result<&'a [u8], CellError> {
        if count > self.remaining() {
            return Err(CellError::InvalidBoc(format!(
                "unexpected end of data: need {count} bytes at offset {}, {} left",
                self.pos,
                self.remaining()
            )));
        }
        let slice = &self.bytes[self.pos..self.pos + count];
        self.pos += count;
        Ok(slice)
    }

    fn skip(&mut self, count: usize) -> Result<(), CellError> {
        self.read_bytes(count).map(|_| ())
    }

    fn read_u8(&mut self) -> Result<u8, CellError> {
        Ok(self.read_bytes(1)?[0])
    }

    fn read_uint(&mut self, width: usize) -> Result<usize, CellError> {
        let bytes = self.read_bytes(width)?;
        let value = bytes
            .iter()
            .fold(0u64, |acc, &byte| (acc << 8) | u64::from(byte));
        usize::try_from(value)
            .map_err(|_| CellError::InvalidBoc(format!("value {value} does not fit usize")))
    }
}
