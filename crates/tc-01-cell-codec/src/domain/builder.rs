//! # Builder
//!
//! Mutable, single-owner staging area that accumulates bits and references
//! and produces a [`Cell`] on [`Builder::end_cell`].
//!
//! Every `store_*` call validates before writing, so a failed store leaves
//! the builder exactly as it was.

use super::address::Address;
use super::cell::Cell;
use super::errors::CellError;
use super::limits::{
    ADDRESS_NONE_BITS, ADDRESS_STD_BITS, ADDRESS_TAG_NONE, ADDRESS_TAG_STD, COINS_LENGTH_BITS,
    MAX_CELL_BITS, MAX_CELL_REFS, MAX_COINS_BYTES,
};
use super::slice::Slice;

/// Cell builder.
#[derive(Debug, Clone, Default)]
pub struct Builder {
    data: Vec<u8>,
    bit_len: usize,
    refs: Vec<Cell>,
}

impl Builder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bits stored so far.
    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    /// References stored so far.
    pub fn ref_count(&self) -> usize {
        self.refs.len()
    }

    /// Bits still available in this cell.
    pub fn available_bits(&self) -> usize {
        MAX_CELL_BITS - self.bit_len
    }

    /// Append a single bit.
    pub fn store_bit(&mut self, bit: bool) -> Result<&mut Self, CellError> {
        self.ensure_bits(1)?;
        self.push_bit(bit);
        Ok(self)
    }

    /// Append the low `bits` bits of `value`, most significant bit first.
    ///
    /// Fails with [`CellError::EncodingOverflow`] when `value` needs more than
    /// `bits` bits, when `bits > 64`, or when the cell would exceed its bit limit.
    pub fn store_uint(&mut self, value: u64, bits: u32) -> Result<&mut Self, CellError> {
        if bits > 64 {
            return Err(CellError::EncodingOverflow(format!(
                "uint width {bits} exceeds 64 bits"
            )));
        }
        if !fits_unsigned(u128::from(value), bits) {
            return Err(CellError::EncodingOverflow(format!(
                "value {value} does not fit in {bits} bits"
            )));
        }
        self.ensure_bits(bits as usize)?;
        self.push_uint(u128::from(value), bits);
        Ok(self)
    }

    /// Append `value` as a `bits`-wide two's complement integer.
    pub fn store_int(&mut self, value: i64, bits: u32) -> Result<&mut Self, CellError> {
        if bits == 0 || bits > 64 {
            return Err(CellError::EncodingOverflow(format!(
                "int width {bits} must be within 1..=64"
            )));
        }
        let min = -(1i128 << (bits - 1));
        let max = (1i128 << (bits - 1)) - 1;
        if !(min..=max).contains(&i128::from(value)) {
            return Err(CellError::EncodingOverflow(format!(
                "value {value} does not fit in signed {bits} bits"
            )));
        }
        self.ensure_bits(bits as usize)?;
        // Two's complement: the low `bits` bits of the sign-extended value.
        self.push_uint(u128::from(value as u64), bits);
        Ok(self)
    }

    /// Append whole bytes.
    pub fn store_bytes(&mut self, bytes: &[u8]) -> Result<&mut Self, CellError> {
        self.ensure_bits(bytes.len() * 8)?;
        if self.bit_len % 8 == 0 {
            self.data.extend_from_slice(bytes);
            self.bit_len += bytes.len() * 8;
        } else {
            for byte in bytes {
                self.push_uint(u128::from(*byte), 8);
            }
        }
        Ok(self)
    }

    /// Append a coins amount: 4-bit byte length, then the big-endian magnitude.
    ///
    /// Zero is stored as a bare zero length prefix.
    pub fn store_coins(&mut self, amount: u128) -> Result<&mut Self, CellError> {
        let byte_len = (128 - amount.leading_zeros() as usize).div_ceil(8);
        if byte_len > MAX_COINS_BYTES {
            return Err(CellError::EncodingOverflow(format!(
                "coins amount {amount} needs {byte_len} bytes, limit is {MAX_COINS_BYTES}"
            )));
        }
        self.ensure_bits(COINS_LENGTH_BITS as usize + byte_len * 8)?;
        self.push_uint(byte_len as u128, COINS_LENGTH_BITS);
        self.push_uint(amount, (byte_len * 8) as u32);
        Ok(self)
    }

    /// Append an optional standard internal address.
    ///
    /// `None` is the two-bit tag `00`; `Some` is `10`, a zero anycast bit, the
    /// signed 8-bit workchain and the 256-bit account hash.
    pub fn store_address(&mut self, address: Option<&Address>) -> Result<&mut Self, CellError> {
        match address {
            None => {
                self.ensure_bits(ADDRESS_NONE_BITS)?;
                self.push_uint(u128::from(ADDRESS_TAG_NONE), 2);
            }
            Some(address) => {
                self.ensure_bits(ADDRESS_STD_BITS)?;
                self.push_uint(u128::from(ADDRESS_TAG_STD), 2);
                self.push_bit(false);
                self.push_uint(u128::from(address.workchain as u8), 8);
                for byte in address.hash {
                    self.push_uint(u128::from(byte), 8);
                }
            }
        }
        Ok(self)
    }

    /// Append a child reference.
    pub fn store_ref(&mut self, cell: Cell) -> Result<&mut Self, CellError> {
        if self.refs.len() >= MAX_CELL_REFS {
            return Err(CellError::EncodingOverflow(format!(
                "cell already holds {MAX_CELL_REFS} references"
            )));
        }
        self.refs.push(cell);
        Ok(self)
    }

    /// Append an optional reference behind a presence bit.
    pub fn store_maybe_ref(&mut self, cell: Option<Cell>) -> Result<&mut Self, CellError> {
        match cell {
            None => self.store_bit(false),
            Some(cell) => {
                self.ensure_bits(1)?;
                if self.refs.len() >= MAX_CELL_REFS {
                    return Err(CellError::EncodingOverflow(format!(
                        "cell already holds {MAX_CELL_REFS} references"
                    )));
                }
                self.push_bit(true);
                self.refs.push(cell);
                Ok(self)
            }
        }
    }

    /// Append the unread bits and references of `slice`.
    pub fn store_slice(&mut self, slice: &Slice) -> Result<&mut Self, CellError> {
        let bits = slice.remaining_bits();
        let refs = slice.remaining_refs();
        self.ensure_bits(bits)?;
        if self.refs.len() + refs.len() > MAX_CELL_REFS {
            return Err(CellError::EncodingOverflow(format!(
                "{} references would exceed the cell limit of {MAX_CELL_REFS}",
                self.refs.len() + refs.len()
            )));
        }
        for bit in slice.remaining_bit_iter() {
            self.push_bit(bit);
        }
        self.refs.extend_from_slice(refs);
        Ok(self)
    }

    /// Finalize into an immutable cell, consuming the builder.
    pub fn end_cell(self) -> Cell {
        Cell::from_checked_parts(self.data, self.bit_len, self.refs)
    }

    fn ensure_bits(&self, bits: usize) -> Result<(), CellError> {
        if self.bit_len + bits > MAX_CELL_BITS {
            return Err(CellError::EncodingOverflow(format!(
                "storing {bits} bits would exceed the cell limit ({} + {bits} > {MAX_CELL_BITS})",
                self.bit_len
            )));
        }
        Ok(())
    }

    fn push_bit(&mut self, bit: bool) {
        if self.bit_len % 8 == 0 {
            self.data.push(0);
        }
        if bit {
            self.data[self.bit_len / 8] |= 0x80 >> (self.bit_len % 8);
        }
        self.bit_len += 1;
    }

    fn push_uint(&mut self, value: u128, bits: u32) {
        for i in (0..bits).rev() {
            self.push_bit((value >> i) & 1 == 1);
        }
    }
}

fn fits_unsigned(value: u128, bits: u32) -> bool {
    bits >= 128 || value >> bits == 0
}
