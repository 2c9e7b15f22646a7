//! # Slice
//!
//! Read cursor over a cell. Fields come back in the order they were stored;
//! reading past the end fails with [`CellError::Underflow`] and leaves the
//! cursor where it was.

use super::address::Address;
use super::cell::Cell;
use super::errors::CellError;
use super::limits::{ADDRESS_STD_BITS, ADDRESS_TAG_NONE, ADDRESS_TAG_STD, COINS_LENGTH_BITS};

/// Cell reader.
#[derive(Debug, Clone)]
pub struct Slice {
    cell: Cell,
    bit_pos: usize,
    ref_pos: usize,
}

impl Slice {
    /// Start reading `cell` from its first bit and first reference.
    pub fn new(cell: Cell) -> Self {
        Self {
            cell,
            bit_pos: 0,
            ref_pos: 0,
        }
    }

    /// Unread bits.
    pub fn remaining_bits(&self) -> usize {
        self.cell.bit_len() - self.bit_pos
    }

    /// Unread references.
    pub fn remaining_refs(&self) -> &[Cell] {
        &self.cell.refs()[self.ref_pos..]
    }

    /// True when no bits and no references are left.
    pub fn is_empty(&self) -> bool {
        self.remaining_bits() == 0 && self.remaining_refs().is_empty()
    }

    /// Iterate the unread bits without consuming them.
    pub fn remaining_bit_iter(&self) -> impl Iterator<Item = bool> + '_ {
        (self.bit_pos..self.cell.bit_len()).map(|i| self.cell.bit(i))
    }

    /// Read one bit.
    pub fn load_bit(&mut self) -> Result<bool, CellError> {
        self.ensure_bits(1)?;
        let bit = self.cell.bit(self.bit_pos);
        self.bit_pos += 1;
        Ok(bit)
    }

    /// Read a `bits`-wide unsigned integer (`bits <= 64`).
    pub fn load_uint(&mut self, bits: u32) -> Result<u64, CellError> {
        let value = self.preload_uint(bits)?;
        self.bit_pos += bits as usize;
        Ok(value)
    }

    /// Peek a `bits`-wide unsigned integer without consuming it.
    pub fn preload_uint(&self, bits: u32) -> Result<u64, CellError> {
        if bits > 64 {
            return Err(CellError::EncodingOverflow(format!(
                "cannot load {bits} bits into u64"
            )));
        }
        self.ensure_bits(bits as usize)?;
        Ok(self.read_wide(self.bit_pos, bits) as u64)
    }

    /// Read a `bits`-wide two's complement integer (`1 <= bits <= 64`).
    pub fn load_int(&mut self, bits: u32) -> Result<i64, CellError> {
        if bits == 0 || bits > 64 {
            return Err(CellError::EncodingOverflow(format!(
                "int width {bits} must be within 1..=64"
            )));
        }
        let raw = self.load_uint(bits)?;
        let shift = 64 - bits;
        Ok(((raw << shift) as i64) >> shift)
    }

    /// Read `count` whole bytes.
    pub fn load_bytes(&mut self, count: usize) -> Result<Vec<u8>, CellError> {
        self.ensure_bits(count * 8)?;
        let bytes = (0..count)
            .map(|i| self.read_wide(self.bit_pos + i * 8, 8) as u8)
            .collect();
        self.bit_pos += count * 8;
        Ok(bytes)
    }

    /// Read a coins amount (4-bit byte length, then big-endian magnitude).
    pub fn load_coins(&mut self) -> Result<u128, CellError> {
        let byte_len = self.preload_uint(COINS_LENGTH_BITS)? as usize;
        let total = COINS_LENGTH_BITS as usize + byte_len * 8;
        self.ensure_bits(total)?;
        let value = self.read_wide(self.bit_pos + COINS_LENGTH_BITS as usize, (byte_len * 8) as u32);
        self.bit_pos += total;
        Ok(value)
    }

    /// Read a standard internal address; the "none" tag is an error here.
    pub fn load_address(&mut self) -> Result<Address, CellError> {
        match self.load_maybe_address()? {
            Some(address) => Ok(address),
            None => Err(CellError::InvalidAddressTag(ADDRESS_TAG_NONE)),
        }
    }

    /// Read an address that may be absent (tag `00`).
    pub fn load_maybe_address(&mut self) -> Result<Option<Address>, CellError> {
        let tag = self.preload_uint(2)? as u8;
        match tag {
            ADDRESS_TAG_NONE => {
                self.bit_pos += 2;
                Ok(None)
            }
            ADDRESS_TAG_STD => {
                self.ensure_bits(ADDRESS_STD_BITS)?;
                if self.cell.bit(self.bit_pos + 2) {
                    return Err(CellError::InvalidAddress(
                        "anycast addresses are not supported".to_string(),
                    ));
                }
                let workchain = self.read_wide(self.bit_pos + 3, 8) as u8 as i8;
                let mut hash = [0u8; 32];
                for (i, byte) in hash.iter_mut().enumerate() {
                    *byte = self.read_wide(self.bit_pos + 11 + i * 8, 8) as u8;
                }
                self.bit_pos += ADDRESS_STD_BITS;
                Ok(Some(Address::new(workchain, hash)))
            }
            other => Err(CellError::InvalidAddressTag(other)),
        }
    }

    /// Read the next child reference.
    pub fn load_ref(&mut self) -> Result<Cell, CellError> {
        let remaining = self.remaining_refs().len();
        let cell = self
            .remaining_refs()
            .first()
            .cloned()
            .ok_or_else(|| CellError::refs_underflow(1, remaining))?;
        self.ref_pos += 1;
        Ok(cell)
    }

    /// Read an optional reference behind a presence bit.
    pub fn load_maybe_ref(&mut self) -> Result<Option<Cell>, CellError> {
        let present = self.preload_uint(1)? == 1;
        if !present {
            self.bit_pos += 1;
            return Ok(None);
        }
        if self.remaining_refs().is_empty() {
            return Err(CellError::refs_underflow(1, 0));
        }
        self.bit_pos += 1;
        self.load_ref().map(Some)
    }

    /// Skip `bits` bits.
    pub fn skip_bits(&mut self, bits: usize) -> Result<(), CellError> {
        self.ensure_bits(bits)?;
        self.bit_pos += bits;
        Ok(())
    }

    /// Succeed only if everything has been read.
    pub fn end_parse(&self) -> Result<(), CellError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(CellError::TrailingData {
                bits: self.remaining_bits(),
                refs: self.remaining_refs().len(),
            })
        }
    }

    fn ensure_bits(&self, bits: usize) -> Result<(), CellError> {
        let remaining = self.remaining_bits();
        if bits > remaining {
            return Err(CellError::bits_underflow(bits, remaining));
        }
        Ok(())
    }

    /// Read `bits` (<= 128) bits starting at absolute bit `start`; bounds already checked.
    fn read_wide(&self, start: usize, bits: u32) -> u128 {
        (0..bits as usize).fold(0u128, |acc, i| {
            (acc << 1) | u128::from(self.cell.bit(start + i))
        })
    }
}

impl From<Cell> for Slice {
    fn from(cell: Cell) -> Self {
        Self::new(cell)
    }
}
