//! # Getter Stack
//!
//! Values returned by a getter, in stack order, and a sequential reader the
//! decoders consume them through.

use tc_01_cell_codec::{Address, Cell};

use super::errors::ProtocolError;

/// One getter result entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StackEntry {
    /// Null.
    Null,
    /// Integer (the ledger allows 257 bits; values outside `i128` are rejected
    /// by adapters).
    Int(i128),
    /// Not-a-number integer.
    Nan,
    /// Cell.
    Cell(Cell),
    /// Slice, carried as the cell it reads.
    Slice(Cell),
    /// Builder, carried as the cell it would produce.
    Builder(Cell),
    /// Nested tuple.
    Tuple(Vec<StackEntry>),
}

impl StackEntry {
    /// Kind name used in errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Int(_) => "int",
            Self::Nan => "nan",
            Self::Cell(_) => "cell",
            Self::Slice(_) => "slice",
            Self::Builder(_) => "builder",
            Self::Tuple(_) => "tuple",
        }
    }
}

/// Sequential reader over a getter stack.
#[derive(Clone, Debug)]
pub struct StackReader {
    entries: Vec<StackEntry>,
    pos: usize,
}

impl StackReader {
    /// Read `entries` front to back.
    pub fn new(entries: Vec<StackEntry>) -> Self {
        Self { entries, pos: 0 }
    }

    /// Entries not yet read.
    pub fn remaining(&self) -> usize {
        self.entries.len() - self.pos
    }

    /// Next entry of any kind.
    pub fn read_entry(&mut self) -> Result<StackEntry, ProtocolError> {
        let entry = self
            .entries
            .get(self.pos)
            .cloned()
            .ok_or(ProtocolError::StackUnderflow {
                index: self.pos,
                len: self.entries.len(),
            })?;
        self.pos += 1;
        Ok(entry)
    }

    /// Next entry as an integer.
    pub fn read_int(&mut self) -> Result<i128, ProtocolError> {
        match self.read_entry()? {
            StackEntry::Int(value) => Ok(value),
            other => Err(unexpected("int", &other)),
        }
    }

    /// Next entry as a non-negative integer that fits `u64`.
    pub fn read_u64(&mut self) -> Result<u64, ProtocolError> {
        let value = self.read_int()?;
        u64::try_from(value)
            .map_err(|_| ProtocolError::MalformedState(format!("{value} does not fit u64")))
    }

    /// Next entry as a non-negative integer that fits `u32`.
    pub fn read_u32(&mut self) -> Result<u32, ProtocolError> {
        let value = self.read_int()?;
        u32::try_from(value)
            .map_err(|_| ProtocolError::MalformedState(format!("{value} does not fit u32")))
    }

    /// Next entry as a cell (cell, slice or builder).
    pub fn read_cell(&mut self) -> Result<Cell, ProtocolError> {
        match self.read_entry()? {
            StackEntry::Cell(cell) | StackEntry::Slice(cell) | StackEntry::Builder(cell) => Ok(cell),
            other => Err(unexpected("cell", &other)),
        }
    }

    /// Next entry as a slice holding a standard address.
    pub fn read_address(&mut self) -> Result<Address, ProtocolError> {
        let cell = self.read_cell()?;
        cell.begin_parse()
            .load_address()
            .map_err(|err| ProtocolError::field("address", err))
    }

    /// Next entry as a slice holding an address or `addr_none`; null is `None`.
    pub fn read_maybe_address(&mut self) -> Result<Option<Address>, ProtocolError> {
        if matches!(self.entries.get(self.pos), Some(StackEntry::Null)) {
            self.pos += 1;
            return Ok(None);
        }
        let cell = self.read_cell()?;
        cell.begin_parse()
            .load_maybe_address()
            .map_err(|err| ProtocolError::field("address", err))
    }
}

fn unexpected(expected: &'static str, found: &StackEntry) -> ProtocolError {
    ProtocolError::UnexpectedStackEntry {
        expected,
        found: found.kind(),
    }
}
