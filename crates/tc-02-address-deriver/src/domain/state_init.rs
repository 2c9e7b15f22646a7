//! # State Init
//!
//! The `(code, data)` pair that seeds a contract's identity and initial
//! storage. Split depth, tick-tock and libraries are never set.

use tc_01_cell_codec::{Cell, CellError};

/// Number of header bits: split_depth?, special?, code?, data?, library?.
pub const STATE_INIT_HEADER_BITS: usize = 5;

const CODE_PRESENT: u8 = 0b0010_0000;
const DATA_PRESENT: u8 = 0b0001_0000;

/// Contract state init.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StateInit {
    /// Compiled contract code.
    pub code: Option<Cell>,
    /// Initial persistent storage.
    pub data: Option<Cell>,
}

impl StateInit {
    /// State init carrying both code and data.
    pub fn new(code: Cell, data: Cell) -> Self {
        Self {
            code: Some(code),
            data: Some(data),
        }
    }

    /// Header bits, left-aligned in one byte.
    pub fn header_byte(&self) -> u8 {
        let mut byte = 0;
        if self.code.is_some() {
            byte |= CODE_PRESENT;
        }
        if self.data.is_some() {
            byte |= DATA_PRESENT;
        }
        byte
    }

    /// Present children in storage order (code, then data).
    pub fn refs(&self) -> Vec<Cell> {
        self.code.iter().chain(self.data.iter()).cloned().collect()
    }

    /// Finalize into a cell.
    pub fn to_cell(&self) -> Result<Cell, CellError> {
        Cell::new(vec![self.header_byte()], STATE_INIT_HEADER_BITS, self.refs())
    }
}
