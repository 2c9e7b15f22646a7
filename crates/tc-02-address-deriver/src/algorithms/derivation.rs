//! Contract address derivation.

use sha2::{Digest, Sha256};
use tc_01_cell_codec::{Address, Cell, CellHash};

use crate::domain::{StateInit, STATE_INIT_HEADER_BITS};

/// Representation hash of the state init, without materializing the cell.
///
/// A state init always holds five header bits and at most two references,
/// so its descriptors are fixed: `d1` is the reference count and `d2` is 1.
pub fn state_init_hash(init: &StateInit) -> CellHash {
    let refs = init.refs();
    let mut hasher = Sha256::new();
    hasher.update([refs.len() as u8, 1]);
    hasher.update([init.header_byte() | (0x80 >> STATE_INIT_HEADER_BITS)]);
    for child in &refs {
        hasher.update(child.depth().to_be_bytes());
    }
    for child in &refs {
        hasher.update(child.hash());
    }
    hasher.finalize().into()
}

/// Address a contract with this `code` and initial `data` will occupy on `workchain`.
pub fn derive_address(workchain: i8, code: &Cell, data: &Cell) -> Address {
    let init = StateInit::new(code.clone(), data.clone());
    Address::new(workchain, state_init_hash(&init))
}
