//! Storage and getter-result decoders.
//!
//! | Getter | Stack | Decoder |
//! |--------|-------|---------|
//! | `get_contract_storage_data` | int, slice, slice | [`decode_storage_result`] |
//! | `balance` | int | [`decode_balance`] |
//! | `get_the_latest_sender` | slice | [`decode_latest_sender`] |

use tc_01_cell_codec::{Address, Cell, Slice};
use tracing::debug;

use crate::domain::{ContractStorage, DecodeMode, ProtocolError, StackReader};

/// Getter returning `(counter, recent_sender, owner_address)`.
pub const GETTER_STORAGE_DATA: &str = "get_contract_storage_data";

/// Getter returning the contract balance.
pub const GETTER_BALANCE: &str = "balance";

/// Getter returning the most recent sender.
pub const GETTER_LATEST_SENDER: &str = "get_the_latest_sender";

/// Decode a persisted storage slice: counter, recent sender, owner.
///
/// Running out of bits is an underflow; an unparsable field, or unread data in
/// [`DecodeMode::Strict`], is [`ProtocolError::MalformedState`].
pub fn decode_state(slice: &mut Slice, mode: DecodeMode) -> Result<ContractStorage, ProtocolError> {
    let counter = slice
        .load_uint(32)
        .map_err(|err| ProtocolError::field("counter", err))? as u32;
    let recent_sender = slice
        .load_address()
        .map_err(|err| ProtocolError::field("recent_sender", err))?;
    let owner_address = slice
        .load_address()
        .map_err(|err| ProtocolError::field("owner_address", err))?;

    if mode == DecodeMode::Strict {
        slice
            .end_parse()
            .map_err(|err| ProtocolError::MalformedState(err.to_string()))?;
    }

    debug!("[tc-03] Decoded storage: counter={}", counter);
    Ok(ContractStorage {
        counter,
        recent_sender,
        owner_address,
    })
}

/// Decode a whole storage cell.
pub fn decode_storage_cell(cell: &Cell, mode: DecodeMode) -> Result<ContractStorage, ProtocolError> {
    decode_state(&mut cell.begin_parse(), mode)
}

/// Decode the storage getter's stack.
pub fn decode_storage_result(reader: &mut StackReader) -> Result<ContractStorage, ProtocolError> {
    Ok(ContractStorage {
        counter: reader.read_u32()?,
        recent_sender: reader.read_address()?,
        owner_address: reader.read_address()?,
    })
}

/// Decode the balance getter's single numeric entry.
pub fn decode_balance(reader: &mut StackReader) -> Result<u64, ProtocolError> {
    reader.read_u64()
}

/// Decode the latest-sender getter; `None` when no sender is recorded.
pub fn decode_latest_sender(reader: &mut StackReader) -> Result<Option<Address>, ProtocolError> {
    reader.read_maybe_address()
}
