//! Operation body encoding and classification.

use tc_01_cell_codec::{Builder, Cell, CellError, Slice};

use crate::domain::{
    Operation, ProtocolError, OP_CODE_BITS, OP_DEPLOY, OP_DEPOSIT, OP_INCREMENT, OP_WITHDRAW,
};

/// Encode `operation` into its message body.
pub fn encode_operation(operation: &Operation) -> Result<Cell, CellError> {
    let mut builder = Builder::new();
    match operation {
        Operation::Deploy => {
            builder.store_uint(u64::from(OP_DEPLOY), OP_CODE_BITS)?;
        }
        Operation::Increment { amount } => {
            builder
                .store_uint(u64::from(OP_INCREMENT), OP_CODE_BITS)?
                .store_uint(u64::from(*amount), 32)?;
        }
        Operation::Deposit => {
            builder.store_uint(u64::from(OP_DEPOSIT), OP_CODE_BITS)?;
        }
        Operation::NoOpDeposit => {}
        Operation::Withdraw { amount } => {
            builder
                .store_uint(u64::from(OP_WITHDRAW), OP_CODE_BITS)?
                .store_coins(u128::from(*amount))?;
        }
        Operation::RawTransfer { body } => return Ok(body.clone()),
    }
    Ok(builder.end_cell())
}

/// Classify an inbound body the way the contract dispatches it.
///
/// Op code 2 decodes as [`Operation::Deposit`]; a deploy body is
/// indistinguishable on the wire. Trailing data after the fields is ignored.
pub fn decode_operation(body: &Cell) -> Result<Operation, ProtocolError> {
    let mut slice = body.begin_parse();
    if slice.remaining_bits() == 0 {
        return Ok(Operation::NoOpDeposit);
    }
    let op = slice.load_uint(OP_CODE_BITS)? as u32;
    match op {
        OP_INCREMENT => {
            let amount = slice.load_uint(32)? as u32;
            Ok(Operation::Increment { amount })
        }
        OP_DEPOSIT => Ok(Operation::Deposit),
        OP_WITHDRAW => Ok(Operation::Withdraw {
            amount: load_withdraw_amount(&mut slice)?,
        }),
        other => Err(ProtocolError::UnknownOpCode(other)),
    }
}

fn load_withdraw_amount(slice: &mut Slice) -> Result<u64, ProtocolError> {
    let amount = slice.load_coins()?;
    u64::try_from(amount).map_err(|_| {
        ProtocolError::MalformedState(format!("withdraw amount {amount} does not fit u64"))
    })
}

impl Operation {
    /// Encode into a message body. See [`encode_operation`].
    pub fn encode(&self) -> Result<Cell, CellError> {
        encode_operation(self)
    }

    /// Classify a message body. See [`decode_operation`].
    pub fn decode(body: &Cell) -> Result<Self, ProtocolError> {
        decode_operation(body)
    }
}
