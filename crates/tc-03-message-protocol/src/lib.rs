//! # TC-03 Message Protocol
//!
//! Encodes operation requests into message bodies and decodes getter replies
//! into typed contract state.
//!
//! **Subsystem ID:** 3  
//! **Architecture:** Hexagonal (DDD)  
//! **Status:** Production-Ready
//!
//! ## Wire Contract
//!
//! | Item | Layout |
//! |------|--------|
//! | Storage cell | `uint32(counter) · address(recent_sender) · address(owner)` |
//! | Increment body | `uint32(1) · uint32(n)` |
//! | Deposit / Deploy body | `uint32(2)` |
//! | Withdraw body | `uint32(3) · coins(amount)` |
//! | No-op deposit | empty |
//!
//! ## Exit Codes
//!
//! | Code | Condition |
//! |------|-----------|
//! | 0 | `Ok` |
//! | 103 | `Unauthorized` |
//! | 104 | `InsufficientBalance` |
//! | other | `LedgerRejected(code)` |
//!
//! ## Module Structure
//!
//! ```text
//! tc-03-message-protocol/
//! ├── domain/          # Operation, ContractState, StackEntry, ExitCondition, messages
//! └── algorithms/      # Body encoder/classifier, storage and getter decoders
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algorithms;
pub mod domain;

// Re-exports
pub use algorithms::{
    decode_balance, decode_latest_sender, decode_operation, decode_state, decode_storage_cell,
    decode_storage_result, encode_operation, GETTER_BALANCE, GETTER_LATEST_SENDER,
    GETTER_STORAGE_DATA,
};
pub use domain::{
    from_nano, to_nano, ContractConfig, ContractState, ContractStorage, DecodeMode,
    ExecutionOutcome, ExitCondition, Operation, OutboundMessage, ProtocolError, SendMode,
    StackEntry, StackReader, TransferRequest, EXIT_INSUFFICIENT_BALANCE, EXIT_OK,
    EXIT_UNAUTHORIZED, NANO_PER_UNIT, OP_CODE_BITS, OP_DEPLOY, OP_DEPOSIT, OP_INCREMENT,
    OP_WITHDRAW, STORAGE_BITS,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
