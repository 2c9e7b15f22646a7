//! Adapters implementing the outbound ports.

pub mod http_ledger;
pub mod in_memory;

pub use http_ledger::HttpLedgerClient;
pub use in_memory::{InMemoryLedger, RecordingChannel};
