//! Domain layer: operations, contract state, getter stack, exit taxonomy.

pub mod amount;
pub mod contract_config;
pub mod errors;
pub mod exit;
pub mod message;
pub mod operation;
pub mod stack;
pub mod state;

pub use amount::*;
pub use contract_config::*;
pub use errors::*;
pub use exit::*;
pub use message::*;
pub use operation::*;
pub use stack::*;
pub use state::*;
