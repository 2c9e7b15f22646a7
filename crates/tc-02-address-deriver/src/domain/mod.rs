//! Domain layer for address derivation.

pub mod state_init;

pub use state_init::*;
