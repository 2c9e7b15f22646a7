//! Domain layer for the state monitor.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
