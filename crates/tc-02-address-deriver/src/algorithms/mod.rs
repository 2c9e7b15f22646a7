//! Pure derivation functions.

pub mod derivation;

pub use derivation::*;
