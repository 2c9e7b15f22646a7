//! # TC-02 Address Deriver
//!
//! Computes where a contract lives before it is deployed.
//!
//! **Subsystem ID:** 2  
//! **Architecture:** Hexagonal (DDD)  
//! **Status:** Production-Ready
//!
//! ## Derivation
//!
//! ```text
//! state_init = cell(bits: 0 0 1 1 0, refs: [code, data])
//! address    = (workchain, repr_hash(state_init))
//! ```
//!
//! Derivation is pure and total: it performs no I/O and cannot fail for any
//! pair of finalized cells.
//!
//! ## Module Structure
//!
//! ```text
//! tc-02-address-deriver/
//! ├── domain/          # StateInit
//! └── algorithms/      # derive_address
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algorithms;
pub mod domain;

// Re-exports
pub use algorithms::{derive_address, state_init_hash};
pub use domain::StateInit;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
