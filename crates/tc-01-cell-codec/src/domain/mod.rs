//! # Domain Module
//!
//! Core codec types: cells, builders, slices and addresses.

pub mod address;
pub mod builder;
pub mod cell;
pub mod errors;
pub mod limits;
pub mod slice;

pub use address::*;
pub use builder::*;
pub use cell::*;
pub use errors::*;
pub use limits::*;
pub use slice::*;
