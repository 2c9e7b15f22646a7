//! Body encoding and getter decoding.

pub mod body;
pub mod decoders;

pub use body::*;
pub use decoders::*;
