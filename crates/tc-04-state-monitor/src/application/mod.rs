//! Application layer: probes and the monitor service.

pub mod probes;
pub mod service;

pub use probes::*;
pub use service::*;
