//! # Integration Tests
//!
//! End-to-end flows across the codec, deriver, protocol and monitor crates,
//! executed against [`SandboxLedger`](crate::sandbox::SandboxLedger).

pub mod flows;
pub mod monitoring;
