//! # Exit Taxonomy
//!
//! Closed mapping from ledger exit codes to named conditions. Callers branch
//! on [`ExitCondition`], never on the raw integer.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Exit code of a successful execution.
pub const EXIT_OK: i32 = 0;

/// Withdraw requested by someone other than the owner.
pub const EXIT_UNAUTHORIZED: i32 = 103;

/// Withdraw larger than the contract balance.
pub const EXIT_INSUFFICIENT_BALANCE: i32 = 104;

/// Named execution outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExitCondition {
    /// Exit code 0.
    Ok,
    /// Exit code 103.
    Unauthorized,
    /// Exit code 104.
    InsufficientBalance,
    /// Any other code; opaque to the core.
    LedgerRejected(i32),
}

impl ExitCondition {
    /// Classify an exit code. Total over `i32`.
    pub fn from_code(code: i32) -> Self {
        match code {
            EXIT_OK => Self::Ok,
            EXIT_UNAUTHORIZED => Self::Unauthorized,
            EXIT_INSUFFICIENT_BALANCE => Self::InsufficientBalance,
            other => Self::LedgerRejected(other),
        }
    }

    /// Raw exit code, for diagnostics.
    pub fn code(&self) -> i32 {
        match self {
            Self::Ok => EXIT_OK,
            Self::Unauthorized => EXIT_UNAUTHORIZED,
            Self::InsufficientBalance => EXIT_INSUFFICIENT_BALANCE,
            Self::LedgerRejected(code) => *code,
        }
    }

    /// True only for [`ExitCondition::Ok`].
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl fmt::Display for ExitCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => f.write_str("ok"),
            Self::Unauthorized => f.write_str("unauthorized (103)"),
            Self::InsufficientBalance => f.write_str("insufficient balance (104)"),
            Self::LedgerRejected(code) => write!(f, "ledger rejected ({code})"),
        }
    }
}

/// Execution result as reported by the ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    /// Ledger's success flag.
    pub success: bool,
    /// Compute-phase exit code.
    pub exit_code: i32,
}

impl ExecutionOutcome {
    /// Successful execution.
    pub fn ok() -> Self {
        Self {
            success: true,
            exit_code: EXIT_OK,
        }
    }

    /// Failed execution with `exit_code`.
    pub fn failed(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }

    /// Named condition. A failure reported with exit code 0 is
    /// `LedgerRejected(0)`, never `Ok`.
    pub fn condition(&self) -> ExitCondition {
        match (self.success, ExitCondition::from_code(self.exit_code)) {
            (false, ExitCondition::Ok) => ExitCondition::LedgerRejected(EXIT_OK),
            (_, condition) => condition,
        }
    }
}
