//! Error types for the paging simulator.

use thiserror::Error;

/// Result type alias used across the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Simulator error types
#[derive(Error, Debug)]
pub enum Error {
    /// Page number outside the logical page table
    #[error("page {page} is out of range for a page table of {table_cnt} entries")]
    PageOutOfRange { page: usize, table_cnt: usize },

    /// A logical count exceeds its storage bound
    #[error("{what} count {count} exceeds the maximum of {max}")]
    CountOutOfRange {
        what: &'static str,
        count: usize,
        max: usize,
    },

    /// Frame requested from an empty pool
    #[error("frame pool is exhausted")]
    PoolExhausted,

    /// Frame accounting or timestamp ordering was broken by the caller
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// IO error while loading input
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed input line
    #[error("parse error on line {line}: {reason}")]
    Parse { line: usize, reason: String },
}

impl Error {
    pub(crate) fn invariant(msg: impl Into<String>) -> Self {
        Error::InvariantViolation(msg.into())
    }

    /// True for caller-side contract breaches rather than bad input
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, Error::InvariantViolation(_))
    }
}
