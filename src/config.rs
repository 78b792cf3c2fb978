//! Storage bounds and command line defaults.

use crate::error::{Error, Result};

/// Maximum number of page table entries
pub const TABLE_MAX: usize = 256;

/// Maximum number of frames a pool can hold
pub const POOL_MAX: usize = 256;

/// Maximum length of a reference string
pub const REFERENCE_MAX: usize = 1 << 16;

pub const DEFAULT_PAGES: usize = TABLE_MAX;
pub const DEFAULT_FRAMES: usize = 16;

/// Logical clock value of the first reference in a run
pub const FIRST_TIMESTAMP: u64 = 1;

/// Fails when `count` exceeds `max`.
pub(crate) fn check_bound(what: &'static str, count: usize, max: usize) -> Result<()> {
    if count > max {
        return Err(Error::CountOutOfRange { what, count, max });
    }
    Ok(())
}
