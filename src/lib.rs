//! Demand paging simulator.
//!
//! Services page accesses against a fixed-size [`PageTable`] and a bounded
//! [`FramePool`], evicting pages with FIFO, LRU or LFU replacement once the
//! pool runs dry.

pub mod access;
pub mod config;
pub mod error;
pub mod frame_pool;
pub mod input;
pub mod page_table;
pub mod policy;
pub mod simulator;

pub use access::{process_page_access, Access, AccessRecord};
pub use config::{POOL_MAX, REFERENCE_MAX, TABLE_MAX};
pub use error::{Error, Result};
pub use frame_pool::FramePool;
pub use page_table::{PageTable, PageTableEntry};
pub use policy::PageReplacementAlgorithm;
pub use simulator::{count_page_faults, ReferenceString, Simulation};
