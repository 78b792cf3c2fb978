use log::info;

use crate::access::{check_frame_accounting, process_page_access, Access};
use crate::config::{check_bound, FIRST_TIMESTAMP, REFERENCE_MAX};
use crate::error::{Error, Result};
use crate::frame_pool::FramePool;
use crate::page_table::PageTable;
use crate::policy::PageReplacementAlgorithm;

/// Page numbers to access, in order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReferenceString {
    pns: Vec<usize>,
}

impl ReferenceString {
    pub fn new(pns: Vec<usize>) -> Result<Self> {
        check_bound("reference", pns.len(), REFERENCE_MAX)?;
        Ok(Self { pns })
    }

    /// Number of references (`reference_cnt`).
    pub fn len(&self) -> usize {
        self.pns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pns.is_empty()
    }

    pub fn pages(&self) -> &[usize] {
        &self.pns
    }

    /// Fails on the first page that `page_table` cannot index.
    fn check_against(&self, page_table: &PageTable) -> Result<()> {
        match self.pns.iter().find(|&&pn| pn >= page_table.len()) {
            Some(&pn) => Err(Error::PageOutOfRange {
                page: pn,
                table_cnt: page_table.len(),
            }),
            None => Ok(()),
        }
    }
}

/// Runs every reference through `process_page_access` and returns the number
/// of page faults.
///
/// The clock starts at 1 and advances after every reference. Pages are range
/// checked up front, so an out-of-range reference leaves all state unchanged.
pub fn count_page_faults(
    pra: PageReplacementAlgorithm,
    page_table: &mut PageTable,
    references: &ReferenceString,
    frame_pool: &mut FramePool,
) -> Result<usize> {
    references.check_against(page_table)?;
    check_frame_accounting(page_table, frame_pool)?;

    let mut timestamp = FIRST_TIMESTAMP;
    let mut page_faults = 0;
    for &pn in references.pages() {
        if process_page_access(pra, page_table, pn, frame_pool, timestamp)?.is_fault() {
            page_faults += 1;
        }
        timestamp += 1;
    }

    info!(
        "{}: {} page faults over {} references",
        pra,
        page_faults,
        references.len()
    );
    Ok(page_faults)
}

/// Owns the state of one simulation run.
#[derive(Debug, Clone)]
pub struct Simulation {
    pra: PageReplacementAlgorithm,
    page_table: PageTable,
    frame_pool: FramePool,
    clock: u64,
    last_timestamp: Option<u64>,
    references: usize,
    page_faults: usize,
    evictions: usize,
}

impl Simulation {
    /// Starts a run. Frames in `frame_pool` must not already be held by a page.
    pub fn new(
        pra: PageReplacementAlgorithm,
        page_table: PageTable,
        frame_pool: FramePool,
    ) -> Result<Self> {
        check_frame_accounting(&page_table, &frame_pool)?;

        Ok(Self {
            pra,
            page_table,
            frame_pool,
            clock: FIRST_TIMESTAMP,
            last_timestamp: None,
            references: 0,
            page_faults: 0,
            evictions: 0,
        })
    }

    /// Accesses `pn` at the internal clock, then advances the clock.
    pub fn access(&mut self, pn: usize) -> Result<Access> {
        let next = self
            .clock
            .checked_add(1)
            .ok_or_else(|| Error::invariant("simulation clock overflowed"))?;
        let access = self.access_at(pn, self.clock)?;
        self.clock = next;
        Ok(access)
    }

    /// Accesses `pn` at an explicit timestamp. Timestamps may not move backwards.
    pub fn access_at(&mut self, pn: usize, timestamp: u64) -> Result<Access> {
        if let Some(last) = self.last_timestamp {
            if timestamp < last {
                return Err(Error::invariant(format!(
                    "timestamp {} precedes previous access at {}",
                    timestamp, last
                )));
            }
        }

        let access = process_page_access(
            self.pra,
            &mut self.page_table,
            pn,
            &mut self.frame_pool,
            timestamp,
        )?;

        self.last_timestamp = Some(timestamp);
        self.clock = self.clock.max(timestamp);
        self.references += 1;
        if access.is_fault() {
            self.page_faults += 1;
        }
        if access.victim().is_some() {
            self.evictions += 1;
        }
        Ok(access)
    }

    /// Accesses every page of `references` and returns the faults they caused.
    pub fn run(&mut self, references: &ReferenceString) -> Result<usize> {
        references.check_against(&self.page_table)?;

        let before = self.page_faults;
        for &pn in references.pages() {
            self.access(pn)?;
        }
        Ok(self.page_faults - before)
    }

    pub fn algorithm(&self) -> PageReplacementAlgorithm {
        self.pra
    }

    pub fn page_table(&self) -> &PageTable {
        &self.page_table
    }

    pub fn frame_pool(&self) -> &FramePool {
        &self.frame_pool
    }

    pub fn references(&self) -> usize {
        self.references
    }

    pub fn page_faults(&self) -> usize {
        self.page_faults
    }

    pub fn hits(&self) -> usize {
        self.references - self.page_faults
    }

    pub fn evictions(&self) -> usize {
        self.evictions
    }

    /// Splits the run back into its page table and frame pool.
    pub fn into_parts(self) -> (PageTable, FramePool) {
        (self.page_table, self.frame_pool)
    }
}
