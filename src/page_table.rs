use std::collections::HashSet;

use log::trace;

use crate::config::{check_bound, TABLE_MAX};
use crate::error::{Error, Result};

/// Metadata for one virtual page.
///
/// An invalid entry is always in the reset state: no frame, zeroed
/// timestamps and a zero reference count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageTableEntry {
    frame_number: Option<usize>,
    arrival_timestamp: u64,
    last_access_timestamp: u64,
    reference_count: u64,
}

impl PageTableEntry {
    /// Entry in the reset state.
    pub fn invalid() -> Self {
        Self::default()
    }

    /// Entry already mapped to `frame`, e.g. restored from a snapshot.
    pub fn resident(
        frame: usize,
        arrival_timestamp: u64,
        last_access_timestamp: u64,
        reference_count: u64,
    ) -> Self {
        Self {
            frame_number: Some(frame),
            arrival_timestamp,
            last_access_timestamp,
            reference_count,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.frame_number.is_some()
    }

    pub fn frame_number(&self) -> Option<usize> {
        self.frame_number
    }

    pub fn arrival_timestamp(&self) -> u64 {
        self.arrival_timestamp
    }

    pub fn last_access_timestamp(&self) -> u64 {
        self.last_access_timestamp
    }

    pub fn reference_count(&self) -> u64 {
        self.reference_count
    }
}

/// Fixed-size page table indexed by page number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTable {
    entries: Vec<PageTableEntry>,
}

impl PageTable {
    /// Table of `table_cnt` invalid entries.
    pub fn new(table_cnt: usize) -> Result<Self> {
        check_bound("page table", table_cnt, TABLE_MAX)?;
        Ok(Self {
            entries: vec![PageTableEntry::invalid(); table_cnt],
        })
    }

    /// Table built from existing entries. No two valid entries may share a frame.
    pub fn from_entries(entries: Vec<PageTableEntry>) -> Result<Self> {
        check_bound("page table", entries.len(), TABLE_MAX)?;

        let mut held = HashSet::new();
        for (pn, entry) in entries.iter().enumerate() {
            if let Some(frame) = entry.frame_number {
                if !held.insert(frame) {
                    return Err(Error::invariant(format!(
                        "frame {} is held by more than one page (second holder: page {})",
                        frame, pn
                    )));
                }
            }
        }

        Ok(Self { entries })
    }

    /// Number of entries (`table_cnt`).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn lookup(&self, pn: usize) -> Result<&PageTableEntry> {
        self.check_page(pn)?;
        Ok(&self.entries[pn])
    }

    pub fn entries(&self) -> &[PageTableEntry] {
        &self.entries
    }

    /// Number of pages currently mapped to a frame.
    pub fn resident_count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.is_valid()).count()
    }

    /// Frames held by valid entries, in page order.
    pub fn resident_frames(&self) -> impl Iterator<Item = usize> + '_ {
        self.entries.iter().filter_map(|entry| entry.frame_number)
    }

    /// Maps `pn` to `frame` as a freshly loaded page.
    pub fn mark_loaded(&mut self, pn: usize, frame: usize, timestamp: u64) -> Result<()> {
        self.check_page(pn)?;
        self.entries[pn] = PageTableEntry::resident(frame, timestamp, timestamp, 1);
        trace!("page {} loaded into frame {} at t={}", pn, frame, timestamp);
        Ok(())
    }

    /// Records another access to a resident page.
    pub fn mark_hit(&mut self, pn: usize, timestamp: u64) -> Result<()> {
        self.check_page(pn)?;
        let entry = &mut self.entries[pn];
        if !entry.is_valid() {
            return Err(Error::invariant(format!(
                "hit recorded on page {} which is not resident",
                pn
            )));
        }
        entry.last_access_timestamp = timestamp;
        entry.reference_count += 1;
        Ok(())
    }

    /// Returns `pn` to the reset state and hands back the frame it held.
    pub fn reset(&mut self, pn: usize) -> Result<usize> {
        self.check_page(pn)?;
        let frame = self.entries[pn].frame_number.ok_or_else(|| {
            Error::invariant(format!("page {} holds no frame to reclaim", pn))
        })?;
        self.entries[pn] = PageTableEntry::invalid();
        Ok(frame)
    }

    fn check_page(&self, pn: usize) -> Result<()> {
        if pn >= self.entries.len() {
            return Err(Error::PageOutOfRange {
                page: pn,
                table_cnt: self.entries.len(),
            });
        }
        Ok(())
    }
}
