use std::fmt;

use log::{debug, trace};

use crate::error::{Error, Result};
use crate::frame_pool::FramePool;
use crate::page_table::PageTable;
use crate::policy::PageReplacementAlgorithm;

/// Outcome of servicing one page access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// The page was already resident.
    Hit { frame: usize },
    /// Page fault served from the free frame pool.
    Loaded { frame: usize },
    /// Page fault served by evicting `victim` and taking its frame.
    Replaced { frame: usize, victim: usize },
}

impl Access {
    /// Frame now holding the accessed page.
    pub fn frame(&self) -> usize {
        match *self {
            Access::Hit { frame } | Access::Loaded { frame } | Access::Replaced { frame, .. } => {
                frame
            }
        }
    }

    pub fn is_fault(&self) -> bool {
        !matches!(self, Access::Hit { .. })
    }

    /// Page evicted to make room, if any.
    pub fn victim(&self) -> Option<usize> {
        match *self {
            Access::Replaced { victim, .. } => Some(victim),
            _ => None,
        }
    }
}

/// One serviced reference, printed as `page, frame, HIT|FAULT[, victim]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessRecord {
    pub pn: usize,
    pub access: Access,
}

impl fmt::Display for AccessRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let frame = self.access.frame();
        match self.access {
            Access::Hit { .. } => write!(f, "{}, {}, HIT", self.pn, frame),
            Access::Loaded { .. } => write!(f, "{}, {}, FAULT", self.pn, frame),
            Access::Replaced { victim, .. } => {
                write!(f, "{}, {}, FAULT, {}", self.pn, frame, victim)
            }
        }
    }
}

/// Fails if a frame sits in `frame_pool` while a page still holds it.
pub(crate) fn check_frame_accounting(page_table: &PageTable, frame_pool: &FramePool) -> Result<()> {
    match page_table
        .resident_frames()
        .find(|&frame| frame_pool.contains(frame))
    {
        Some(frame) => Err(Error::invariant(format!(
            "frame {} is both free and held by a page",
            frame
        ))),
        None => Ok(()),
    }
}

/// Services an access to page `pn` at `timestamp`.
///
/// A resident page is refreshed in place. Otherwise the page takes a free
/// frame from `frame_pool`, or, when the pool is empty, the frame of the
/// victim chosen by `pra`. Evicted frames go straight to the new page and
/// never pass back through the pool.
pub fn process_page_access(
    pra: PageReplacementAlgorithm,
    page_table: &mut PageTable,
    pn: usize,
    frame_pool: &mut FramePool,
    timestamp: u64,
) -> Result<Access> {
    let resident = page_table.lookup(pn)?.frame_number();
    if let Some(frame) = resident {
        page_table.mark_hit(pn, timestamp)?;
        trace!("hit: page {} in frame {}", pn, frame);
        return Ok(Access::Hit { frame });
    }

    if let Some(next) = frame_pool.peek() {
        if page_table.resident_frames().any(|frame| frame == next) {
            return Err(Error::invariant(format!(
                "free frame {} is already held by a page",
                next
            )));
        }
        let frame = frame_pool.acquire()?;
        page_table.mark_loaded(pn, frame, timestamp)?;
        debug!("fault: page {} loaded into free frame {}", pn, frame);
        return Ok(Access::Loaded { frame });
    }

    let victim = pra.select_victim(page_table).ok_or_else(|| {
        Error::invariant(format!(
            "{} eviction requested for page {} but no page is resident",
            pra, pn
        ))
    })?;
    let frame = page_table.reset(victim)?;
    page_table.mark_loaded(pn, frame, timestamp)?;
    debug!(
        "fault: {} evicted page {} from frame {} for page {}",
        pra, victim, frame, pn
    );

    Ok(Access::Replaced { frame, victim })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page_table::PageTableEntry;

    #[test]
    fn hit_returns_existing_frame_without_touching_pool() {
        let mut table = PageTable::new(4).unwrap();
        table.mark_loaded(2, 5, 1).unwrap();
        let mut pool = FramePool::from_frames([0, 1]).unwrap();

        let access =
            process_page_access(PageReplacementAlgorithm::Fifo, &mut table, 2, &mut pool, 4)
                .unwrap();

        assert_eq!(access, Access::Hit { frame: 5 });
        assert!(!access.is_fault());
        assert_eq!(pool.len(), 2);
        assert_eq!(table.lookup(2).unwrap().reference_count(), 2);
        assert_eq!(table.lookup(2).unwrap().last_access_timestamp(), 4);
    }

    #[test]
    fn miss_takes_a_free_frame() {
        let mut table = PageTable::new(4).unwrap();
        let mut pool = FramePool::from_frames([0, 1]).unwrap();

        let access =
            process_page_access(PageReplacementAlgorithm::Lru, &mut table, 3, &mut pool, 1)
                .unwrap();

        assert_eq!(access, Access::Loaded { frame: 1 });
        assert!(access.is_fault());
        assert_eq!(access.victim(), None);
        assert_eq!(pool.len(), 1);
        assert_eq!(table.lookup(3).unwrap().frame_number(), Some(1));
    }

    #[test]
    fn miss_on_empty_pool_evicts_and_reuses_frame() {
        let mut table = PageTable::from_entries(vec![
            PageTableEntry::resident(10, 1, 6, 4),
            PageTableEntry::resident(11, 2, 3, 1),
            PageTableEntry::invalid(),
        ])
        .unwrap();
        let mut pool = FramePool::with_frames(0).unwrap();

        let access =
            process_page_access(PageReplacementAlgorithm::Lfu, &mut table, 2, &mut pool, 7)
                .unwrap();

        assert_eq!(access, Access::Replaced { frame: 11, victim: 1 });
        assert_eq!(*table.lookup(1).unwrap(), PageTableEntry::invalid());
        let loaded = table.lookup(2).unwrap();
        assert_eq!(loaded.frame_number(), Some(11));
        assert_eq!(loaded.arrival_timestamp(), 7);
        assert_eq!(loaded.reference_count(), 1);
        assert!(pool.is_empty());
    }

    #[test]
    fn eviction_with_nothing_resident_is_an_invariant_violation() {
        let mut table = PageTable::new(2).unwrap();
        let mut pool = FramePool::with_frames(0).unwrap();

        let err = process_page_access(PageReplacementAlgorithm::Fifo, &mut table, 0, &mut pool, 1)
            .unwrap_err();

        assert!(err.is_invariant_violation());
        assert_eq!(table.resident_count(), 0);
    }

    #[test]
    fn free_frame_already_held_is_rejected_before_loading() {
        let mut table = PageTable::new(3).unwrap();
        table.mark_loaded(0, 0, 1).unwrap();
        let mut pool = FramePool::from_frames([0]).unwrap();

        let err = process_page_access(PageReplacementAlgorithm::Fifo, &mut table, 1, &mut pool, 2)
            .unwrap_err();

        assert!(err.is_invariant_violation());
        assert!(!table.lookup(1).unwrap().is_valid());
        assert_eq!(table.resident_frames().collect::<Vec<_>>(), vec![0]);
        assert!(pool.contains(0));
    }

    #[test]
    fn frame_accounting_check_finds_shared_frame() {
        let mut table = PageTable::new(2).unwrap();
        table.mark_loaded(1, 4, 1).unwrap();

        assert!(check_frame_accounting(&table, &FramePool::from_frames([3, 5]).unwrap()).is_ok());
        assert!(check_frame_accounting(&table, &FramePool::from_frames([4]).unwrap())
            .unwrap_err()
            .is_invariant_violation());
    }

    #[test]
    fn records_print_one_trace_line() {
        let hit = AccessRecord {
            pn: 3,
            access: Access::Hit { frame: 7 },
        };
        let loaded = AccessRecord {
            pn: 4,
            access: Access::Loaded { frame: 2 },
        };
        let replaced = AccessRecord {
            pn: 5,
            access: Access::Replaced { frame: 7, victim: 3 },
        };

        assert_eq!(hit.to_string(), "3, 7, HIT");
        assert_eq!(loaded.to_string(), "4, 2, FAULT");
        assert_eq!(replaced.to_string(), "5, 7, FAULT, 3");
    }

    #[test]
    fn out_of_range_page_leaves_state_untouched() {
        let mut table = PageTable::new(2).unwrap();
        let mut pool = FramePool::with_frames(1).unwrap();

        let err = process_page_access(PageReplacementAlgorithm::Fifo, &mut table, 5, &mut pool, 1)
            .unwrap_err();

        assert!(matches!(err, Error::PageOutOfRange { page: 5, .. }));
        assert_eq!(pool.len(), 1);
    }
}
