use linked_hash_set::LinkedHashSet;
use log::trace;

use crate::config::{check_bound, POOL_MAX};
use crate::error::{Error, Result};
use crate::page_table::PageTable;

/// Free physical frames. The most recently added frame is handed out first.
#[derive(Debug, Clone)]
pub struct FramePool {
    frames: LinkedHashSet<usize>,
}

impl FramePool {
    /// Pool holding frames `0..count`, so frame `count - 1` is acquired first.
    pub fn with_frames(count: usize) -> Result<Self> {
        Self::from_frames(0..count)
    }

    /// Pool holding the given frame ids in order. Duplicate ids are rejected.
    pub fn from_frames<I>(frames: I) -> Result<Self>
    where
        I: IntoIterator<Item = usize>,
    {
        let mut pool = Self {
            frames: LinkedHashSet::new(),
        };
        for frame in frames {
            check_bound("frame", pool.frames.len() + 1, POOL_MAX)?;
            if !pool.frames.insert(frame) {
                return Err(Error::invariant(format!(
                    "frame {} appears twice in the frame pool",
                    frame
                )));
            }
        }
        Ok(pool)
    }

    /// Pool of frames `0..count` minus those already held by `page_table`.
    pub fn unheld(count: usize, page_table: &PageTable) -> Result<Self> {
        let held: Vec<usize> = page_table.resident_frames().collect();
        Self::from_frames((0..count).filter(|frame| !held.contains(frame)))
    }

    pub fn has_free(&self) -> bool {
        !self.frames.is_empty()
    }

    /// Next frame `acquire` would hand out.
    pub fn peek(&self) -> Option<usize> {
        self.frames.back().copied()
    }

    /// Removes and returns the next free frame.
    pub fn acquire(&mut self) -> Result<usize> {
        let frame = self.frames.pop_back().ok_or(Error::PoolExhausted)?;
        trace!("acquired frame {} ({} left)", frame, self.frames.len());
        Ok(frame)
    }

    /// Number of free frames (`frame_cnt`).
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn contains(&self, frame: usize) -> bool {
        self.frames.contains(&frame)
    }

    /// Free frames in acquisition order.
    pub fn frames(&self) -> Vec<usize> {
        let mut frames: Vec<usize> = self.frames.iter().copied().collect();
        frames.reverse();
        frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page_table::PageTableEntry;

    #[test]
    fn hands_out_frames_last_in_first_out() {
        let mut pool = FramePool::from_frames([4, 9, 2]).unwrap();
        assert_eq!(pool.len(), 3);
        assert_eq!(pool.acquire().unwrap(), 2);
        assert_eq!(pool.acquire().unwrap(), 9);
        assert_eq!(pool.acquire().unwrap(), 4);
        assert!(!pool.has_free());
    }

    #[test]
    fn empty_pool_fails_to_acquire() {
        let mut pool = FramePool::with_frames(0).unwrap();
        assert!(pool.is_empty());
        assert!(matches!(pool.acquire(), Err(Error::PoolExhausted)));
    }

    #[test]
    fn duplicate_frames_are_rejected() {
        let err = FramePool::from_frames([1, 2, 1]).unwrap_err();
        assert!(err.is_invariant_violation());
    }

    #[test]
    fn pool_larger_than_bound_is_rejected() {
        let err = FramePool::with_frames(POOL_MAX + 1).unwrap_err();
        assert!(matches!(err, Error::CountOutOfRange { what: "frame", .. }));
        assert!(FramePool::with_frames(POOL_MAX).is_ok());
    }

    #[test]
    fn bound_is_checked_before_the_iterator_is_drained() {
        let err = FramePool::from_frames(0..usize::MAX).unwrap_err();
        assert!(matches!(
            err,
            Error::CountOutOfRange { what: "frame", count, max: POOL_MAX } if count == POOL_MAX + 1
        ));
    }

    #[test]
    fn unheld_skips_frames_held_by_a_snapshot() {
        let table = PageTable::from_entries(vec![
            PageTableEntry::resident(1, 1, 1, 1),
            PageTableEntry::invalid(),
            PageTableEntry::resident(3, 2, 2, 1),
            PageTableEntry::resident(9, 3, 3, 1),
        ])
        .unwrap();

        let mut pool = FramePool::unheld(5, &table).unwrap();
        assert_eq!(pool.frames(), vec![4, 2, 0]);
        assert_eq!(pool.peek(), Some(4));
        assert_eq!(pool.acquire().unwrap(), 4);

        let fresh = FramePool::unheld(3, &PageTable::new(2).unwrap()).unwrap();
        assert_eq!(fresh.frames(), vec![2, 1, 0]);
    }

    #[test]
    fn frames_follow_acquisition_order() {
        let mut pool = FramePool::with_frames(3).unwrap();
        assert_eq!(pool.frames(), vec![2, 1, 0]);
        pool.acquire().unwrap();
        assert!(!pool.contains(2));
        assert_eq!(pool.frames(), vec![1, 0]);
    }
}
