use std::fmt;

use clap::{builder::PossibleValue, ValueEnum};

use crate::page_table::{PageTable, PageTableEntry};

/// Victim selection strategy used once the frame pool runs dry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageReplacementAlgorithm {
    /// Evict the page that was loaded first.
    Fifo,
    /// Evict the page that was accessed least recently.
    Lru,
    /// Evict the page with the fewest references, oldest arrival first.
    Lfu,
}

impl PageReplacementAlgorithm {
    /// Index of the valid entry to evict, or `None` if nothing is resident.
    /// Remaining ties go to the lowest page number.
    pub fn select_victim(&self, page_table: &PageTable) -> Option<usize> {
        match self {
            PageReplacementAlgorithm::Fifo => fifo(page_table),
            PageReplacementAlgorithm::Lru => lru(page_table),
            PageReplacementAlgorithm::Lfu => lfu(page_table),
        }
    }
}

fn fifo(page_table: &PageTable) -> Option<usize> {
    resident(page_table)
        .min_by_key(|(pn, entry)| (entry.arrival_timestamp(), *pn))
        .map(|(pn, _)| pn)
}

fn lru(page_table: &PageTable) -> Option<usize> {
    resident(page_table)
        .min_by_key(|(pn, entry)| (entry.last_access_timestamp(), *pn))
        .map(|(pn, _)| pn)
}

fn lfu(page_table: &PageTable) -> Option<usize> {
    resident(page_table)
        .min_by_key(|(pn, entry)| (entry.reference_count(), entry.arrival_timestamp(), *pn))
        .map(|(pn, _)| pn)
}

/// Valid entries with their page numbers.
fn resident(page_table: &PageTable) -> impl Iterator<Item = (usize, &PageTableEntry)> {
    page_table
        .entries()
        .iter()
        .enumerate()
        .filter(|(_, entry)| entry.is_valid())
}

// Below is boilerplate to allow for strict all caps CLI matching
impl fmt::Display for PageReplacementAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PageReplacementAlgorithm::Fifo => "FIFO",
            PageReplacementAlgorithm::Lru => "LRU",
            PageReplacementAlgorithm::Lfu => "LFU",
        };
        write!(f, "{}", s)
    }
}

impl ValueEnum for PageReplacementAlgorithm {
    fn value_variants<'a>() -> &'a [Self] {
        static VARIANTS: [PageReplacementAlgorithm; 3] = [
            PageReplacementAlgorithm::Fifo,
            PageReplacementAlgorithm::Lru,
            PageReplacementAlgorithm::Lfu,
        ];
        &VARIANTS
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        Some(match self {
            PageReplacementAlgorithm::Fifo => PossibleValue::new("FIFO"),
            PageReplacementAlgorithm::Lru => PossibleValue::new("LRU"),
            PageReplacementAlgorithm::Lfu => PossibleValue::new("LFU"),
        })
    }
}
