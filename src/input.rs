//! Loading reference strings and page table snapshots from text.
//!
//! Both formats ignore blank lines and anything after a `#`.

use std::{fs, path::Path};

use log::debug;

use crate::error::{Error, Result};
use crate::page_table::{PageTable, PageTableEntry};
use crate::simulator::ReferenceString;

/// Parses whitespace separated page numbers.
pub fn parse_reference_string(contents: &str) -> Result<ReferenceString> {
    let mut pns = Vec::new();
    for (line, text) in significant_lines(contents) {
        for word in text.split_whitespace() {
            let pn = word.parse().map_err(|_| Error::Parse {
                line,
                reason: format!("`{}` is not a page number", word),
            })?;
            pns.push(pn);
        }
    }
    ReferenceString::new(pns)
}

pub fn load_reference_string(path: &Path) -> Result<ReferenceString> {
    let contents = fs::read_to_string(path)?;
    let references = parse_reference_string(&contents)?;
    debug!("loaded {} references from {}", references.len(), path.display());
    Ok(references)
}

/// Parses one page per row: `IV FN ATS LATS RC`.
///
/// `IV` is clamped into 0 or 1. Rows with `IV` 0 become reset entries
/// whatever else they carry; rows with `IV` 1 need a non-negative frame.
pub fn parse_page_table(contents: &str) -> Result<PageTable> {
    let mut entries = Vec::new();
    for (line, text) in significant_lines(contents) {
        let fields = text
            .split_whitespace()
            .map(|word| {
                word.parse::<i64>().map_err(|_| Error::Parse {
                    line,
                    reason: format!("`{}` is not an integer", word),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let &[iv, fn_field, ats, lats, rc] = fields.as_slice() else {
            return Err(Error::Parse {
                line,
                reason: format!("expected 5 fields (IV FN ATS LATS RC), found {}", fields.len()),
            });
        };

        if iv <= 0 {
            entries.push(PageTableEntry::invalid());
            continue;
        }

        let field = |name: &str, value: i64| {
            u64::try_from(value).map_err(|_| Error::Parse {
                line,
                reason: format!("{} of a valid page must be non-negative, found {}", name, value),
            })
        };
        let frame = field("FN", fn_field)? as usize;
        entries.push(PageTableEntry::resident(
            frame,
            field("ATS", ats)?,
            field("LATS", lats)?,
            field("RC", rc)?,
        ));
    }
    PageTable::from_entries(entries)
}

pub fn load_page_table(path: &Path) -> Result<PageTable> {
    let contents = fs::read_to_string(path)?;
    let page_table = parse_page_table(&contents)?;
    debug!(
        "loaded {} pages ({} resident) from {}",
        page_table.len(),
        page_table.resident_count(),
        path.display()
    );
    Ok(page_table)
}

/// Non-empty lines with comments stripped, numbered from 1.
fn significant_lines(contents: &str) -> impl Iterator<Item = (usize, &str)> {
    contents
        .lines()
        .enumerate()
        .map(|(idx, text)| (idx + 1, text.split('#').next().unwrap_or("").trim()))
        .filter(|(_, text)| !text.is_empty())
}
