use std::path::PathBuf;

use clap::Parser;
use pagesim::config::{DEFAULT_FRAMES, DEFAULT_PAGES};
use pagesim::PageReplacementAlgorithm;

#[derive(Parser, Debug)]
#[command(name = "pagesim", about = "Demand paging simulator")]
pub struct Cli {
    /// Reference string: page numbers separated by whitespace or newlines
    pub file: PathBuf,

    #[arg(default_value_t=DEFAULT_FRAMES)]
    pub frames: usize,

    #[arg(default_value_t=PageReplacementAlgorithm::Fifo)]
    pub pra: PageReplacementAlgorithm,

    /// Number of page table entries
    #[arg(short, long, default_value_t=DEFAULT_PAGES, conflicts_with = "table")]
    pub pages: usize,

    /// Explicit free frame ids, overriding FRAMES
    #[arg(long, value_delimiter = ',')]
    pub pool: Option<Vec<usize>>,

    /// Initial page table, one `IV FN ATS LATS RC` row per page
    #[arg(short, long)]
    pub table: Option<PathBuf>,

    /// Print one line per reference
    #[arg(long)]
    pub trace: bool,

    #[arg(short, long)]
    pub debug: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positionals_and_defaults() {
        let cli = Cli::try_parse_from(["pagesim", "refs.txt", "3", "LFU"]).unwrap();
        assert_eq!(cli.frames, 3);
        assert_eq!(cli.pra, PageReplacementAlgorithm::Lfu);
        assert_eq!(cli.pages, DEFAULT_PAGES);
        assert_eq!(cli.pool, None);
    }

    #[test]
    fn pool_takes_comma_separated_frames() {
        let cli = Cli::try_parse_from(["pagesim", "refs.txt", "--pool", "4,9,2"]).unwrap();
        assert_eq!(cli.pool, Some(vec![4, 9, 2]));
    }

    #[test]
    fn pages_cannot_be_combined_with_a_table() {
        assert!(Cli::try_parse_from(["pagesim", "refs.txt", "--table", "t.txt"]).is_ok());
        assert!(
            Cli::try_parse_from(["pagesim", "refs.txt", "--table", "t.txt", "--pages", "8"])
                .is_err()
        );
    }
}
