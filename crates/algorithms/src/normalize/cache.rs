//! On-disk cache of normalized grids
//!
//! A normalized grid is written once to its `normalized_grids` path and
//! never rewritten; presence of the file is the cache key.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use nicheoverlap_core::io::{write_ascii_grid_if_absent, AsciiWriteOptions, WriteOutcome};
use nicheoverlap_core::{Error, Result};
use tracing::{debug, info};

use super::probability::{normalize, NormalizedSet};

/// Counts of cache files written and left alone
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteSummary {
    pub written: usize,
    pub skipped: usize,
}

impl WriteSummary {
    pub fn merge(&mut self, other: WriteSummary) {
        self.written += other.written;
        self.skipped += other.skipped;
    }
}

/// Persist every grid of `set` to its cache path, skipping files that exist
pub fn write_normalized(set: &NormalizedSet, options: &AsciiWriteOptions) -> Result<WriteSummary> {
    let dirs: BTreeSet<&Path> = set.iter().filter_map(|g| g.output().parent()).collect();
    for dir in dirs {
        if dir.as_os_str().is_empty() || dir.is_dir() {
            continue;
        }
        debug!("Creating {}", dir.display());
        fs::create_dir_all(dir).map_err(|e| Error::from(e).in_file(dir))?;
    }

    let mut summary = WriteSummary::default();
    for grid in set.iter() {
        match write_ascii_grid_if_absent(grid.grid(), grid.output(), options)? {
            WriteOutcome::Written => {
                info!("Wrote {}", grid.output().display());
                summary.written += 1;
            }
            WriteOutcome::Skipped => summary.skipped += 1,
        }
    }

    Ok(summary)
}

/// Normalize `paths` and write their cache files in one step
pub fn normalize_and_write<I, P>(
    paths: I,
    options: &AsciiWriteOptions,
) -> Result<(NormalizedSet, WriteSummary)>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let set = normalize(paths)?;
    let summary = write_normalized(&set, options)?;
    Ok((set, summary))
}
