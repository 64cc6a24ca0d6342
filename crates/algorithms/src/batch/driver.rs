//! Enumerate and run tuned-vs-baseline comparisons

use std::fs;
use std::path::{Path, PathBuf};

use nicheoverlap_core::io::AsciiWriteOptions;
use nicheoverlap_core::{Error, Result};
use tracing::{info, warn};

use super::config::BatchConfig;
use super::report::ReportWriter;
use crate::normalize::{normalize, write_normalized, NormalizedSet, WriteSummary};
use crate::similarity::{compare_grids, GridPair, Overlap};

/// One comparison of a tuned grid against a baseline grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairJob {
    pub species: String,
    pub run: String,
    pub pair: GridPair,
    /// Report label, `<root>/<run>: <file> vs <baseline label>: <file>`
    pub label: String,
}

/// Totals of a batch run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub output: PathBuf,
    /// Pairs planned
    pub pairs: usize,
    /// Rows written to the report
    pub written: usize,
    /// Pairs that failed and were left out of the report
    pub failed: usize,
    /// Normalized grids written to the cache
    pub cache_written: usize,
    /// Normalized grids already cached
    pub cache_skipped: usize,
}

/// List the comparisons a batch run performs, in report order.
///
/// Species are visited in configured order; runs, tuned files and baseline
/// files are sorted by name. A run without the species directory is skipped
/// with a warning. A missing baseline species directory is an error.
pub fn plan(config: &BatchConfig) -> Result<Vec<PairJob>> {
    config.validate()?;

    let baseline = config.baseline_dir();
    let root_label = config.root_dir.display().to_string();
    let runs: Vec<(String, PathBuf)> = list_entries(&config.root_dir)?
        .into_iter()
        .filter(|(_, p)| p.is_dir())
        .collect();

    let mut jobs = Vec::new();

    for species in &config.species {
        let baseline_files = list_files(&baseline.join(species), config)?;

        for (run, run_dir) in &runs {
            let species_dir = run_dir.join(species);
            if !species_dir.is_dir() {
                warn!("{} has no {} directory, skipping", run_dir.display(), species);
                continue;
            }

            for (test_name, test_path) in list_files(&species_dir, config)? {
                for (ref_name, ref_path) in &baseline_files {
                    jobs.push(PairJob {
                        species: species.clone(),
                        run: run.clone(),
                        pair: GridPair::new(test_path.clone(), ref_path.clone()),
                        label: format!(
                            "{}/{}: {} vs {}: {}",
                            root_label, run, test_name, config.baseline_label, ref_name
                        ),
                    });
                }
            }
        }
    }

    Ok(jobs)
}

/// Run every planned comparison and write the report.
///
/// Each baseline grid is normalized once per call; a tuned grid is normalized
/// once for its block of pairs and dropped after. Both are cached under
/// `normalized_grids/` unless already there. A pair that fails is logged and
/// left out of the report, or aborts the run when `fail_fast` is set.
/// `observer` is called before each pair with its position and the total.
pub fn run<F>(config: &BatchConfig, mut observer: F) -> Result<BatchSummary>
where
    F: FnMut(&PairJob, usize, usize),
{
    let jobs = plan(config)?;
    let output = config.output_path();
    let options = AsciiWriteOptions {
        row_layout: config.row_layout,
    };

    info!(
        "Comparing {} pairs from {} against {}",
        jobs.len(),
        config.root_dir.display(),
        config.baseline_dir().display()
    );

    let mut report = ReportWriter::create(&output)?;
    let mut memo = GridMemo::default();
    let mut summary = BatchSummary {
        output: output.clone(),
        pairs: jobs.len(),
        ..BatchSummary::default()
    };

    for (idx, job) in jobs.iter().enumerate() {
        observer(job, idx, jobs.len());

        match memo.compare(&job.pair, &options) {
            Ok(overlap) => {
                report.write_row(&job.label, &overlap)?;
                summary.written += 1;
            }
            Err(e) if config.fail_fast => return Err(e),
            Err(e) => {
                warn!("Skipping {}: {}", job.label, e);
                summary.failed += 1;
            }
        }
    }

    report.finish()?;
    summary.cache_written = memo.cache.written;
    summary.cache_skipped = memo.cache.skipped;
    info!(
        "Wrote {} rows to {} ({} failed)",
        summary.written,
        output.display(),
        summary.failed
    );
    Ok(summary)
}

/// Normalized grids held between jobs.
///
/// Jobs run tuned grid outer, baseline inner, so baselines are reused for
/// the whole run while a tuned grid is only needed until the next one shows
/// up.
#[derive(Debug, Default)]
struct GridMemo {
    baseline: NormalizedSet,
    tuned: NormalizedSet,
    cache: WriteSummary,
}

impl GridMemo {
    fn compare(&mut self, pair: &GridPair, options: &AsciiWriteOptions) -> Result<Overlap> {
        if !self.tuned.contains(&pair.test) {
            self.tuned = NormalizedSet::new();
        }
        let tuned = load(&mut self.tuned, &pair.test, options)?;
        self.cache.merge(tuned);
        let baseline = load(&mut self.baseline, &pair.reference, options)?;
        self.cache.merge(baseline);

        compare_grids(self.tuned.get(&pair.test)?, self.baseline.get(&pair.reference)?)
    }
}

/// Normalize and cache `path` unless `set` already holds it
fn load(set: &mut NormalizedSet, path: &Path, options: &AsciiWriteOptions) -> Result<WriteSummary> {
    if set.contains(path) {
        return Ok(WriteSummary::default());
    }
    let fresh = normalize([path])?;
    let cache = write_normalized(&fresh, options)?;
    set.extend(fresh);
    Ok(cache)
}

/// Entries of `dir` as (name, path), sorted by name
fn list_entries(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    let read = fs::read_dir(dir).map_err(|e| Error::from(e).in_file(dir))?;
    let mut entries = Vec::new();
    for entry in read {
        let entry = entry.map_err(|e| Error::from(e).in_file(dir))?;
        entries.push((entry.file_name().to_string_lossy().into_owned(), entry.path()));
    }
    entries.sort();
    Ok(entries)
}

/// Files of `dir` minus excluded names
fn list_files(dir: &Path, config: &BatchConfig) -> Result<Vec<(String, PathBuf)>> {
    Ok(list_entries(dir)?
        .into_iter()
        .filter(|(name, path)| !config.is_excluded(name) && path.is_file())
        .collect())
}
