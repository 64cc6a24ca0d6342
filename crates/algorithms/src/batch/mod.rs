//! Batch comparison of tuned model runs against a baseline
//!
//! Walks `<root>/<run>/<species>` and `<baseline>/<species>`, compares every
//! tuned grid with every baseline grid and writes a `pair,I,D` CSV report.

mod config;
mod driver;
mod report;

pub use config::{BatchConfig, DEFAULT_BASELINE_DIR, DEFAULT_BASELINE_LABEL, DEFAULT_SPECIES};
pub use driver::{plan, run, BatchSummary, PairJob};
pub use report::{ReportWriter, REPORT_HEADER};
