//! CSV report of pairwise overlap

use std::fs::File;
use std::path::Path;

use nicheoverlap_core::raster::format_value;
use nicheoverlap_core::{Error, Result};

use crate::similarity::Overlap;

/// Report columns
pub const REPORT_HEADER: [&str; 3] = ["pair", "I", "D"];

/// Writes one `pair,I,D` row per comparison, flushing after each row so a
/// long run that dies part way keeps what it computed.
pub struct ReportWriter {
    inner: csv::Writer<File>,
}

impl ReportWriter {
    /// Create (or truncate) the report and write its header
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut inner = csv::Writer::from_path(path).map_err(|e| csv_error(e).in_file(path))?;
        inner.write_record(REPORT_HEADER).map_err(csv_error)?;
        inner.flush()?;
        Ok(Self { inner })
    }

    pub fn write_row(&mut self, label: &str, overlap: &Overlap) -> Result<()> {
        let i = format_value(overlap.i);
        let d = format_value(overlap.d);
        self.inner
            .write_record([label, i.as_str(), d.as_str()])
            .map_err(csv_error)?;
        self.inner.flush()?;
        Ok(())
    }

    pub fn finish(mut self) -> Result<()> {
        self.inner.flush()?;
        Ok(())
    }
}

fn csv_error(e: csv::Error) -> Error {
    Error::Csv(e.to_string())
}
