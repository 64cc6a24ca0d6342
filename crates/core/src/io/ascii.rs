//! ESRI ASCII grid (`.asc`) reading and writing
//!
//! Layout: six `KEY value` header lines followed by whitespace-delimited
//! rows. The last non-blank line of a file is treated as a footer and never
//! read as data, matching how Maxent-era tooling consumed these files.

use crate::error::{Error, Result};
use crate::raster::{AsciiGrid, AsciiHeader, Cell, HEADER_LINES};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// Token separator used when writing rows
const ROW_SEPARATOR: &str = "  ";

/// How many data rows the writer emits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowLayout {
    /// `nrows - 1` rows. Files written this way lose their last row, the same
    /// row layout existing `normalized_grids` caches have.
    #[default]
    Legacy,
    /// All `nrows` rows
    Full,
}

impl RowLayout {
    /// Rows written for a grid with `nrows` rows
    pub fn rows_written(self, nrows: usize) -> usize {
        match self {
            RowLayout::Legacy => nrows.saturating_sub(1),
            RowLayout::Full => nrows,
        }
    }
}

/// Options for writing ASCII grids
#[derive(Debug, Clone, Default)]
pub struct AsciiWriteOptions {
    pub row_layout: RowLayout,
}

/// Result of a create-if-absent write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    /// Target already existed and was left untouched
    Skipped,
}

/// Read an ASCII grid file
pub fn read_ascii_grid<P: AsRef<Path>>(path: P) -> Result<AsciiGrid> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| Error::from(e).in_file(path))?;
    parse_ascii_grid(&text).map_err(|e| e.in_file(path))
}

/// Parse ASCII grid text
pub fn parse_ascii_grid(text: &str) -> Result<AsciiGrid> {
    let lines: Vec<(usize, &str)> = text
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty())
        .collect();

    if lines.len() < HEADER_LINES + 1 {
        return Err(Error::Parse {
            line: lines.last().map_or(0, |(n, _)| *n),
            reason: format!(
                "expected at least {} non-blank lines, found {}",
                HEADER_LINES + 1,
                lines.len()
            ),
        });
    }

    let header = AsciiHeader::parse(&lines[..HEADER_LINES])?;
    let nodata = header.nodata().to_string();

    let data_lines = &lines[HEADER_LINES..lines.len() - 1];
    let mut cells = Vec::new();

    for &(line_no, line) in data_lines {
        for token in line.split_whitespace() {
            let cell = Cell::parse(token, &nodata).ok_or_else(|| Error::Parse {
                line: line_no,
                reason: format!("'{}' is neither a number nor the no-data token '{}'", token, nodata),
            })?;
            cells.push(cell);
        }
    }

    Ok(AsciiGrid::new(header, cells))
}

/// Encode a grid into any writer
pub fn encode_ascii_grid<W: Write>(
    grid: &AsciiGrid,
    mut writer: W,
    options: &AsciiWriteOptions,
) -> Result<()> {
    writer.write_all(grid.header().lines().join("\n").as_bytes())?;
    writer.write_all(b"\n")?;

    let tokens = grid.tokens();
    let ncols = grid.ncols();

    // The last row written may come out short; nothing is written past the data
    for row in 0..options.row_layout.rows_written(grid.nrows()) {
        let start = row.saturating_mul(ncols);
        if start >= tokens.len() {
            break;
        }
        let end = start.saturating_add(ncols).min(tokens.len());
        writer.write_all(tokens[start..end].join(ROW_SEPARATOR).as_bytes())?;
        writer.write_all(b"\n")?;
    }

    writer.flush()?;
    Ok(())
}

/// Write a grid, replacing any existing file
pub fn write_ascii_grid<P: AsRef<Path>>(
    grid: &AsciiGrid,
    path: P,
    options: &AsciiWriteOptions,
) -> Result<()> {
    let path = path.as_ref();
    let file = fs::File::create(path).map_err(|e| Error::from(e).in_file(path))?;
    encode_ascii_grid(grid, BufWriter::new(file), options).map_err(|e| e.in_file(path))
}

/// Write a grid only if `path` does not exist yet.
///
/// The grid is written to a temporary file next to the target and moved into
/// place with a no-clobber rename, so a file at `path` is always complete and
/// is never replaced once it exists. The parent directory must exist.
pub fn write_ascii_grid_if_absent<P: AsRef<Path>>(
    grid: &AsciiGrid,
    path: P,
    options: &AsciiWriteOptions,
) -> Result<WriteOutcome> {
    let path = path.as_ref();
    if path.exists() {
        debug!("{} exists, skipping", path.display());
        return Ok(WriteOutcome::Skipped);
    }

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| Error::from(e).in_file(dir))?;
    encode_ascii_grid(grid, BufWriter::new(tmp.as_file_mut()), options)
        .map_err(|e| e.in_file(tmp.path()))?;

    match tmp.persist_noclobber(path) {
        Ok(_) => Ok(WriteOutcome::Written),
        Err(e) if e.error.kind() == ErrorKind::AlreadyExists => {
            debug!("{} appeared while writing, keeping existing file", path.display());
            Ok(WriteOutcome::Skipped)
        }
        Err(e) => Err(Error::from(e.error).in_file(path)),
    }
}
