//! File-level tests for ASCII grid reading and writing.

use std::fs;
use std::path::Path;

use nicheoverlap_core::io::{
    read_ascii_grid, write_ascii_grid, write_ascii_grid_if_absent, AsciiWriteOptions, RowLayout,
    WriteOutcome,
};
use nicheoverlap_core::raster::{AsciiGrid, AsciiHeader, Cell};
use nicheoverlap_core::Error;

const MAXENT_GRID: &str = "ncols         3
nrows         3
xllcorner     112.9
yllcorner     -43.7
cellsize      0.5
NODATA_value  -9999
-9999 0.0125 0.3
0.2 0.9 -9999
0.01 0.02 0.03
";

fn write_fixture(dir: &Path, name: &str, text: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, text).unwrap();
    path
}

#[test]
fn read_real_layout() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(dir.path(), "aust_30.asc", MAXENT_GRID);

    let grid = read_ascii_grid(&path).unwrap();
    assert_eq!(grid.ncols(), 3);
    assert_eq!(grid.nrows(), 3);
    assert_eq!(grid.nodata(), "-9999");
    // Last line is treated as a footer
    assert_eq!(grid.len(), 6);
    assert_eq!(grid.cells()[0], Cell::NoData);
    assert_eq!(grid.cells()[1], Cell::Value(0.0125));
    assert_eq!(grid.header().lines()[2], "xllcorner     112.9");
}

#[test]
fn read_errors_carry_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(dir.path(), "short.asc", "ncols 2\nnrows 2\n");

    let err = read_ascii_grid(&path).unwrap_err();
    match &err {
        Error::File { path: p, .. } => assert_eq!(p, &path),
        other => panic!("unexpected {other:?}"),
    }
    assert!(matches!(err.root(), Error::Parse { .. }));

    let missing = read_ascii_grid(dir.path().join("missing.asc")).unwrap_err();
    assert!(matches!(missing.root(), Error::Io(_)));
}

#[test]
fn write_then_read_full_layout() {
    let dir = tempfile::tempdir().unwrap();
    let header = AsciiHeader::new(2, 2, 0.0, 0.0, 1.0, "-9999").unwrap();
    let grid = AsciiGrid::from_values(header, &[Some(0.5), None, Some(0.25), Some(0.25)]);

    let path = dir.path().join("full.asc");
    let options = AsciiWriteOptions {
        row_layout: RowLayout::Full,
    };
    write_ascii_grid(&grid, &path, &options).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().count(), 8);
    assert!(text.ends_with("0.5  -9999\n0.25  0.25\n"));

    // Reading drops the last row again as a footer
    let reread = read_ascii_grid(&path).unwrap();
    assert_eq!(reread.len(), 2);
    assert_eq!(reread.cells()[1], Cell::NoData);
}

#[test]
fn legacy_layout_writes_one_row_less() {
    let dir = tempfile::tempdir().unwrap();
    let header = AsciiHeader::new(2, 3, 0.0, 0.0, 1.0, "-9999").unwrap();
    let grid = AsciiGrid::from_values(header, &[Some(1.0); 6]);

    let path = dir.path().join("legacy.asc");
    write_ascii_grid(&grid, &path, &AsciiWriteOptions::default()).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().count(), 6 + 2);
}

#[test]
fn if_absent_never_overwrites() {
    let dir = tempfile::tempdir().unwrap();
    let header = AsciiHeader::new(2, 2, 0.0, 0.0, 1.0, "-9999").unwrap();
    let first = AsciiGrid::from_values(header.clone(), &[Some(0.5), Some(0.5)]);
    let second = AsciiGrid::from_values(header, &[Some(0.9), Some(0.1)]);

    let path = dir.path().join("cached.asc");
    let options = AsciiWriteOptions::default();

    assert_eq!(
        write_ascii_grid_if_absent(&first, &path, &options).unwrap(),
        WriteOutcome::Written
    );
    let before = fs::read(&path).unwrap();

    assert_eq!(
        write_ascii_grid_if_absent(&second, &path, &options).unwrap(),
        WriteOutcome::Skipped
    );
    assert_eq!(fs::read(&path).unwrap(), before);

    // No temporary files left behind
    let entries = fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(entries, 1);
}
