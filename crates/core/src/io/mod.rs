//! I/O operations for reading and writing grid files

mod ascii;

pub use ascii::{
    encode_ascii_grid, parse_ascii_grid, read_ascii_grid, write_ascii_grid,
    write_ascii_grid_if_absent, AsciiWriteOptions, RowLayout, WriteOutcome,
};

/// File extension of ESRI ASCII grids
pub const ASCII_GRID_EXTENSION: &str = "asc";

/// Whether `path` looks like an ASCII grid by its extension
pub fn is_ascii_grid<P: AsRef<std::path::Path>>(path: P) -> bool {
    path.as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ASCII_GRID_EXTENSION))
}
