//! Grid data structures

mod cell;
mod geotransform;
mod grid;
mod header;

pub use cell::{format_value, Cell};
pub use geotransform::GeoTransform;
pub use grid::{AsciiGrid, GridStatistics};
pub use header::{Anchor, AsciiHeader, HEADER_KEYS, HEADER_LINES};
