//! Georeferencing for ASCII grids

use serde::{Deserialize, Serialize};

/// North-up georeferencing of a grid.
///
/// ASCII grids anchor on the lower-left corner; this stores the upper-left
/// corner instead so that row 0 (the first data row in the file) maps to the
/// northern edge:
/// ```text
/// x = origin_x + col * cell_size
/// y = origin_y - row * cell_size
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoTransform {
    /// X coordinate of the upper-left corner
    pub origin_x: f64,
    /// Y coordinate of the upper-left corner
    pub origin_y: f64,
    /// Square cell size
    pub cell_size: f64,
}

impl GeoTransform {
    pub fn new(origin_x: f64, origin_y: f64, cell_size: f64) -> Self {
        Self {
            origin_x,
            origin_y,
            cell_size,
        }
    }

    /// Build from the lower-left corner and row count of an ASCII grid
    pub fn from_lower_left(xll: f64, yll: f64, cell_size: f64, nrows: usize) -> Self {
        Self::new(xll, yll + nrows as f64 * cell_size, cell_size)
    }

    /// Bounding box (min_x, min_y, max_x, max_y) of a `cols` x `rows` grid
    pub fn bounds(&self, cols: usize, rows: usize) -> (f64, f64, f64, f64) {
        let max_x = self.origin_x + cols as f64 * self.cell_size;
        let min_y = self.origin_y - rows as f64 * self.cell_size;
        (self.origin_x, min_y, max_x, self.origin_y)
    }
}

impl Default for GeoTransform {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0)
    }
}
