//! Main grid type

use crate::error::{Error, Result};
use crate::raster::{AsciiHeader, Cell, GeoTransform};
use ndarray::Array1;

/// A parsed ESRI ASCII grid.
///
/// Cells are stored flat in row-major order, row 0 first. The cell count is
/// whatever the data section held and is not forced to `ncols * nrows`; grids
/// are only checked against each other when compared.
///
/// # Example
///
/// ```ignore
/// use nicheoverlap_core::io::read_ascii_grid;
///
/// let grid = read_ascii_grid("default/aust_30/aust_30.asc")?;
/// let stats = grid.statistics();
/// println!("{} valid cells, sum {}", stats.valid_count, stats.sum);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AsciiGrid {
    header: AsciiHeader,
    cells: Array1<Cell>,
}

impl AsciiGrid {
    pub fn new(header: AsciiHeader, cells: Vec<Cell>) -> Self {
        Self {
            header,
            cells: Array1::from_vec(cells),
        }
    }

    /// Build a grid from plain values, mapping `None` to no-data
    pub fn from_values(header: AsciiHeader, values: &[Option<f64>]) -> Self {
        let cells = values
            .iter()
            .map(|v| v.map_or(Cell::NoData, Cell::Value))
            .collect();
        Self::new(header, cells)
    }

    pub fn header(&self) -> &AsciiHeader {
        &self.header
    }

    pub fn cells(&self) -> &Array1<Cell> {
        &self.cells
    }

    /// Number of cells parsed
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn ncols(&self) -> usize {
        self.header.ncols()
    }

    pub fn nrows(&self) -> usize {
        self.header.nrows()
    }

    /// The literal no-data token of this grid
    pub fn nodata(&self) -> &str {
        self.header.nodata()
    }

    pub fn transform(&self) -> GeoTransform {
        self.header.transform()
    }

    /// Same header, new cells
    pub fn with_cells(&self, cells: Vec<Cell>) -> Self {
        Self::new(self.header.clone(), cells)
    }

    /// Fails unless `other` has the same dimensions and cell count
    pub fn check_same_shape(&self, other: &AsciiGrid) -> Result<()> {
        if self.header.same_shape(&other.header) && self.len() == other.len() {
            return Ok(());
        }
        Err(Error::SizeMismatch {
            er: self.nrows(),
            ec: self.ncols(),
            en: self.len(),
            ar: other.nrows(),
            ac: other.ncols(),
            an: other.len(),
        })
    }

    /// Cell tokens as they are written to disk
    pub fn tokens(&self) -> Vec<String> {
        let nodata = self.nodata();
        self.cells.iter().map(|c| c.token(nodata)).collect()
    }

    /// Sum of all valid cells, accumulated in cell order
    pub fn valid_sum(&self) -> f64 {
        let mut sum = 0.0;
        for v in self.cells.iter().filter_map(|c| c.value()) {
            sum += v;
        }
        sum
    }

    /// Min, max, mean, sum and counts over valid cells
    pub fn statistics(&self) -> GridStatistics {
        let mut min: Option<f64> = None;
        let mut max: Option<f64> = None;
        let mut sum = 0.0;
        let mut count = 0usize;

        for v in self.cells.iter().filter_map(|c| c.value()) {
            min = Some(min.map_or(v, |m| m.min(v)));
            max = Some(max.map_or(v, |m| m.max(v)));
            sum += v;
            count += 1;
        }

        let mean = if count > 0 {
            Some(sum / count as f64)
        } else {
            None
        };

        GridStatistics {
            min,
            max,
            mean,
            sum,
            valid_count: count,
            nodata_count: self.len() - count,
        }
    }
}

/// Basic statistics for a grid
#[derive(Debug, Clone, PartialEq)]
pub struct GridStatistics {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub sum: f64,
    pub valid_count: usize,
    pub nodata_count: usize,
}
