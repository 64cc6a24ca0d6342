//! Niche overlap between two normalized grids
//!
//! Both statistics compare cell by cell and only count positions where
//! neither grid holds no-data:
//!
//! ```text
//! I = 1 - 0.5 * sum((sqrt(px) - sqrt(py))^2)     Hellinger-based
//! D = 1 - 0.5 * sum(|px - py|)                   Schoener's D
//! ```
//!
//! Warren, Glor & Turelli (2008), Evolution 62: 2868-2883.

use std::path::PathBuf;

use nicheoverlap_core::raster::{AsciiGrid, Cell};
use nicheoverlap_core::{Algorithm, Error, Result};
use tracing::debug;

use crate::normalize::{NormalizedGrid, NormalizedSet};

/// Raw grid paths of one comparison
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GridPair {
    /// Tuned model prediction
    pub test: PathBuf,
    /// Baseline prediction
    pub reference: PathBuf,
}

impl GridPair {
    pub fn new(test: impl Into<PathBuf>, reference: impl Into<PathBuf>) -> Self {
        Self {
            test: test.into(),
            reference: reference.into(),
        }
    }
}

/// Overlap statistics for one pair of grids
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overlap {
    /// Hellinger-based I
    pub i: f64,
    /// Schoener's D
    pub d: f64,
    /// Cell pairs where both grids had data
    pub cells: usize,
}

/// Running sums over the cell pairs valid in both grids
#[derive(Debug, Default)]
struct Sums {
    hellinger: f64,
    total_variation: f64,
    cells: usize,
    /// First negative value seen; I is undefined past it
    negative: Option<(usize, f64)>,
}

impl Sums {
    fn accumulate(x: &AsciiGrid, y: &AsciiGrid) -> Result<Self> {
        x.check_same_shape(y)?;

        let mut sums = Sums::default();
        for (index, (&a, &b)) in x.cells().iter().zip(y.cells().iter()).enumerate() {
            let (Cell::Value(px), Cell::Value(py)) = (a, b) else {
                continue;
            };
            for value in [px, py] {
                if !value.is_finite() {
                    return Err(Error::NonFinite { index, value });
                }
                if value < 0.0 && sums.negative.is_none() {
                    sums.negative = Some((index, value));
                }
            }

            if sums.negative.is_none() {
                let diff = px.sqrt() - py.sqrt();
                sums.hellinger += diff * diff;
            }
            sums.total_variation += (px - py).abs();
            sums.cells += 1;
        }
        Ok(sums)
    }

    fn i(&self) -> Result<f64> {
        match self.negative {
            Some((index, value)) => Err(Error::NegativeValue { index, value }),
            None => Ok(1.0 - 0.5 * self.hellinger),
        }
    }

    fn d(&self) -> f64 {
        1.0 - 0.5 * self.total_variation
    }
}

/// Compute I and D for two normalized grids.
///
/// The grids must have the same dimensions and cell count. Sums run in cell
/// order so the same inputs always give the same bits. With no cell valid in
/// both grids the sums are empty and I = D = 1. A negative cell fails with
/// [`Error::NegativeValue`] since I takes its square root.
pub fn overlap(x: &AsciiGrid, y: &AsciiGrid) -> Result<Overlap> {
    let sums = Sums::accumulate(x, y)?;
    Ok(Overlap {
        i: sums.i()?,
        d: sums.d(),
        cells: sums.cells,
    })
}

/// Hellinger-based niche overlap I
pub fn metric_i(x: &AsciiGrid, y: &AsciiGrid) -> Result<f64> {
    Sums::accumulate(x, y)?.i()
}

/// Schoener's D. Negative cells are accepted, so D can drop below zero.
pub fn metric_d(x: &AsciiGrid, y: &AsciiGrid) -> Result<f64> {
    Ok(Sums::accumulate(x, y)?.d())
}

/// Compare the normalized versions of a pair of raw grids.
///
/// Fails with [`Error::MissingGrid`] if either path was not normalized.
pub fn compare_pair(set: &NormalizedSet, pair: &GridPair) -> Result<Overlap> {
    compare_grids(set.get(&pair.test)?, set.get(&pair.reference)?)
}

/// Compare two normalized grids, naming the test source on failure
pub fn compare_grids(test: &NormalizedGrid, reference: &NormalizedGrid) -> Result<Overlap> {
    let result = overlap(test.grid(), reference.grid()).map_err(|e| e.in_file(test.source()))?;
    debug!(
        "{} vs {}: I = {}, D = {} over {} cells",
        test.source().display(),
        reference.source().display(),
        result.i,
        result.d,
        result.cells
    );
    Ok(result)
}

/// Niche overlap algorithm over two normalized grids
#[derive(Debug, Clone, Default)]
pub struct Similarity;

impl Algorithm for Similarity {
    type Input = (AsciiGrid, AsciiGrid);
    type Output = Overlap;
    type Params = ();
    type Error = Error;

    fn name(&self) -> &'static str {
        "Niche overlap"
    }

    fn description(&self) -> &'static str {
        "Hellinger-based I and Schoener's D between two probability grids"
    }

    fn execute(&self, input: Self::Input, _params: Self::Params) -> Result<Self::Output> {
        overlap(&input.0, &input.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize_grid;
    use approx::assert_relative_eq;
    use nicheoverlap_core::raster::AsciiHeader;

    fn grid(values: &[Option<f64>]) -> AsciiGrid {
        let header = AsciiHeader::new(2, 2, 0.0, 0.0, 1.0, "-9999").unwrap();
        normalize_grid(&AsciiGrid::from_values(header, values)).unwrap()
    }

    #[test]
    fn test_identical_grids() {
        let a = grid(&[Some(1.0), Some(1.0)]);
        assert_eq!(a.cells()[0], Cell::Value(0.5));

        let o = overlap(&a, &a).unwrap();
        assert_eq!(o.i, 1.0);
        assert_eq!(o.d, 1.0);
        assert_eq!(o.cells, 2);
    }

    #[test]
    fn test_disjoint_support() {
        let a = grid(&[Some(1.0), Some(0.0)]);
        let b = grid(&[Some(0.0), Some(1.0)]);
        let o = overlap(&a, &b).unwrap();
        assert_relative_eq!(o.i, 0.0, epsilon = 1e-12);
        assert_relative_eq!(o.d, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_opposite_nodata_excludes_every_pair() {
        let a = grid(&[Some(1.0), None]);
        let b = grid(&[None, Some(1.0)]);
        let o = overlap(&a, &b).unwrap();
        assert_eq!(o.cells, 0);
        assert_eq!(o.i, 1.0);
        assert_eq!(o.d, 1.0);
    }

    #[test]
    fn test_known_values() {
        // p = [0.25, 0.75], q = [0.5, 0.5]
        let a = grid(&[Some(1.0), Some(3.0)]);
        let b = grid(&[Some(2.0), Some(2.0)]);
        let o = overlap(&a, &b).unwrap();

        let expected_d = 1.0 - 0.5 * (0.25 + 0.25);
        let h = (0.25f64.sqrt() - 0.5f64.sqrt()).powi(2) + (0.75f64.sqrt() - 0.5f64.sqrt()).powi(2);
        assert_relative_eq!(o.d, expected_d, epsilon = 1e-12);
        assert_relative_eq!(o.i, 1.0 - 0.5 * h, epsilon = 1e-12);
        assert_eq!(metric_d(&a, &b).unwrap(), o.d);
        assert_eq!(metric_i(&a, &b).unwrap(), o.i);
    }

    #[test]
    fn test_symmetric() {
        let a = grid(&[Some(0.2), Some(0.9), Some(0.4), None]);
        let b = grid(&[Some(0.6), None, Some(0.1), Some(0.3)]);
        let ab = overlap(&a, &b).unwrap();
        let ba = overlap(&b, &a).unwrap();
        assert_relative_eq!(ab.i, ba.i, epsilon = 1e-15);
        assert_relative_eq!(ab.d, ba.d, epsilon = 1e-15);
    }

    #[test]
    fn test_size_mismatch() {
        let a = grid(&[Some(1.0), Some(1.0)]);
        let b = grid(&[Some(1.0), Some(1.0), Some(1.0)]);
        assert!(matches!(overlap(&a, &b), Err(Error::SizeMismatch { .. })));
    }

    fn raw(values: &[Option<f64>]) -> AsciiGrid {
        let header = AsciiHeader::new(2, 2, 0.0, 0.0, 1.0, "-9999").unwrap();
        AsciiGrid::from_values(header, values)
    }

    #[test]
    fn test_negative_value_fails_i_only() {
        let a = raw(&[Some(-0.5), Some(1.5)]);
        let b = raw(&[Some(0.5), Some(0.5)]);
        assert!(matches!(
            overlap(&a, &b),
            Err(Error::NegativeValue { index: 0, .. })
        ));
        assert!(matches!(
            metric_i(&a, &b),
            Err(Error::NegativeValue { index: 0, .. })
        ));
        // |-0.5 - 0.5| + |1.5 - 0.5| = 2
        assert_eq!(metric_d(&a, &b).unwrap(), 0.0);
    }

    #[test]
    fn test_d_goes_below_zero() {
        let a = raw(&[Some(-2.0), Some(1.0)]);
        let b = raw(&[Some(1.0), Some(-1.0)]);
        assert_relative_eq!(metric_d(&a, &b).unwrap(), -1.5, epsilon = 1e-12);
    }

    #[test]
    fn test_non_finite_value_fails_both() {
        let a = raw(&[Some(f64::NAN), Some(1.0)]);
        let b = raw(&[Some(0.5), Some(0.5)]);
        assert!(matches!(metric_d(&a, &b), Err(Error::NonFinite { index: 0, .. })));
        assert!(matches!(metric_i(&b, &a), Err(Error::NonFinite { index: 0, .. })));
    }

    #[test]
    fn test_compare_pair_missing() {
        let set = NormalizedSet::new();
        let pair = GridPair::new("a.asc", "b.asc");
        match compare_pair(&set, &pair) {
            Err(Error::MissingGrid { path }) => assert_eq!(path, PathBuf::from("a.asc")),
            other => panic!("unexpected {other:?}"),
        }
    }
}
