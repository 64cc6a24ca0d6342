//! Probability normalization of prediction grids
//!
//! Each valid cell is divided by the sum of all valid cells so the grid
//! becomes a discrete probability distribution. No-data cells stay in place.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use nicheoverlap_core::io::{is_ascii_grid, read_ascii_grid};
use nicheoverlap_core::raster::{AsciiGrid, Cell};
use nicheoverlap_core::{Algorithm, Error, Result};
use tracing::debug;

/// Directory, next to each input grid, holding its normalized copy
pub const NORMALIZED_DIR: &str = "normalized_grids";

/// A normalized grid together with where it came from and where it is cached
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedGrid {
    source: PathBuf,
    output: PathBuf,
    grid: AsciiGrid,
}

impl NormalizedGrid {
    /// Path of the raw grid
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Path the normalized grid is cached at
    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn grid(&self) -> &AsciiGrid {
        &self.grid
    }
}

/// Normalized grids keyed by the path of their raw source
#[derive(Debug, Clone, Default)]
pub struct NormalizedSet {
    grids: BTreeMap<PathBuf, NormalizedGrid>,
}

impl NormalizedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, grid: NormalizedGrid) {
        self.grids.insert(grid.source.clone(), grid);
    }

    /// Look up the normalized grid for a raw source path
    pub fn get<P: AsRef<Path>>(&self, source: P) -> Result<&NormalizedGrid> {
        let source = source.as_ref();
        self.grids.get(source).ok_or_else(|| Error::MissingGrid {
            path: source.to_path_buf(),
        })
    }

    pub fn contains<P: AsRef<Path>>(&self, source: P) -> bool {
        self.grids.contains_key(source.as_ref())
    }

    pub fn extend(&mut self, other: NormalizedSet) {
        self.grids.extend(other.grids);
    }

    pub fn iter(&self) -> impl Iterator<Item = &NormalizedGrid> {
        self.grids.values()
    }

    pub fn len(&self) -> usize {
        self.grids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grids.is_empty()
    }
}

/// Cache path for a raw grid: `<dir>/normalized_grids/<file name>`
pub fn normalized_path<P: AsRef<Path>>(source: P) -> PathBuf {
    let source = source.as_ref();
    let dir = source.parent().unwrap_or_else(|| Path::new(""));
    match source.file_name() {
        Some(name) => dir.join(NORMALIZED_DIR).join(name),
        None => dir.join(NORMALIZED_DIR),
    }
}

/// Normalize one grid into a probability distribution over its valid cells.
///
/// The total is accumulated cell by cell in order, so results are
/// reproducible to the bit. Fails with [`Error::ZeroMass`] when the valid
/// cells sum to zero, including grids with no valid cells at all, and with
/// [`Error::NonFinite`] on a `nan` or `inf` cell.
pub fn normalize_grid(grid: &AsciiGrid) -> Result<AsciiGrid> {
    if let Some((index, value)) = grid
        .cells()
        .iter()
        .enumerate()
        .find_map(|(i, cell)| cell.value().filter(|v| !v.is_finite()).map(|v| (i, v)))
    {
        return Err(Error::NonFinite { index, value });
    }

    let sum = grid.valid_sum();
    if sum == 0.0 {
        return Err(Error::ZeroMass);
    }
    if !sum.is_finite() {
        return Err(Error::NonFiniteMass(sum));
    }

    let cells = grid
        .cells()
        .iter()
        .map(|&cell| match cell {
            Cell::NoData => Cell::NoData,
            Cell::Value(v) => Cell::Value(v / sum),
        })
        .collect();

    Ok(grid.with_cells(cells))
}

/// Read and normalize every `.asc` grid in `paths`.
///
/// Paths without the `.asc` extension are skipped. The first grid that
/// cannot be read or normalized aborts the call.
pub fn normalize<I, P>(paths: I) -> Result<NormalizedSet>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut set = NormalizedSet::new();

    for path in paths {
        let source = path.as_ref();
        if !is_ascii_grid(source) {
            debug!("Not an ASCII grid, skipping {}", source.display());
            continue;
        }

        let raw = read_ascii_grid(source)?;
        let grid = normalize_grid(&raw).map_err(|e| e.in_file(source))?;
        debug!(
            "Normalized {} ({} cells, {} valid)",
            source.display(),
            grid.len(),
            grid.statistics().valid_count
        );

        set.insert(NormalizedGrid {
            source: source.to_path_buf(),
            output: normalized_path(source),
            grid,
        });
    }

    Ok(set)
}

/// Normalization algorithm over a list of grid paths
#[derive(Debug, Clone, Default)]
pub struct Normalize;

impl Algorithm for Normalize {
    type Input = Vec<PathBuf>;
    type Output = NormalizedSet;
    type Params = ();
    type Error = Error;

    fn name(&self) -> &'static str {
        "Normalize"
    }

    fn description(&self) -> &'static str {
        "Scale valid cells of each grid so they sum to one"
    }

    fn execute(&self, input: Self::Input, _params: Self::Params) -> Result<Self::Output> {
        normalize(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nicheoverlap_core::raster::AsciiHeader;

    fn grid(values: &[Option<f64>]) -> AsciiGrid {
        let header = AsciiHeader::new(values.len(), 2, 0.0, 0.0, 1.0, "-9999").unwrap();
        AsciiGrid::from_values(header, values)
    }

    #[test]
    fn test_normalized_sums_to_one() {
        let raw = grid(&[Some(0.1), Some(0.7), None, Some(0.35), Some(2.0), None]);
        let norm = normalize_grid(&raw).unwrap();
        assert_relative_eq!(norm.valid_sum(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_nodata_preserved_in_place() {
        let raw = grid(&[None, Some(3.0), None, Some(1.0)]);
        let norm = normalize_grid(&raw).unwrap();
        let cells: Vec<Cell> = norm.cells().to_vec();
        assert_eq!(
            cells,
            vec![Cell::NoData, Cell::Value(0.75), Cell::NoData, Cell::Value(0.25)]
        );
        assert_eq!(norm.header(), raw.header());
    }

    #[test]
    fn test_zero_mass_fails() {
        assert!(matches!(
            normalize_grid(&grid(&[Some(0.0), None])),
            Err(Error::ZeroMass)
        ));
        assert!(matches!(normalize_grid(&grid(&[None, None])), Err(Error::ZeroMass)));
    }

    #[test]
    fn test_non_finite_cells_fail() {
        match normalize_grid(&grid(&[Some(0.5), Some(f64::NAN)])) {
            Err(Error::NonFinite { index, value }) => {
                assert_eq!(index, 1);
                assert!(value.is_nan());
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(
            normalize_grid(&grid(&[None, Some(f64::INFINITY)])),
            Err(Error::NonFinite { index: 1, .. })
        ));
    }

    #[test]
    fn test_overflowing_total_fails() {
        let raw = grid(&[Some(f64::MAX), Some(f64::MAX)]);
        assert!(matches!(normalize_grid(&raw), Err(Error::NonFiniteMass(_))));
    }

    #[test]
    fn test_repeatable_to_the_bit() {
        let raw = grid(&[Some(0.3), Some(0.1), Some(0.2), Some(1e-7), Some(0.9)]);
        let a = normalize_grid(&raw).unwrap();
        let b = normalize_grid(&raw).unwrap();
        assert_eq!(a.tokens(), b.tokens());
    }

    #[test]
    fn test_normalized_path() {
        assert_eq!(
            normalized_path("runs/lq/1.0/aust_30/aust_30.asc"),
            PathBuf::from("runs/lq/1.0/aust_30/normalized_grids/aust_30.asc")
        );
        assert_eq!(
            normalized_path("x.asc"),
            PathBuf::from("normalized_grids/x.asc")
        );
    }

    #[test]
    fn test_non_grid_paths_skipped() {
        let set = normalize(["notes.txt", "maxentResults.csv"]).unwrap();
        assert!(set.is_empty());
        assert!(matches!(set.get("notes.txt"), Err(Error::MissingGrid { .. })));
    }
}
