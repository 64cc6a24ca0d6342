//! Grid cell values

use std::fmt;

/// One grid cell: either the header's no-data sentinel or a value.
///
/// The sentinel is matched as a literal token when parsing, so a cell is
/// `NoData` only if its text equals the header's `NODATA_value` text exactly.
/// `-9999.0` in a grid whose sentinel is `-9999` is a value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell {
    NoData,
    Value(f64),
}

impl Cell {
    /// Parse a data token against the grid's sentinel token.
    ///
    /// Returns `None` when the token is neither the sentinel nor a number.
    pub fn parse(token: &str, nodata: &str) -> Option<Self> {
        if token == nodata {
            return Some(Cell::NoData);
        }
        token.parse::<f64>().ok().map(Cell::Value)
    }

    pub fn value(self) -> Option<f64> {
        match self {
            Cell::Value(v) => Some(v),
            Cell::NoData => None,
        }
    }

    pub fn is_nodata(self) -> bool {
        matches!(self, Cell::NoData)
    }

    /// Text written to a grid file for this cell
    pub fn token(self, nodata: &str) -> String {
        match self {
            Cell::NoData => nodata.to_string(),
            Cell::Value(v) => format_value(v),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::NoData => f.write_str("NODATA"),
            Cell::Value(v) => f.write_str(&format_value(*v)),
        }
    }
}

/// Shortest text that parses back to exactly `v`.
///
/// Integral values keep a trailing `.0` and very small or large magnitudes
/// use exponent notation, so normalized probabilities stay compact.
pub fn format_value(v: f64) -> String {
    format!("{v:?}")
}
