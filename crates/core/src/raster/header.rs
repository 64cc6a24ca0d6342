//! ESRI ASCII grid header

use crate::error::{Error, Result};
use crate::raster::GeoTransform;

/// Header keys in the order they must appear
pub const HEADER_KEYS: [&str; 6] = [
    "ncols",
    "nrows",
    "xllcorner",
    "yllcorner",
    "cellsize",
    "NODATA_value",
];

/// Number of header lines in an ASCII grid
pub const HEADER_LINES: usize = HEADER_KEYS.len();

/// Whether the origin keys name the lower-left corner or the center of the
/// lower-left cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Anchor {
    #[default]
    Corner,
    Center,
}

/// The six metadata lines of an ASCII grid.
///
/// The original lines are kept verbatim so a grid written back out carries
/// exactly the header it was read with.
#[derive(Debug, Clone, PartialEq)]
pub struct AsciiHeader {
    lines: Vec<String>,
    ncols: usize,
    nrows: usize,
    xll: f64,
    yll: f64,
    cell_size: f64,
    anchor: Anchor,
    nodata: String,
}

impl AsciiHeader {
    /// Build a header from values, formatted the way ESRI tools write it
    pub fn new(
        ncols: usize,
        nrows: usize,
        xll: f64,
        yll: f64,
        cell_size: f64,
        nodata: &str,
    ) -> Result<Self> {
        let lines = [
            ncols.to_string(),
            nrows.to_string(),
            xll.to_string(),
            yll.to_string(),
            cell_size.to_string(),
            nodata.to_string(),
        ]
        .iter()
        .zip(HEADER_KEYS)
        .map(|(value, key)| format!("{key:<14}{value}"))
        .collect::<Vec<_>>();

        let refs: Vec<(usize, &str)> = lines.iter().enumerate().map(|(i, l)| (i + 1, l.as_str())).collect();
        Self::parse(&refs)
    }

    /// Parse six `(line number, text)` header lines
    pub fn parse(lines: &[(usize, &str)]) -> Result<Self> {
        if lines.len() != HEADER_LINES {
            return Err(Error::InvalidHeader(format!(
                "expected {} header lines, got {}",
                HEADER_LINES,
                lines.len()
            )));
        }

        let mut values = Vec::with_capacity(HEADER_LINES);
        let mut anchor = Anchor::Corner;

        for (idx, &(line_no, text)) in lines.iter().enumerate() {
            let text = text.trim();
            let key = text.split_whitespace().next().unwrap_or_default();
            let expected = HEADER_KEYS[idx];

            let matches = key.eq_ignore_ascii_case(expected)
                || match idx {
                    2 | 3 if key.to_ascii_lowercase().ends_with("llcenter") => {
                        let axis = if idx == 2 { "x" } else { "y" };
                        if key.to_ascii_lowercase().starts_with(axis) {
                            anchor = Anchor::Center;
                            true
                        } else {
                            false
                        }
                    }
                    _ => false,
                };

            if !matches {
                return Err(Error::Parse {
                    line: line_no,
                    reason: format!("expected header key '{}', found '{}'", expected, key),
                });
            }

            let value = text[key.len()..].trim();
            if value.is_empty() {
                return Err(Error::Parse {
                    line: line_no,
                    reason: format!("header key '{}' has no value", expected),
                });
            }
            values.push((line_no, value));
        }

        let ncols = parse_dimension(values[0], "ncols")?;
        let nrows = parse_dimension(values[1], "nrows")?;
        if ncols.checked_mul(nrows).is_none() {
            return Err(Error::InvalidHeader(format!(
                "ncols {} x nrows {} cells overflows",
                ncols, nrows
            )));
        }
        let xll = parse_coordinate(values[2], HEADER_KEYS[2])?;
        let yll = parse_coordinate(values[3], HEADER_KEYS[3])?;
        let cell_size = parse_coordinate(values[4], HEADER_KEYS[4])?;

        Ok(Self {
            lines: lines.iter().map(|(_, l)| l.trim().to_string()).collect(),
            ncols,
            nrows,
            xll,
            yll,
            cell_size,
            anchor,
            nodata: values[5].1.to_string(),
        })
    }

    /// Header lines as read
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn ncols(&self) -> usize {
        self.ncols
    }

    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// The literal no-data token
    pub fn nodata(&self) -> &str {
        &self.nodata
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    /// Whether two headers describe grids of the same shape
    pub fn same_shape(&self, other: &AsciiHeader) -> bool {
        self.ncols == other.ncols && self.nrows == other.nrows
    }

    /// Georeferencing of the grid
    pub fn transform(&self) -> GeoTransform {
        let (xll, yll) = match self.anchor {
            Anchor::Corner => (self.xll, self.yll),
            Anchor::Center => (
                self.xll - self.cell_size / 2.0,
                self.yll - self.cell_size / 2.0,
            ),
        };
        GeoTransform::from_lower_left(xll, yll, self.cell_size, self.nrows)
    }
}

fn parse_dimension((line, value): (usize, &str), name: &str) -> Result<usize> {
    match value.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(Error::InvalidHeader(format!(
            "line {}: {} must be a positive integer, got '{}'",
            line, name, value
        ))),
    }
}

fn parse_coordinate((line, value): (usize, &str), name: &str) -> Result<f64> {
    value.parse::<f64>().map_err(|_| {
        Error::InvalidHeader(format!("line {}: {} must be a number, got '{}'", line, name, value))
    })
}
