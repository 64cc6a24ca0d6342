//! # nicheoverlap core
//!
//! Core types, traits and I/O for comparing niche model predictions.
//!
//! This crate provides:
//! - `AsciiGrid`: an ESRI ASCII grid with its verbatim header
//! - `Cell`: a grid value or the no-data sentinel
//! - `GeoTransform`: georeferencing derived from the header
//! - Algorithm traits for consistent API
//! - Reading and writing `.asc` files

pub mod error;
pub mod io;
pub mod raster;

pub use error::{Error, Result};
pub use raster::{AsciiGrid, AsciiHeader, Cell, GeoTransform};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::raster::{AsciiGrid, AsciiHeader, Cell, GeoTransform};
    pub use crate::Algorithm;
}

/// Core trait for all algorithms in nicheoverlap.
///
/// Algorithms are pure functions that transform input data according to parameters.
pub trait Algorithm {
    /// Input type for the algorithm
    type Input;
    /// Output type for the algorithm
    type Output;
    /// Parameters controlling algorithm behavior
    type Params: Default;
    /// Error type for algorithm execution
    type Error: std::error::Error;

    /// Returns the algorithm name
    fn name(&self) -> &'static str;

    /// Returns a description of what the algorithm does
    fn description(&self) -> &'static str;

    /// Execute the algorithm
    fn execute(&self, input: Self::Input, params: Self::Params) -> std::result::Result<Self::Output, Self::Error>;

    /// Execute with default parameters
    fn execute_default(&self, input: Self::Input) -> std::result::Result<Self::Output, Self::Error> {
        self.execute(input, Self::Params::default())
    }
}
