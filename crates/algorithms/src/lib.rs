//! # nicheoverlap algorithms
//!
//! Niche overlap analysis for niche model prediction grids.
//!
//! ## Available Algorithm Categories
//!
//! - **normalize**: Probability normalization and the `normalized_grids` cache
//! - **similarity**: Hellinger-based I and Schoener's D
//! - **batch**: Tuned-vs-baseline comparison of whole model trees

pub mod batch;
pub mod normalize;
pub mod similarity;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::batch::{plan, run, BatchConfig, BatchSummary, PairJob};
    pub use crate::normalize::{
        normalize, normalize_and_write, normalize_grid, write_normalized, Normalize,
        NormalizedGrid, NormalizedSet,
    };
    pub use crate::similarity::{
        compare_pair, metric_d, metric_i, overlap, GridPair, Overlap, Similarity,
    };
    pub use nicheoverlap_core::prelude::*;
}
