//! Niche overlap statistics
//!
//! - **I**: Hellinger-distance based overlap, 1 for identical distributions
//! - **D**: Schoener's D, 1 minus half the total variation distance

mod overlap;

pub use overlap::{compare_grids, compare_pair, metric_d, metric_i, overlap, GridPair, Overlap, Similarity};
