//! Grid normalization
//!
//! - **probability**: scale valid cells to a probability distribution
//! - **cache**: write normalized grids to `normalized_grids/` once

mod cache;
mod probability;

pub use cache::{normalize_and_write, write_normalized, WriteSummary};
pub use probability::{
    normalize, normalize_grid, normalized_path, Normalize, NormalizedGrid, NormalizedSet,
    NORMALIZED_DIR,
};
