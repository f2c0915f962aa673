//! Statistical computations and parallel reduction operations
//!
//! This module provides NaN-skipping reductions (mean, sum, min, max) over
//! axes of arrays, and their labeled-array counterparts.
//!
//! # Organization
//!
//! - [`operations`]: Core statistical operations and traits
//! - [`parallel`]: Parallel computation implementations
//! - [`grouping`]: Reductions of labeled arrays over named axes and label groups

pub mod grouping;
pub mod operations;
pub mod parallel;

// Re-export the main types and functions for convenience
pub use grouping::{groupby_coordinate, reduce_dimension};
pub use operations::{StatOperation, StatisticalReduction};
pub use parallel::{parallel_max_axis, parallel_mean_axis, parallel_min_axis, parallel_sum_axis};
