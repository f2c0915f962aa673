//! Reduction kinds and the axis-reduction trait

use crate::errors::{Result, RuClimError};
use ndarray::ArrayD;
use std::str::FromStr;

/// Reduction applied to each lane of an axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatOperation {
    Mean,
    Sum,
    Min,
    Max,
}

impl FromStr for StatOperation {
    type Err = RuClimError;

    /// Accepts `mean`, `sum`, `min`/`minimum` and `max`/`maximum` in any case.
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "mean" => Ok(Self::Mean),
            "sum" => Ok(Self::Sum),
            "min" | "minimum" => Ok(Self::Min),
            "max" | "maximum" => Ok(Self::Max),
            other => Err(RuClimError::Generic(format!("unknown statistic '{other}'"))),
        }
    }
}

/// Arrays that can be collapsed along one axis
pub trait StatisticalReduction<T> {
    /// Collapse `axis` with `operation`, skipping NaN.
    ///
    /// A lane with no finite value gives NaN for mean, min and max, and 0 for sum.
    ///
    /// # Errors
    ///
    /// [`RuClimError::InvalidArray`] when `axis` is not an axis of the array.
    fn reduce_along_axis(&self, axis: usize, operation: StatOperation) -> Result<ArrayD<T>>;
}

impl StatisticalReduction<f64> for ArrayD<f64> {
    fn reduce_along_axis(&self, axis: usize, operation: StatOperation) -> Result<ArrayD<f64>> {
        if axis >= self.ndim() {
            return Err(RuClimError::InvalidArray {
                message: format!("axis {axis} does not exist in a {}-d array", self.ndim()),
            });
        }

        use super::parallel::{parallel_max_axis, parallel_mean_axis, parallel_min_axis, parallel_sum_axis};
        let reduce = match operation {
            StatOperation::Mean => parallel_mean_axis,
            StatOperation::Sum => parallel_sum_axis,
            StatOperation::Min => parallel_min_axis,
            StatOperation::Max => parallel_max_axis,
        };
        reduce(self, axis)
    }
}
