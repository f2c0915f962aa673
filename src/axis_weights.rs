//! Sparse linear maps applied along one axis of an array
//!
//! Both the day-weighted group sums of the climatology and every
//! interpolation kernel boil down to "each output position along an axis is
//! a weighted sum of a few input positions". [`AxisWeights`] stores those
//! weights once and applies them to every 1-D lane of the array in parallel.

use crate::errors::{Result, RuClimError};
use ndarray::{ArrayD, ArrayView1, Axis, Zip};

/// How NaN input values are treated when a row is evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NanPolicy {
    /// NaN terms contribute nothing to the sum
    Skip,
    /// Any NaN term makes the output NaN
    Propagate,
}

/// One output position
#[derive(Debug, Clone, PartialEq)]
pub enum WeightRow {
    /// Constant output, independent of the input (out-of-bounds fill)
    Fill(f64),
    /// `sum(weight * input[index])`
    Terms(Vec<(usize, f64)>),
}

impl WeightRow {
    fn evaluate(&self, lane: &ArrayView1<'_, f64>, nan: NanPolicy) -> f64 {
        match self {
            Self::Fill(value) => *value,
            Self::Terms(terms) => terms
                .iter()
                .map(|&(i, w)| (lane[i], w))
                .filter(|(v, _)| nan == NanPolicy::Propagate || !v.is_nan())
                .map(|(v, w)| v * w)
                .sum(),
        }
    }
}

/// Weights mapping an axis of length `source_len` onto `rows.len()` positions
#[derive(Debug, Clone, PartialEq)]
pub struct AxisWeights {
    source_len: usize,
    rows: Vec<WeightRow>,
}

impl AxisWeights {
    /// # Errors
    ///
    /// Returns [`RuClimError::InvalidArray`] if a row refers to an index
    /// outside `0..source_len`.
    pub fn new(source_len: usize, rows: Vec<WeightRow>) -> Result<Self> {
        let out_of_range = rows.iter().any(|row| match row {
            WeightRow::Fill(_) => false,
            WeightRow::Terms(terms) => terms.iter().any(|&(i, _)| i >= source_len),
        });
        if out_of_range {
            return Err(RuClimError::InvalidArray {
                message: format!("weight row refers past the end of an axis of length {source_len}"),
            });
        }
        Ok(Self { source_len, rows })
    }

    #[must_use]
    pub const fn source_len(&self) -> usize {
        self.source_len
    }

    #[must_use]
    pub fn target_len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn rows(&self) -> &[WeightRow] {
        &self.rows
    }

    /// Applies the map along `axis`, returning an array whose `axis` has
    /// length [`AxisWeights::target_len`].
    ///
    /// # Errors
    ///
    /// Returns [`RuClimError::InvalidArray`] if `axis` is out of bounds or its
    /// length differs from [`AxisWeights::source_len`].
    pub fn apply(&self, data: &ArrayD<f64>, axis: usize, nan: NanPolicy) -> Result<ArrayD<f64>> {
        if axis >= data.ndim() {
            return Err(RuClimError::InvalidArray {
                message: format!("axis {axis} is out of bounds for array with {} dimensions", data.ndim()),
            });
        }
        if data.len_of(Axis(axis)) != self.source_len {
            return Err(RuClimError::InvalidArray {
                message: format!(
                    "axis {axis} has length {} but the weights expect {}",
                    data.len_of(Axis(axis)),
                    self.source_len
                ),
            });
        }

        let mut shape = data.shape().to_vec();
        shape[axis] = self.rows.len();
        let mut out = ArrayD::<f64>::zeros(shape);

        Zip::from(out.lanes_mut(Axis(axis)))
            .and(data.lanes(Axis(axis)))
            .par_for_each(|mut out_lane, in_lane| {
                for (slot, row) in out_lane.iter_mut().zip(&self.rows) {
                    *slot = row.evaluate(&in_lane, nan);
                }
            });

        Ok(out)
    }
}
