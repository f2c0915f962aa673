//! Day-count weights of time steps within period groups

use super::period::{Period, PeriodKey};
use crate::axis_weights::{AxisWeights, WeightRow};
use crate::errors::{Result, RuClimError};
use crate::labeled_array::TimeAxis;
use std::collections::BTreeMap;

/// Relative tolerance on the per-group weight sum
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Time steps sharing one period key, with their normalized weights
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodGroup {
    pub key: PeriodKey,
    /// Positions along the time axis
    pub indices: Vec<usize>,
    /// Days in month of each member divided by the group total
    pub weights: Vec<f64>,
}

impl PeriodGroup {
    #[must_use]
    pub fn weight_sum(&self) -> f64 {
        self.weights.iter().sum()
    }
}

/// Groups the time steps of `time` by `period` and weights each step by its
/// share of the group's total days in month.
///
/// Groups come out sorted by key. The normalization is verified before
/// returning.
///
/// # Errors
///
/// Returns [`RuClimError::InvariantViolation`] if a group's weights do not
/// sum to 1.0 within [`WEIGHT_SUM_TOLERANCE`].
pub fn climatology_weights(time: &TimeAxis, period: Period) -> Result<Vec<PeriodGroup>> {
    let days = time.days_in_month();

    let mut members: BTreeMap<PeriodKey, Vec<usize>> = BTreeMap::new();
    for (i, &date) in time.dates().iter().enumerate() {
        members.entry(period.key(date)).or_default().push(i);
    }

    let groups: Vec<PeriodGroup> = members
        .into_iter()
        .map(|(key, indices)| {
            let total: f64 = indices.iter().map(|&i| days[i]).sum();
            let weights = indices.iter().map(|&i| days[i] / total).collect();
            PeriodGroup { key, indices, weights }
        })
        .collect();

    verify_weights(&groups)?;
    Ok(groups)
}

/// Checks that every group's weights sum to 1.0.
///
/// # Errors
///
/// Returns [`RuClimError::InvariantViolation`] naming the first offending
/// group.
pub fn verify_weights(groups: &[PeriodGroup]) -> Result<()> {
    for group in groups {
        let sum = group.weight_sum();
        if !((sum - 1.0).abs() <= WEIGHT_SUM_TOLERANCE) {
            return Err(RuClimError::InvariantViolation {
                group: group.key.to_string(),
                sum,
            });
        }
    }
    Ok(())
}

/// Weighted-sum map collapsing the time axis onto one position per group
pub(crate) fn group_axis_weights(groups: &[PeriodGroup], time_len: usize) -> Result<AxisWeights> {
    let rows = groups
        .iter()
        .map(|g| WeightRow::Terms(g.indices.iter().copied().zip(g.weights.iter().copied()).collect()))
        .collect();
    AxisWeights::new(time_len, rows)
}
