//! Parallel computation implementations for statistical operations
//!
//! Each reduction walks the 1-D lanes along the reduced axis on Rayon's pool.
//! NaN values are skipped throughout.

use crate::errors::Result;
use ndarray::{ArrayD, ArrayView1, Axis, RemoveAxis, Zip};

fn reduce_lanes<F>(data: &ArrayD<f64>, axis: usize, reduce: F) -> ArrayD<f64>
where
    F: Fn(ArrayView1<'_, f64>) -> f64 + Sync + Send,
{
    let mut out = ArrayD::<f64>::zeros(data.raw_dim().remove_axis(Axis(axis)));

    tracing::trace!(
        lanes = out.len(),
        threads = rayon::current_num_threads(),
        "reducing along axis {axis}"
    );

    Zip::from(&mut out)
        .and(data.lanes(Axis(axis)))
        .par_for_each(|slot, lane| *slot = reduce(lane));
    out
}

/// Computes mean along an axis using parallel processing
///
/// # Errors
///
/// Returns an error if the axis is invalid.
pub fn parallel_mean_axis(data: &ArrayD<f64>, axis: usize) -> Result<ArrayD<f64>> {
    Ok(reduce_lanes(data, axis, |lane| {
        let (sum, count) = lane
            .iter()
            .filter(|v| !v.is_nan())
            .fold((0.0_f64, 0_u32), |(s, c), &v| (s + v, c + 1));

        if count > 0 {
            sum / f64::from(count)
        } else {
            f64::NAN // Return NaN if all values were invalid
        }
    }))
}

/// Computes sum along an axis using parallel processing
///
/// # Errors
///
/// Returns an error if the axis is invalid.
pub fn parallel_sum_axis(data: &ArrayD<f64>, axis: usize) -> Result<ArrayD<f64>> {
    Ok(reduce_lanes(data, axis, |lane| {
        lane.iter().filter(|v| !v.is_nan()).sum()
    }))
}

/// Computes minimum along an axis using parallel processing
///
/// # Errors
///
/// Returns an error if the axis is invalid.
pub fn parallel_min_axis(data: &ArrayD<f64>, axis: usize) -> Result<ArrayD<f64>> {
    Ok(reduce_lanes(data, axis, |lane| {
        let min = lane
            .iter()
            .filter(|v| !v.is_nan())
            .fold(f64::INFINITY, |acc, &x| acc.min(x));
        // Convert INFINITY to NaN where no valid values were found
        if min == f64::INFINITY && !lane.iter().any(|&v| v == f64::INFINITY) {
            f64::NAN
        } else {
            min
        }
    }))
}

/// Computes maximum along an axis using parallel processing
///
/// # Errors
///
/// Returns an error if the axis is invalid.
pub fn parallel_max_axis(data: &ArrayD<f64>, axis: usize) -> Result<ArrayD<f64>> {
    Ok(reduce_lanes(data, axis, |lane| {
        let max = lane
            .iter()
            .filter(|v| !v.is_nan())
            .fold(f64::NEG_INFINITY, |acc, &x| acc.max(x));
        // Convert NEG_INFINITY to NaN where no valid values were found
        if max == f64::NEG_INFINITY && !lane.iter().any(|&v| v == f64::NEG_INFINITY) {
            f64::NAN
        } else {
            max
        }
    }))
}
