//! One-dimensional interpolation along named axes
//!
//! # Organization
//!
//! - [`method`]: the supported method names and the out-of-bounds policy
//! - [`kernel`]: the [`Kernel`] strategy trait and its implementations
//! - `spline`, `linalg`: B-spline bases and the dense solver behind them

pub mod kernel;
mod linalg;
pub mod method;
mod spline;

pub use kernel::{Kernel, LinearKernel, NearestKernel, SplineKernel};
pub use method::{InterpMethod, OutOfBounds};

use crate::axis_weights::{AxisWeights, NanPolicy, WeightRow};
use crate::errors::{Result, RuClimError};
use crate::labeled_array::{Coordinate, LabeledArray};

/// Resamples `array` along axis `dim` onto `targets`.
///
/// The axis keeps its name; its coordinate becomes `targets`. Source
/// coordinates may be ascending or descending. NaN source values propagate to
/// every target whose stencil touches them.
///
/// # Errors
///
/// - [`RuClimError::MissingCoordinate`] if `dim` has no numeric coordinate
/// - [`RuClimError::Interpolation`] for repeated or NaN source coordinates,
///   or too few source points for the kernel
pub fn interpolate_axis(
    array: &LabeledArray,
    dim: &str,
    targets: &Coordinate,
    kernel: &dyn Kernel,
    bounds: OutOfBounds,
) -> Result<LabeledArray> {
    let axis = array.axis_index(dim)?;
    let source = array.numeric_coord(dim)?;
    let target_values = targets.values.as_numeric().ok_or_else(|| {
        RuClimError::Interpolation(format!("target coordinate for '{dim}' is not numeric"))
    })?;

    let weights = axis_weights(source, target_values, kernel, bounds)
        .map_err(|e| match e {
            RuClimError::Interpolation(msg) => {
                RuClimError::Interpolation(format!("along '{dim}' of '{}': {msg}", array.name()))
            }
            other => other,
        })?;

    tracing::debug!(
        array = array.name(),
        dim,
        kernel = kernel.name(),
        from = source.len(),
        to = target_values.len(),
        "interpolating axis"
    );

    let data = weights.apply(array.data(), axis, NanPolicy::Propagate)?;
    array.replace_axis(axis, dim, data, Some(targets.clone()))
}

/// Kernel weights from unsorted `source` positions onto `targets`
pub fn axis_weights(
    source: &[f64],
    targets: &[f64],
    kernel: &dyn Kernel,
    bounds: OutOfBounds,
) -> Result<AxisWeights> {
    if source.iter().any(|v| v.is_nan()) {
        return Err(RuClimError::Interpolation("source coordinate contains NaN".to_string()));
    }

    let mut order: Vec<usize> = (0..source.len()).collect();
    order.sort_by(|&a, &b| source[a].total_cmp(&source[b]));
    let sorted: Vec<f64> = order.iter().map(|&i| source[i]).collect();
    if let Some(w) = sorted.windows(2).find(|w| w[0] == w[1]) {
        return Err(RuClimError::Interpolation(format!(
            "source coordinate repeats the value {}",
            w[0]
        )));
    }

    let rows = kernel
        .weights(&sorted, targets, bounds)?
        .into_iter()
        .map(|row| match row {
            WeightRow::Terms(terms) => {
                WeightRow::Terms(terms.into_iter().map(|(i, w)| (order[i], w)).collect())
            }
            fill => fill,
        })
        .collect();

    AxisWeights::new(source.len(), rows)
}
