//! Interpolation kernels
//!
//! A kernel turns strictly ascending source coordinates and a list of target
//! coordinates into one [`WeightRow`] per target. Every supported method is
//! linear in the source values, so this is all the caller needs to resample
//! any number of lanes.

use super::method::OutOfBounds;
use super::spline::BSplineBasis;
use crate::axis_weights::WeightRow;
use crate::errors::{Result, RuClimError};

/// Strategy interface over the supported interpolation methods
pub trait Kernel: Send + Sync {
    /// Name used in diagnostics
    fn name(&self) -> String;

    /// Fewest source points the kernel can work with
    fn min_points(&self) -> usize;

    /// Weights of each target.
    ///
    /// `x` must be strictly ascending and hold at least
    /// [`Kernel::min_points`] values.
    ///
    /// # Errors
    ///
    /// Returns [`RuClimError::Interpolation`] if the weights cannot be built.
    fn weights(&self, x: &[f64], targets: &[f64], bounds: OutOfBounds) -> Result<Vec<WeightRow>>;
}

fn require_points(kernel: &dyn Kernel, x: &[f64]) -> Result<()> {
    if x.len() < kernel.min_points() {
        return Err(RuClimError::Interpolation(format!(
            "{} needs at least {} points, got {}",
            kernel.name(),
            kernel.min_points(),
            x.len()
        )));
    }
    Ok(())
}

fn outside(x: &[f64], u: f64) -> bool {
    // NaN targets count as outside
    !(u >= x[0] && u <= x[x.len() - 1])
}

/// Piecewise linear interpolation between neighbouring points
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearKernel;

impl Kernel for LinearKernel {
    fn name(&self) -> String {
        "linear".to_string()
    }

    fn min_points(&self) -> usize {
        2
    }

    fn weights(&self, x: &[f64], targets: &[f64], bounds: OutOfBounds) -> Result<Vec<WeightRow>> {
        require_points(self, x)?;
        let n = x.len();
        Ok(targets
            .iter()
            .map(|&u| {
                if u.is_nan() || (bounds == OutOfBounds::Nan && outside(x, u)) {
                    return WeightRow::Fill(f64::NAN);
                }
                // x[hi - 1] < u <= x[hi], clamped onto the edge segments
                let hi = x.partition_point(|&v| v < u).clamp(1, n - 1);
                let lo = hi - 1;
                let frac = (u - x[lo]) / (x[hi] - x[lo]);
                WeightRow::Terms(vec![(lo, 1.0 - frac), (hi, frac)])
            })
            .collect())
    }
}

/// Value of the nearest source point; ties go to the lower point
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestKernel;

impl Kernel for NearestKernel {
    fn name(&self) -> String {
        "nearest".to_string()
    }

    fn min_points(&self) -> usize {
        1
    }

    fn weights(&self, x: &[f64], targets: &[f64], bounds: OutOfBounds) -> Result<Vec<WeightRow>> {
        require_points(self, x)?;
        let midpoints: Vec<f64> = x.windows(2).map(|w| 0.5 * (w[0] + w[1])).collect();
        Ok(targets
            .iter()
            .map(|&u| {
                if u.is_nan() || (bounds == OutOfBounds::Nan && outside(x, u)) {
                    return WeightRow::Fill(f64::NAN);
                }
                let idx = midpoints.partition_point(|&m| m < u);
                WeightRow::Terms(vec![(idx, 1.0)])
            })
            .collect())
    }
}

/// Interpolating B-spline of a fixed degree
///
/// Degree 0 is a left step, degree 1 is piecewise linear, higher degrees use
/// not-a-knot style knot placement.
#[derive(Debug, Clone, Copy)]
pub struct SplineKernel {
    degree: usize,
}

impl SplineKernel {
    #[must_use]
    pub const fn new(degree: usize) -> Self {
        Self { degree }
    }

    #[must_use]
    pub const fn degree(&self) -> usize {
        self.degree
    }
}

impl Kernel for SplineKernel {
    fn name(&self) -> String {
        format!("spline of degree {}", self.degree)
    }

    fn min_points(&self) -> usize {
        self.degree + 1
    }

    fn weights(&self, x: &[f64], targets: &[f64], bounds: OutOfBounds) -> Result<Vec<WeightRow>> {
        require_points(self, x)?;
        let basis = BSplineBasis::interpolating(x, self.degree)?;

        targets
            .iter()
            .map(|&u| {
                if u.is_nan() || (bounds == OutOfBounds::Nan && outside(x, u)) {
                    return Ok(WeightRow::Fill(f64::NAN));
                }
                let terms = basis
                    .sample_weights(u)
                    .into_iter()
                    .enumerate()
                    // low degrees stay local, so a NaN only reaches its neighbours
                    .filter(|&(_, w)| self.degree > 1 || w != 0.0)
                    .collect();
                Ok(WeightRow::Terms(terms))
            })
            .collect()
    }
}
