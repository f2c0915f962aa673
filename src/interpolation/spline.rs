//! Interpolating B-spline bases
//!
//! For degree `k` and `n` strictly ascending sites the knot vector has
//! `n + k + 1` entries with `k + 1`-fold end knots: the sites themselves for
//! degree 0, every interior site except the `(k+1)/2` nearest each end for odd
//! degrees, and the site midpoints minus `k/2` at each end for even degrees.
//! The spline through `y` has coefficients `c = A^-1 y`, `A[i][j] = B_j(x_i)`,
//! so the value at `u` is `w . y` with `A^T w = b(u)`.

use super::linalg::LuFactor;
use crate::errors::Result;

#[derive(Debug, Clone)]
pub(crate) struct BSplineBasis {
    knots: Vec<f64>,
    degree: usize,
    len: usize,
    /// Factors of the transposed collocation matrix
    collocation_t: LuFactor,
}

impl BSplineBasis {
    /// Basis for the spline of `degree` interpolating at sites `x`.
    ///
    /// `x` must be strictly ascending with at least `degree + 1` entries.
    pub(crate) fn interpolating(x: &[f64], degree: usize) -> Result<Self> {
        let n = x.len();
        let knots = knot_vector(x, degree);

        let mut transposed = vec![0.0; n * n];
        for (i, &site) in x.iter().enumerate() {
            let (first, values) = nonzero_basis(&knots, degree, n, site);
            for (offset, value) in values.into_iter().enumerate() {
                transposed[(first + offset) * n + i] = value;
            }
        }

        Ok(Self {
            collocation_t: LuFactor::new(n, transposed)?,
            knots,
            degree,
            len: n,
        })
    }

    /// Weights of the sites' values in the spline value at `u`
    pub(crate) fn sample_weights(&self, u: f64) -> Vec<f64> {
        let mut b = vec![0.0; self.len];
        let (first, values) = nonzero_basis(&self.knots, self.degree, self.len, u);
        for (offset, value) in values.into_iter().enumerate() {
            b[first + offset] = value;
        }
        self.collocation_t.solve(&b)
    }
}

fn knot_vector(x: &[f64], degree: usize) -> Vec<f64> {
    let n = x.len();
    let (first, last) = (x[0], x[n - 1]);
    if degree == 0 {
        let mut knots = x.to_vec();
        knots.push(last);
        return knots;
    }

    let interior: Vec<f64> = if degree % 2 == 1 {
        let skip = (degree + 1) / 2;
        x[skip..n - skip].to_vec()
    } else {
        let skip = degree / 2;
        let mids: Vec<f64> = x.windows(2).map(|w| 0.5 * (w[0] + w[1])).collect();
        mids[skip..mids.len() - skip].to_vec()
    };

    let mut knots = Vec::with_capacity(n + degree + 1);
    knots.extend(std::iter::repeat(first).take(degree + 1));
    knots.extend(interior);
    knots.extend(std::iter::repeat(last).take(degree + 1));
    knots
}

/// Index `l` in `degree..len` of the knot span containing `u`, clamped to
/// the first and last spans for points outside.
fn knot_span(knots: &[f64], degree: usize, len: usize, u: f64) -> usize {
    let mut span = degree;
    while span + 1 < len && knots[span + 1] <= u {
        span += 1;
    }
    span
}

/// The `degree + 1` basis functions that can be non-zero at `u`, as the
/// index of the first one and their values (Cox-de Boor recursion).
fn nonzero_basis(knots: &[f64], degree: usize, len: usize, u: f64) -> (usize, Vec<f64>) {
    let span = knot_span(knots, degree, len, u);
    let mut values = vec![0.0; degree + 1];
    let mut left = vec![0.0; degree + 1];
    let mut right = vec![0.0; degree + 1];
    values[0] = 1.0;

    for j in 1..=degree {
        left[j] = u - knots[span + 1 - j];
        right[j] = knots[span + j] - u;
        let mut saved = 0.0;
        for r in 0..j {
            let denom = right[r + 1] + left[j - r];
            let temp = if denom == 0.0 { 0.0 } else { values[r] / denom };
            values[r] = saved + right[r + 1] * temp;
            saved = left[j - r] * temp;
        }
        values[j] = saved;
    }

    (span - degree, values)
}
