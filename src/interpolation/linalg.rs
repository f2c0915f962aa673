//! Dense LU factorization for the spline collocation systems.

use crate::errors::{Result, RuClimError};

/// LU factors of a square matrix with partial pivoting, row-major.
#[derive(Debug, Clone)]
pub(crate) struct LuFactor {
    n: usize,
    lu: Vec<f64>,
    pivots: Vec<usize>,
}

impl LuFactor {
    /// Factors the `n x n` row-major matrix `a`.
    pub(crate) fn new(n: usize, mut a: Vec<f64>) -> Result<Self> {
        debug_assert_eq!(a.len(), n * n);
        let mut pivots: Vec<usize> = (0..n).collect();

        for col in 0..n {
            let (pivot_row, pivot_abs) = (col..n)
                .map(|r| (r, a[r * n + col].abs()))
                .fold((col, -1.0), |best, cur| if cur.1 > best.1 { cur } else { best });
            if pivot_abs <= f64::EPSILON * 1e-3 {
                return Err(RuClimError::Interpolation(
                    "spline collocation matrix is singular".to_string(),
                ));
            }
            if pivot_row != col {
                for c in 0..n {
                    a.swap(col * n + c, pivot_row * n + c);
                }
                pivots.swap(col, pivot_row);
            }

            let diag = a[col * n + col];
            for r in col + 1..n {
                let factor = a[r * n + col] / diag;
                a[r * n + col] = factor;
                if factor != 0.0 {
                    for c in col + 1..n {
                        a[r * n + c] -= factor * a[col * n + c];
                    }
                }
            }
        }

        Ok(Self { n, lu: a, pivots })
    }

    /// Solves `A x = b`.
    pub(crate) fn solve(&self, b: &[f64]) -> Vec<f64> {
        let n = self.n;
        let mut x: Vec<f64> = self.pivots.iter().map(|&p| b[p]).collect();

        // forward substitution, unit lower triangle
        for r in 0..n {
            let mut sum = x[r];
            for c in 0..r {
                sum -= self.lu[r * n + c] * x[c];
            }
            x[r] = sum;
        }
        // back substitution
        for r in (0..n).rev() {
            let mut sum = x[r];
            for c in r + 1..n {
                sum -= self.lu[r * n + c] * x[c];
            }
            x[r] = sum / self.lu[r * n + r];
        }
        x
    }
}
