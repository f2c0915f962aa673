//! Interpolation method names and out-of-bounds policy

use super::kernel::{Kernel, LinearKernel, NearestKernel, SplineKernel};
use crate::errors::{Result, RuClimError};
use std::fmt;
use std::str::FromStr;

/// The closed set of supported interpolation methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InterpMethod {
    #[default]
    Linear,
    Nearest,
    /// Degree-0 spline (left step)
    Zero,
    /// Degree-1 spline
    Slinear,
    /// Degree-2 spline
    Quadratic,
    /// Degree-3 spline
    Cubic,
    /// Spline of the given degree
    Polynomial(usize),
}

impl InterpMethod {
    /// Resolves a method name, with `order` supplying the degree for
    /// `"polynomial"`.
    ///
    /// `"polynomial:N"` is accepted as well.
    ///
    /// # Errors
    ///
    /// - [`RuClimError::UnsupportedMethod`] for names outside the set
    /// - [`RuClimError::Interpolation`] for `"polynomial"` without an order
    pub fn parse(name: &str, order: Option<usize>) -> Result<Self> {
        let lowered = name.trim().to_ascii_lowercase();
        let (base, inline_order) = match lowered.split_once(':') {
            Some((base, n)) => {
                let n = n.parse::<usize>().map_err(|_| RuClimError::UnsupportedMethod {
                    method: name.to_string(),
                })?;
                (base, Some(n))
            }
            None => (lowered.as_str(), None),
        };

        let method = match base {
            "linear" => Self::Linear,
            "nearest" => Self::Nearest,
            "zero" => Self::Zero,
            "slinear" => Self::Slinear,
            "quadratic" => Self::Quadratic,
            "cubic" => Self::Cubic,
            "polynomial" => {
                let order = inline_order.or(order).ok_or_else(|| {
                    RuClimError::Interpolation("order is required when method=polynomial".to_string())
                })?;
                return Ok(Self::Polynomial(order));
            }
            _ => {
                return Err(RuClimError::UnsupportedMethod {
                    method: name.to_string(),
                })
            }
        };
        if inline_order.is_some() {
            return Err(RuClimError::UnsupportedMethod {
                method: name.to_string(),
            });
        }
        Ok(method)
    }

    /// Kernel implementing this method
    #[must_use]
    pub fn kernel(self) -> Box<dyn Kernel> {
        match self {
            Self::Linear => Box::new(LinearKernel),
            Self::Nearest => Box::new(NearestKernel),
            Self::Zero => Box::new(SplineKernel::new(0)),
            Self::Slinear => Box::new(SplineKernel::new(1)),
            Self::Quadratic => Box::new(SplineKernel::new(2)),
            Self::Cubic => Box::new(SplineKernel::new(3)),
            Self::Polynomial(order) => Box::new(SplineKernel::new(order)),
        }
    }
}

impl fmt::Display for InterpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => f.write_str("linear"),
            Self::Nearest => f.write_str("nearest"),
            Self::Zero => f.write_str("zero"),
            Self::Slinear => f.write_str("slinear"),
            Self::Quadratic => f.write_str("quadratic"),
            Self::Cubic => f.write_str("cubic"),
            Self::Polynomial(order) => write!(f, "polynomial:{order}"),
        }
    }
}

impl FromStr for InterpMethod {
    type Err = RuClimError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s, None)
    }
}

/// What happens to targets outside the source coordinate range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutOfBounds {
    /// Fill with NaN
    #[default]
    Nan,
    /// Extend the kernel past the edges
    Extrapolate,
}
