//! Matching the lat/lon grid of one array to the rotated grid of another
//!
//! [`match_coord`] resamples a `lat`/`lon` array onto the `rlat`/`rlon`
//! coordinate values of a reference array with two independent 1-D passes,
//! latitude first. The axes keep their `lat`/`lon` names.

use crate::errors::Result;
use crate::interpolation::{interpolate_axis, InterpMethod, OutOfBounds};
use crate::labeled_array::LabeledArray;

pub const SOURCE_LAT: &str = "lat";
pub const SOURCE_LON: &str = "lon";
pub const REFERENCE_LAT: &str = "rlat";
pub const REFERENCE_LON: &str = "rlon";

/// Options of [`match_coord_with`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatchOptions {
    pub method: InterpMethod,
    pub out_of_bounds: OutOfBounds,
}

impl MatchOptions {
    #[must_use]
    pub fn new(method: InterpMethod) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_out_of_bounds(mut self, out_of_bounds: OutOfBounds) -> Self {
        self.out_of_bounds = out_of_bounds;
        self
    }
}

/// Resamples `source` onto the `rlat`/`rlon` grid of `reference` using the
/// interpolation `method` named by string.
///
/// Targets outside the source grid are NaN.
///
/// # Errors
///
/// - [`crate::RuClimError::UnsupportedMethod`] if `method` is not supported
/// - [`crate::RuClimError::MissingCoordinate`] if `source` lacks `lat`/`lon`
///   or `reference` lacks `rlat`/`rlon`
pub fn match_coord(source: &LabeledArray, reference: &LabeledArray, method: &str) -> Result<LabeledArray> {
    let method: InterpMethod = method.parse()?;
    match_coord_with(source, reference, &MatchOptions::new(method))
}

/// Typed form of [`match_coord`].
///
/// # Errors
///
/// Same as [`match_coord`], plus [`crate::RuClimError::Interpolation`] if the
/// source grid cannot be interpolated with the chosen method.
pub fn match_coord_with(
    source: &LabeledArray,
    reference: &LabeledArray,
    options: &MatchOptions,
) -> Result<LabeledArray> {
    // Validate every coordinate before doing any work
    source.numeric_coord(SOURCE_LAT)?;
    source.numeric_coord(SOURCE_LON)?;
    reference.numeric_coord(REFERENCE_LAT)?;
    reference.numeric_coord(REFERENCE_LON)?;

    let target_lat = reference
        .coord(REFERENCE_LAT)
        .cloned()
        .ok_or_else(|| missing(reference, REFERENCE_LAT))?;
    let target_lon = reference
        .coord(REFERENCE_LON)
        .cloned()
        .ok_or_else(|| missing(reference, REFERENCE_LON))?;

    let kernel = options.method.kernel();
    let by_lat = interpolate_axis(source, SOURCE_LAT, &target_lat, kernel.as_ref(), options.out_of_bounds)?;
    interpolate_axis(&by_lat, SOURCE_LON, &target_lon, kernel.as_ref(), options.out_of_bounds)
}

fn missing(array: &LabeledArray, coord: &str) -> crate::RuClimError {
    crate::RuClimError::MissingCoordinate {
        array: array.name().to_string(),
        coord: coord.to_string(),
    }
}
