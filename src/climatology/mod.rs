//! Day-weighted climatological means
//!
//! [`climatology_mean`] collapses the `time` axis of an array into a
//! period-of-year axis (month, season, ...). Within each period group every
//! time step is weighted by the number of days in its month, so a 29-day
//! February counts for less than a 31-day January when both fall in DJF.
//! [`annual_climatology`] goes one step further and averages the monthly
//! climatology into a single annual mean.
//!
//! # Example
//!
//! ```rust,no_run
//! use ru_clim::calendar::Calendar;
//! use ru_clim::climatology::{annual_climatology, climatology_mean};
//! use ru_clim::labeled_array::{Coordinate, LabeledArray, TimeAxis};
//! use ndarray::{ArrayD, IxDyn};
//!
//! let time = TimeAxis::monthly(Calendar::Standard, 2000, 1, 24).unwrap();
//! let data = ArrayD::from_shape_vec(IxDyn(&[24]), (1..=24).map(f64::from).collect()).unwrap();
//! let series = LabeledArray::new("tas", data, vec!["time".into()])
//!     .unwrap()
//!     .with_coord("time", Coordinate::time(time))
//!     .unwrap();
//!
//! let monthly = climatology_mean(&series, "month").unwrap();
//! assert_eq!(monthly.shape(), &[12]);
//! let annual = annual_climatology(&series).unwrap();
//! assert_eq!(annual.shape(), &[] as &[usize]);
//! ```

pub mod period;
pub mod weights;

pub use period::{Period, PeriodKey};
pub use weights::{climatology_weights, verify_weights, PeriodGroup, WEIGHT_SUM_TOLERANCE};

use crate::axis_weights::NanPolicy;
use crate::errors::Result;
use crate::labeled_array::{LabeledArray, TIME_DIM};
use crate::statistics::{reduce_dimension, StatOperation};

/// Day-weighted mean of `array` per `period` ("month", "season", "quarter",
/// "year", optionally prefixed with "time.").
///
/// # Errors
///
/// - [`crate::RuClimError::InvalidPeriod`] if `period` is not recognised
/// - [`crate::RuClimError::MissingCoordinate`] if there is no dated `time` axis
/// - [`crate::RuClimError::InvariantViolation`] if weight normalization fails
pub fn climatology_mean(array: &LabeledArray, period: &str) -> Result<LabeledArray> {
    climatology_mean_by(array, period.parse()?)
}

/// Typed form of [`climatology_mean`].
///
/// The `time` axis is replaced, in place, by an axis named after the period
/// holding one weighted sum per group. Name, attributes and other
/// coordinates are kept. NaN values contribute nothing to a group's sum.
///
/// # Errors
///
/// Same as [`climatology_mean`], minus the period parsing.
pub fn climatology_mean_by(array: &LabeledArray, period: Period) -> Result<LabeledArray> {
    let time = array.time_axis()?;
    let axis = array.axis_index(TIME_DIM)?;

    let groups = climatology_weights(time, period)?;
    tracing::debug!(
        array = array.name(),
        period = period.as_str(),
        steps = time.len(),
        groups = groups.len(),
        "computing day-weighted climatology"
    );

    let weights = weights::group_axis_weights(&groups, time.len())?;
    let data = weights.apply(array.data(), axis, NanPolicy::Skip)?;

    let keys: Vec<PeriodKey> = groups.iter().map(|g| g.key).collect();
    array.replace_axis(axis, period.as_str(), data, Some(period.coordinate(&keys)))
}

/// Annual climatological mean: the unweighted mean of the monthly
/// climatology.
///
/// Months missing from the input are simply absent from the mean.
///
/// # Errors
///
/// Same as [`climatology_mean`].
pub fn annual_climatology(array: &LabeledArray) -> Result<LabeledArray> {
    let monthly = climatology_mean_by(array, Period::Month)?;
    let months = monthly.shape()[monthly.axis_index(Period::Month.as_str())?];
    if months != 12 {
        tracing::warn!(
            array = array.name(),
            months,
            "annual climatology over an incomplete annual cycle"
        );
    }
    let annual = reduce_dimension(&monthly, Period::Month.as_str(), StatOperation::Mean)?;
    Ok(annual.with_attrs(array.attrs().clone()))
}
