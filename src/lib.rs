//! RuClim: climatologies and grid matching for labeled climate arrays
//!
//! A Rust library of helpers for climate-science analysis of gridded model
//! output, built around an explicit labeled-array type (named axes plus
//! coordinates and attributes) and NetCDF I/O.
//!
//! ## Key Features
//!
//! - **Day-weighted climatologies**: monthly, seasonal, quarterly and yearly
//!   means in which each time step counts by the days in its month, for every
//!   CF calendar
//! - **Annual climatology**: the mean of the monthly climatology
//! - **Coordinate matching**: resampling a `lat`/`lon` field onto the
//!   `rlat`/`rlon` grid of a reference field with linear, nearest or spline
//!   interpolation
//! - **Parallel Processing**: axis reductions and resampling run on Rayon
//!
//! ## Module Organization
//!
//! - [`labeled_array`]: the labeled array, its coordinates and time axis
//! - [`calendar`]: CF calendars, calendar dates and `"<unit> since <date>"` units
//! - [`climatology`]: day-weighted period means
//! - [`interpolation`]: 1-D interpolation kernels along named axes
//! - [`matching`]: lat/lon to rlat/rlon grid matching
//! - [`axis_weights`]: sparse linear maps along one axis
//! - [`statistics`]: NaN-skipping axis reductions and group-by
//! - [`netcdf_io`]: reading and writing labeled arrays as NetCDF
//! - [`metadata`]: file listings and array summaries
//! - [`parallel`]: thread pool configuration
//! - [`errors`]: centralized error handling
//!
//! ## Usage
//!
//! ```rust,no_run
//! use ru_clim::prelude::*;
//! use std::path::Path;
//!
//! let tas = open_labeled_array(Path::new("tas.nc"), "tas").unwrap();
//! let seasonal = climatology_mean(&tas, "season").unwrap();
//!
//! let reference = open_labeled_array(Path::new("rotated.nc"), "pr").unwrap();
//! let matched = match_coord(&tas, &reference, "cubic").unwrap();
//! write_labeled_array(&matched, Path::new("matched.nc")).unwrap();
//! ```

pub mod axis_weights;
pub mod calendar;
pub mod climatology;
pub mod errors;
pub mod interpolation;
pub mod labeled_array;
pub mod matching;
pub mod metadata;
pub mod netcdf_io;
pub mod parallel;
pub mod statistics;

pub use climatology::{annual_climatology, climatology_mean};
pub use errors::{Result, RuClimError};
pub use labeled_array::LabeledArray;
pub use matching::match_coord;

pub mod prelude {
    //! Commonly used imports for convenience
    pub use crate::calendar::{Calendar, CalendarDate, CfTimeUnits};
    pub use crate::climatology::{annual_climatology, climatology_mean, climatology_mean_by, Period};
    pub use crate::errors::{Result, RuClimError};
    pub use crate::interpolation::{InterpMethod, OutOfBounds};
    pub use crate::labeled_array::{Attributes, Coordinate, LabeledArray, TimeAxis};
    pub use crate::matching::{match_coord, match_coord_with, MatchOptions};
    pub use crate::netcdf_io::{open_labeled_array, read_labeled_array, write_labeled_array};
    pub use crate::parallel::ParallelConfig;
    pub use crate::statistics::{StatOperation, StatisticalReduction};
}
