//! Centralized error handling for RuClim
//!
//! Every fallible operation in the crate returns [`RuClimError`]. Nothing is
//! caught or retried internally: failures surface to the caller as-is.

use std::fmt;

/// Main error type for RuClim operations
#[derive(Debug)]
pub enum RuClimError {
    /// The grouping key cannot be derived from the time axis
    InvalidPeriod { period: String },

    /// Post-normalization weight sum of a period group is not 1.0
    InvariantViolation { group: String, sum: f64 },

    /// Interpolation method outside the supported set
    UnsupportedMethod { method: String },

    /// Required named axis or coordinate absent from an input
    MissingCoordinate { array: String, coord: String },

    /// Interpolation could not be set up for the given coordinates
    Interpolation(String),

    /// CF time units, calendar name or date could not be handled
    InvalidTime { reason: String },

    /// Inconsistent labeled array construction
    InvalidArray { message: String },

    /// Variable not found in NetCDF file
    VariableNotFound { var: String },

    /// NetCDF file operation errors
    NetCDFError(netcdf::Error),

    /// I/O operation errors
    IoError(std::io::Error),

    /// Array shape or dimension error
    ArrayError(ndarray::ShapeError),

    /// Thread pool configuration error
    ThreadPoolError(String),

    /// Generic error
    Generic(String),
}

impl fmt::Display for RuClimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuClimError::InvalidPeriod { period } => write!(
                f,
                "Invalid period '{period}': expected one of month, season, quarter, year"
            ),
            RuClimError::InvariantViolation { group, sum } => write!(
                f,
                "Weights of period group '{group}' sum to {sum}, expected 1.0"
            ),
            RuClimError::UnsupportedMethod { method } => write!(
                f,
                "Unsupported interpolation method '{method}': expected one of linear, nearest, zero, slinear, quadratic, cubic, polynomial"
            ),
            RuClimError::MissingCoordinate { array, coord } => {
                write!(f, "Coordinate '{coord}' not found in array '{array}'")
            }
            RuClimError::Interpolation(msg) => write!(f, "Interpolation error: {msg}"),
            RuClimError::InvalidTime { reason } => write!(f, "Invalid time coordinate: {reason}"),
            RuClimError::InvalidArray { message } => write!(f, "Invalid labeled array: {message}"),
            RuClimError::VariableNotFound { var } => write!(f, "Variable '{var}' not found in file"),
            RuClimError::NetCDFError(e) => write!(f, "NetCDF error: {e}"),
            RuClimError::IoError(e) => write!(f, "I/O error: {e}"),
            RuClimError::ArrayError(e) => write!(f, "Array error: {e}"),
            RuClimError::ThreadPoolError(msg) => write!(f, "Thread pool error: {msg}"),
            RuClimError::Generic(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for RuClimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RuClimError::NetCDFError(e) => Some(e),
            RuClimError::IoError(e) => Some(e),
            RuClimError::ArrayError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<netcdf::Error> for RuClimError {
    fn from(error: netcdf::Error) -> Self {
        RuClimError::NetCDFError(error)
    }
}

impl From<std::io::Error> for RuClimError {
    fn from(error: std::io::Error) -> Self {
        RuClimError::IoError(error)
    }
}

impl From<ndarray::ShapeError> for RuClimError {
    fn from(error: ndarray::ShapeError) -> Self {
        RuClimError::ArrayError(error)
    }
}

impl From<String> for RuClimError {
    fn from(error: String) -> Self {
        RuClimError::Generic(error)
    }
}

impl From<&str> for RuClimError {
    fn from(error: &str) -> Self {
        RuClimError::Generic(error.to_string())
    }
}

/// Result type alias for RuClim operations
pub type Result<T> = std::result::Result<T, RuClimError>;
