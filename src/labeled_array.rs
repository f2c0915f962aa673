//! Labeled N-dimensional arrays
//!
//! A [`LabeledArray`] is an `ndarray::ArrayD<f64>` whose axes carry names,
//! optional coordinate values and a free-form attribute map. It is the unit
//! every operation in this crate consumes and produces.

use crate::calendar::{Calendar, CalendarDate, CfTimeUnits};
use crate::errors::{Result, RuClimError};
use ndarray::{ArrayD, Axis};
use serde_json::Value as JsonValue;
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Descriptive metadata attached to arrays and coordinates
pub type Attributes = BTreeMap<String, JsonValue>;

/// Name of the axis the climatology operations group over
pub const TIME_DIM: &str = "time";

/// Dates of a time axis together with the calendar they live in
#[derive(Debug, Clone, PartialEq)]
pub struct TimeAxis {
    dates: Vec<CalendarDate>,
    calendar: Calendar,
    units: Option<CfTimeUnits>,
}

impl TimeAxis {
    #[must_use]
    pub fn new(dates: Vec<CalendarDate>, calendar: Calendar) -> Self {
        Self {
            dates,
            calendar,
            units: None,
        }
    }

    /// Consecutive month starts, beginning at `year`-`month`-01.
    ///
    /// # Errors
    ///
    /// Returns [`RuClimError::InvalidTime`] if `month` is outside 1..=12.
    pub fn monthly(calendar: Calendar, year: i32, month: u32, count: usize) -> Result<Self> {
        let first = CalendarDate::new(calendar, year, month, 1)?;
        let mut dates = Vec::with_capacity(count);
        let (mut y, mut m) = (first.year(), first.month());
        for _ in 0..count {
            dates.push(CalendarDate::new(calendar, y, m, 1)?);
            if m == 12 {
                y += 1;
                m = 1;
            } else {
                m += 1;
            }
        }
        Ok(Self::new(dates, calendar))
    }

    /// Attaches the CF units the dates were decoded from
    #[must_use]
    pub fn with_units(mut self, units: CfTimeUnits) -> Self {
        self.units = Some(units);
        self
    }

    #[must_use]
    pub fn dates(&self) -> &[CalendarDate] {
        &self.dates
    }

    #[must_use]
    pub const fn calendar(&self) -> Calendar {
        self.calendar
    }

    #[must_use]
    pub const fn units(&self) -> Option<&CfTimeUnits> {
        self.units.as_ref()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Length in days of the month each time step falls in
    #[must_use]
    pub fn days_in_month(&self) -> Vec<f64> {
        self.dates
            .iter()
            .map(|d| f64::from(self.calendar.days_in_month(d.year(), d.month())))
            .collect()
    }

    fn select(&self, indices: &[usize]) -> Self {
        Self {
            dates: indices.iter().map(|&i| self.dates[i]).collect(),
            calendar: self.calendar,
            units: self.units.clone(),
        }
    }
}

/// Values labelling the positions along one axis
#[derive(Debug, Clone, PartialEq)]
pub enum CoordValues {
    Numeric(Vec<f64>),
    Time(TimeAxis),
    Labels(Vec<String>),
}

impl CoordValues {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Numeric(v) => v.len(),
            Self::Time(t) => t.len(),
            Self::Labels(l) => l.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn as_numeric(&self) -> Option<&[f64]> {
        match self {
            Self::Numeric(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_time(&self) -> Option<&TimeAxis> {
        match self {
            Self::Time(t) => Some(t),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_labels(&self) -> Option<&[String]> {
        match self {
            Self::Labels(l) => Some(l),
            _ => None,
        }
    }

    /// Values at `indices`, in that order
    #[must_use]
    pub fn select(&self, indices: &[usize]) -> Self {
        match self {
            Self::Numeric(v) => Self::Numeric(indices.iter().map(|&i| v[i]).collect()),
            Self::Time(t) => Self::Time(t.select(indices)),
            Self::Labels(l) => Self::Labels(indices.iter().map(|&i| l[i].clone()).collect()),
        }
    }

    fn describe(&self) -> String {
        let n = self.len();
        match self {
            _ if n == 0 => "(empty)".to_string(),
            Self::Numeric(v) => format!("{} .. {}", v[0], v[n - 1]),
            Self::Time(t) => format!("{} .. {} [{}]", t.dates[0], t.dates[n - 1], t.calendar),
            Self::Labels(l) => l.join(" "),
        }
    }
}

/// A coordinate: values along one axis plus their own attributes
#[derive(Debug, Clone, PartialEq)]
pub struct Coordinate {
    pub values: CoordValues,
    pub attrs: Attributes,
}

impl Coordinate {
    #[must_use]
    pub fn numeric(values: Vec<f64>) -> Self {
        Self {
            values: CoordValues::Numeric(values),
            attrs: Attributes::new(),
        }
    }

    #[must_use]
    pub fn time(axis: TimeAxis) -> Self {
        Self {
            values: CoordValues::Time(axis),
            attrs: Attributes::new(),
        }
    }

    #[must_use]
    pub fn labels(labels: Vec<String>) -> Self {
        Self {
            values: CoordValues::Labels(labels),
            attrs: Attributes::new(),
        }
    }

    #[must_use]
    pub fn with_attrs(mut self, attrs: Attributes) -> Self {
        self.attrs = attrs;
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// N-dimensional array with named axes, coordinates and attributes
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledArray {
    name: String,
    data: ArrayD<f64>,
    dims: Vec<String>,
    coords: BTreeMap<String, Coordinate>,
    attrs: Attributes,
}

impl LabeledArray {
    /// Creates an array without coordinates or attributes.
    ///
    /// # Errors
    ///
    /// Returns [`RuClimError::InvalidArray`] if the number of dimension names
    /// does not match the array rank or a name is repeated.
    pub fn new(name: impl Into<String>, data: ArrayD<f64>, dims: Vec<String>) -> Result<Self> {
        let name = name.into();
        if dims.len() != data.ndim() {
            return Err(RuClimError::InvalidArray {
                message: format!(
                    "'{name}' has {} dimension names for an array of rank {}",
                    dims.len(),
                    data.ndim()
                ),
            });
        }
        let mut seen = HashSet::new();
        if let Some(dup) = dims.iter().find(|d| !seen.insert(d.as_str())) {
            return Err(RuClimError::InvalidArray {
                message: format!("'{name}' repeats dimension '{dup}'"),
            });
        }
        Ok(Self {
            name,
            data,
            dims,
            coords: BTreeMap::new(),
            attrs: Attributes::new(),
        })
    }

    /// Attaches a coordinate to dimension `dim`.
    ///
    /// # Errors
    ///
    /// Returns [`RuClimError::MissingCoordinate`] if `dim` is not an axis of
    /// the array, and [`RuClimError::InvalidArray`] on a length mismatch.
    pub fn with_coord(mut self, dim: &str, coord: Coordinate) -> Result<Self> {
        self.set_coord(dim, coord)?;
        Ok(self)
    }

    /// Replaces the attribute map
    #[must_use]
    pub fn with_attrs(mut self, attrs: Attributes) -> Self {
        self.attrs = attrs;
        self
    }

    /// See [`LabeledArray::with_coord`].
    ///
    /// # Errors
    ///
    /// Same as [`LabeledArray::with_coord`].
    pub fn set_coord(&mut self, dim: &str, coord: Coordinate) -> Result<()> {
        let axis = self.axis_index(dim)?;
        let len = self.data.len_of(Axis(axis));
        if coord.len() != len {
            return Err(RuClimError::InvalidArray {
                message: format!(
                    "coordinate '{dim}' has {} values but the axis has length {len}",
                    coord.len()
                ),
            });
        }
        self.coords.insert(dim.to_string(), coord);
        Ok(())
    }

    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<JsonValue>) {
        self.attrs.insert(key.into(), value.into());
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn data(&self) -> &ArrayD<f64> {
        &self.data
    }

    #[must_use]
    pub fn dims(&self) -> &[String] {
        &self.dims
    }

    #[must_use]
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    #[must_use]
    pub const fn attrs(&self) -> &Attributes {
        &self.attrs
    }

    #[must_use]
    pub const fn coords(&self) -> &BTreeMap<String, Coordinate> {
        &self.coords
    }

    #[must_use]
    pub fn coord(&self, dim: &str) -> Option<&Coordinate> {
        self.coords.get(dim)
    }

    #[must_use]
    pub fn has_dim(&self, dim: &str) -> bool {
        self.dims.iter().any(|d| d == dim)
    }

    /// Position of the axis named `dim`.
    ///
    /// # Errors
    ///
    /// Returns [`RuClimError::MissingCoordinate`] if there is no such axis.
    pub fn axis_index(&self, dim: &str) -> Result<usize> {
        self.dims
            .iter()
            .position(|d| d == dim)
            .ok_or_else(|| self.missing(dim))
    }

    /// Numeric coordinate values of axis `dim`.
    ///
    /// # Errors
    ///
    /// Returns [`RuClimError::MissingCoordinate`] if the axis has no numeric
    /// coordinate.
    pub fn numeric_coord(&self, dim: &str) -> Result<&[f64]> {
        self.coords
            .get(dim)
            .and_then(|c| c.values.as_numeric())
            .ok_or_else(|| self.missing(dim))
    }

    /// The time coordinate of the `time` axis.
    ///
    /// # Errors
    ///
    /// Returns [`RuClimError::MissingCoordinate`] if there is no `time` axis
    /// or it does not carry dates.
    pub fn time_axis(&self) -> Result<&TimeAxis> {
        self.axis_index(TIME_DIM)?;
        self.coords
            .get(TIME_DIM)
            .and_then(|c| c.values.as_time())
            .ok_or_else(|| self.missing(TIME_DIM))
    }

    /// Days in month of each time step, for weighting.
    ///
    /// # Errors
    ///
    /// Same as [`LabeledArray::time_axis`].
    pub fn days_in_month(&self) -> Result<Vec<f64>> {
        Ok(self.time_axis()?.days_in_month())
    }

    /// New array where axis `axis` is swapped for `new_dim` with `data`.
    ///
    /// Name, attributes and all other coordinates are carried over.
    pub(crate) fn replace_axis(
        &self,
        axis: usize,
        new_dim: &str,
        data: ArrayD<f64>,
        coord: Option<Coordinate>,
    ) -> Result<Self> {
        let old_dim = &self.dims[axis];
        let mut dims = self.dims.clone();
        dims[axis] = new_dim.to_string();

        let mut result = Self::new(self.name.clone(), data, dims)?;
        for (dim, c) in &self.coords {
            if dim != old_dim && dim != new_dim {
                result.set_coord(dim, c.clone())?;
            }
        }
        if let Some(c) = coord {
            result.set_coord(new_dim, c)?;
        }
        result.attrs = self.attrs.clone();
        Ok(result)
    }

    /// New array with axis `axis` reduced away.
    pub(crate) fn remove_axis(&self, axis: usize, data: ArrayD<f64>) -> Result<Self> {
        let old_dim = &self.dims[axis];
        let mut dims = self.dims.clone();
        dims.remove(axis);

        let mut result = Self::new(self.name.clone(), data, dims)?;
        for (dim, c) in &self.coords {
            if dim != old_dim {
                result.set_coord(dim, c.clone())?;
            }
        }
        result.attrs = self.attrs.clone();
        Ok(result)
    }

    fn missing(&self, dim: &str) -> RuClimError {
        RuClimError::MissingCoordinate {
            array: self.name.clone(),
            coord: dim.to_string(),
        }
    }
}

impl fmt::Display for LabeledArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sizes: Vec<String> = self
            .dims
            .iter()
            .zip(self.data.shape())
            .map(|(d, n)| format!("{d}: {n}"))
            .collect();
        writeln!(f, "<LabeledArray '{}' ({})>", self.name, sizes.join(", "))?;

        if !self.coords.is_empty() {
            writeln!(f, "Coordinates:")?;
            for dim in &self.dims {
                if let Some(c) = self.coords.get(dim) {
                    writeln!(f, "  * {dim:<8} ({}) {}", c.len(), c.values.describe())?;
                }
            }
        }
        if !self.attrs.is_empty() {
            writeln!(f, "Attributes:")?;
            for (key, value) in &self.attrs {
                writeln!(f, "    {key}: {value}")?;
            }
        }
        Ok(())
    }
}
