//! NetCDF I/O for labeled arrays
//!
//! Reading decodes a variable the way CF-aware tools do: `_FillValue` and
//! `missing_value` become NaN, `scale_factor`/`add_offset` are applied, and
//! coordinate variables (1-D variables named after their dimension) become
//! coordinates, with `"<unit> since <date>"` coordinates decoded to dates.
//! Writing creates a fresh file holding one labeled array, its coordinates
//! and its attributes.

use crate::calendar::{Calendar, CfTimeUnits};
use crate::errors::{Result, RuClimError};
use crate::labeled_array::{Attributes, CoordValues, Coordinate, LabeledArray, TimeAxis};
use chrono::Utc;
use ndarray::{ArrayD, IxDyn};
use netcdf::{AttributeValue, File, Variable};
use serde_json::Value as JsonValue;
use std::{fs, path::Path};

/// Attributes consumed while decoding and therefore not kept
const ENCODING_ATTRIBUTES: [&str; 4] = ["_FillValue", "missing_value", "scale_factor", "add_offset"];

/// Opens `path` and reads variable `var_name` into a labeled array
///
/// # Errors
///
/// Returns an error if the file cannot be opened or the variable decoded.
pub fn open_labeled_array(path: &Path, var_name: &str) -> Result<LabeledArray> {
    let file = netcdf::open(path)?;
    println!("📂 Opened NetCDF file: {}", path.display());
    read_labeled_array(&file, var_name)
}

/// Reads variable `var_name` of `file` into a labeled array
///
/// # Errors
///
/// - [`RuClimError::VariableNotFound`] if there is no such variable
/// - [`RuClimError::InvalidTime`] if a time coordinate cannot be decoded
pub fn read_labeled_array(file: &File, var_name: &str) -> Result<LabeledArray> {
    let var = file
        .variable(var_name)
        .ok_or_else(|| RuClimError::VariableNotFound {
            var: var_name.to_string(),
        })?;

    let dim_names: Vec<String> = var.dimensions().iter().map(|d| d.name().to_string()).collect();
    let shape: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();

    println!("🚀 Loading '{var_name}' with shape: {shape:?}");
    let values = decode_values(&var)?;
    let data = ArrayD::from_shape_vec(IxDyn(&shape), values)?;

    let mut array = LabeledArray::new(var_name, data, dim_names.clone())?.with_attrs(read_attributes(&var, &ENCODING_ATTRIBUTES)?);

    for dim in &dim_names {
        let Some(coord_var) = file.variable(dim) else {
            continue;
        };
        let is_coordinate = coord_var.dimensions().len() == 1 && coord_var.dimensions()[0].name() == *dim;
        if is_coordinate && dim != var_name {
            array.set_coord(dim, read_coordinate(&coord_var)?)?;
        }
    }

    Ok(array)
}

fn read_coordinate(var: &Variable) -> Result<Coordinate> {
    let values = decode_values(var)?;

    match attribute_string(var, "units") {
        Some(units) if units.contains(" since ") => {
            let calendar: Calendar = attribute_string(var, "calendar")
                .map(|c| c.parse())
                .transpose()?
                .unwrap_or_default();
            let units = CfTimeUnits::parse(&units, calendar)?;
            let dates = units.decode(&values, calendar)?;
            let attrs = read_attributes(var, &["units", "calendar", "_FillValue", "scale_factor", "add_offset", "missing_value"])?;
            Ok(Coordinate::time(TimeAxis::new(dates, calendar).with_units(units)).with_attrs(attrs))
        }
        _ => match attribute_string(var, "flag_meanings") {
            Some(meanings) => {
                let labels = flag_labels(&values, &meanings)?;
                let attrs = read_attributes(var, &["flag_values", "flag_meanings", "_FillValue", "scale_factor", "add_offset", "missing_value"])?;
                Ok(Coordinate::labels(labels).with_attrs(attrs))
            }
            None => Ok(Coordinate::numeric(values).with_attrs(read_attributes(var, &ENCODING_ATTRIBUTES)?)),
        },
    }
}

/// Maps flag indices back to their meanings
fn flag_labels(values: &[f64], meanings: &str) -> Result<Vec<String>> {
    let meanings: Vec<&str> = meanings.split_whitespace().collect();
    values
        .iter()
        .map(|&v| {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let index = v as usize;
            if v.is_finite() && v >= 0.0 && index < meanings.len() {
                Ok(meanings[index].to_string())
            } else {
                Err(RuClimError::InvalidArray {
                    message: format!("flag value {v} has no meaning in '{}'", meanings.join(" ")),
                })
            }
        })
        .collect()
}

/// Reads a variable as `f64`, applying CF masking and scaling
fn decode_values(var: &Variable) -> Result<Vec<f64>> {
    let mut values = var.get_values::<f64, _>(..)?;

    let fill = attribute_f64(var, "_FillValue");
    let missing = attribute_f64(var, "missing_value");
    let scale = attribute_f64(var, "scale_factor").unwrap_or(1.0);
    let offset = attribute_f64(var, "add_offset").unwrap_or(0.0);

    for v in &mut values {
        if Some(*v) == fill || Some(*v) == missing {
            *v = f64::NAN;
        } else {
            *v = *v * scale + offset;
        }
    }
    Ok(values)
}

fn read_attributes(var: &Variable, skip: &[&str]) -> Result<Attributes> {
    let mut attrs = Attributes::new();
    for attr in var.attributes() {
        if skip.contains(&attr.name()) {
            continue;
        }
        match attribute_to_json(&attr.value()?) {
            Some(value) => {
                attrs.insert(attr.name().to_string(), value);
            }
            None => {
                tracing::warn!(attribute = attr.name(), "skipped unsupported attribute type");
            }
        }
    }
    Ok(attrs)
}

fn attribute_string(var: &Variable, name: &str) -> Option<String> {
    match var.attribute_value(name)?.ok()? {
        AttributeValue::Str(s) => Some(s),
        _ => None,
    }
}

fn attribute_f64(var: &Variable, name: &str) -> Option<f64> {
    attribute_to_json(&var.attribute_value(name)?.ok()?).and_then(|v| match v {
        JsonValue::Array(items) => items.first().and_then(JsonValue::as_f64),
        other => other.as_f64(),
    })
}

fn attribute_to_json(value: &AttributeValue) -> Option<JsonValue> {
    let value = match value {
        AttributeValue::Str(s) => JsonValue::from(s.clone()),
        AttributeValue::Strs(v) => JsonValue::from(v.clone()),
        AttributeValue::Double(v) => JsonValue::from(*v),
        AttributeValue::Doubles(v) => JsonValue::from(v.clone()),
        AttributeValue::Float(v) => JsonValue::from(f64::from(*v)),
        AttributeValue::Floats(v) => v.iter().map(|&x| f64::from(x)).collect(),
        AttributeValue::Int(v) => JsonValue::from(*v),
        AttributeValue::Ints(v) => JsonValue::from(v.clone()),
        AttributeValue::Short(v) => JsonValue::from(*v),
        AttributeValue::Shorts(v) => JsonValue::from(v.clone()),
        AttributeValue::Longlong(v) => JsonValue::from(*v),
        AttributeValue::Longlongs(v) => JsonValue::from(v.clone()),
        AttributeValue::Schar(v) => JsonValue::from(*v),
        AttributeValue::Uchar(v) => JsonValue::from(*v),
        AttributeValue::Ushort(v) => JsonValue::from(*v),
        AttributeValue::Uint(v) => JsonValue::from(*v),
        AttributeValue::Ulonglong(v) => JsonValue::from(*v),
        _ => return None,
    };
    Some(value)
}

fn json_to_attribute(value: &JsonValue) -> Option<AttributeValue> {
    match value {
        JsonValue::String(s) => Some(AttributeValue::Str(s.clone())),
        JsonValue::Bool(b) => Some(AttributeValue::Int(i32::from(*b))),
        JsonValue::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => Some(i32::try_from(i).map_or(AttributeValue::Longlong(i), AttributeValue::Int)),
            (None, Some(f)) => Some(AttributeValue::Double(f)),
            _ => None,
        },
        JsonValue::Array(items) if !items.is_empty() => {
            if let Some(strings) = items.iter().map(|v| v.as_str().map(str::to_string)).collect::<Option<Vec<_>>>() {
                Some(AttributeValue::Strs(strings))
            } else {
                items
                    .iter()
                    .map(JsonValue::as_f64)
                    .collect::<Option<Vec<_>>>()
                    .map(AttributeValue::Doubles)
            }
        }
        _ => None,
    }
}

/// Writer for labeled arrays
pub struct NetCDFWriter<'a> {
    output_path: &'a Path,
}

impl<'a> NetCDFWriter<'a> {
    /// Create a new NetCDF writer
    #[must_use]
    pub const fn new(output_path: &'a Path) -> Self {
        Self { output_path }
    }

    /// Write `array` to a new file, replacing any existing one
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written.
    pub fn write(&self, array: &LabeledArray) -> Result<()> {
        if self.output_path.exists() {
            fs::remove_file(self.output_path)?;
        }

        let mut file = netcdf::create(self.output_path)?;

        for (dim_name, &dim_len) in array.dims().iter().zip(array.shape()) {
            file.add_dimension(dim_name, dim_len)?;
        }

        for dim_name in array.dims() {
            if let Some(coord) = array.coord(dim_name) {
                write_coordinate(&mut file, dim_name, coord)?;
            }
        }

        let dim_refs: Vec<&str> = array.dims().iter().map(String::as_str).collect();
        let mut new_var = file.add_variable::<f64>(array.name(), &dim_refs)?;
        new_var.put_attribute("_FillValue", f64::NAN)?;
        put_attributes(&mut new_var, array.attrs())?;
        let data = array.data().as_standard_layout();
        new_var.put(data.view(), ..)?;

        // Add history attribute
        file.add_attribute(
            "history",
            format!("Created by RuClim on {}", Utc::now().to_rfc3339()),
        )?;

        Ok(())
    }
}

fn write_coordinate(file: &mut netcdf::FileMut, dim_name: &str, coord: &Coordinate) -> Result<()> {
    match &coord.values {
        CoordValues::Numeric(values) => {
            let mut var = file.add_variable::<f64>(dim_name, &[dim_name])?;
            put_attributes(&mut var, &coord.attrs)?;
            var.put_values(values, ..)?;
        }
        CoordValues::Time(axis) => {
            let units = match (axis.units(), axis.dates().first()) {
                (Some(units), _) => units.clone(),
                (None, Some(&first)) => CfTimeUnits::days_since(first),
                (None, None) => return Err(RuClimError::InvalidTime {
                    reason: format!("cannot choose units for empty time coordinate '{dim_name}'"),
                }),
            };
            let offsets = units.encode(axis.dates(), axis.calendar());
            let mut var = file.add_variable::<f64>(dim_name, &[dim_name])?;
            put_attributes(&mut var, &coord.attrs)?;
            var.put_attribute("units", units.to_string())?;
            var.put_attribute("calendar", axis.calendar().as_str())?;
            var.put_values(&offsets, ..)?;
        }
        CoordValues::Labels(labels) => {
            // CF flag convention: integer index plus space-separated meanings
            #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
            let index: Vec<i32> = (0..labels.len() as i32).collect();
            let mut var = file.add_variable::<i32>(dim_name, &[dim_name])?;
            put_attributes(&mut var, &coord.attrs)?;
            var.put_attribute("flag_values", index.clone())?;
            var.put_attribute("flag_meanings", labels.join(" "))?;
            var.put_values(&index, ..)?;
        }
    }
    Ok(())
}

fn put_attributes(var: &mut netcdf::VariableMut<'_>, attrs: &Attributes) -> Result<()> {
    for (key, value) in attrs {
        match json_to_attribute(value) {
            Some(attr) => {
                var.put_attribute(key, attr)?;
            }
            None => {
                tracing::warn!(attribute = key.as_str(), "skipped unsupported attribute type");
            }
        }
    }
    Ok(())
}

/// Writes `array` to `output_path`
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn write_labeled_array(array: &LabeledArray, output_path: &Path) -> Result<()> {
    NetCDFWriter::new(output_path).write(array)
}
