//! Inspection of NetCDF files and labeled arrays
//!
//! Used by the `describe` command and to summarize results that are printed
//! instead of written.

use crate::errors::Result;
use crate::labeled_array::LabeledArray;
use netcdf::File;

/// Summary statistics over the finite values of an array
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArraySummary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
    /// Number of finite values
    pub valid: usize,
    pub total: usize,
}

impl ArraySummary {
    /// Statistics of `array`, ignoring NaN and infinite values.
    ///
    /// All statistics are NaN when no value is finite.
    #[must_use]
    pub fn of(array: &LabeledArray) -> Self {
        let total = array.data().len();
        let (mut min, mut max, mut sum, mut valid) = (f64::INFINITY, f64::NEG_INFINITY, 0.0, 0usize);
        for &v in array.data().iter().filter(|v| v.is_finite()) {
            min = min.min(v);
            max = max.max(v);
            sum += v;
            valid += 1;
        }

        if valid == 0 {
            return Self {
                min: f64::NAN,
                max: f64::NAN,
                mean: f64::NAN,
                std_dev: f64::NAN,
                valid,
                total,
            };
        }

        #[allow(clippy::cast_precision_loss)]
        let count = valid as f64;
        let mean = sum / count;
        let variance = array
            .data()
            .iter()
            .filter(|v| v.is_finite())
            .map(|&v| (v - mean).powi(2))
            .sum::<f64>()
            / count;

        Self {
            min,
            max,
            mean,
            std_dev: variance.sqrt(),
            valid,
            total,
        }
    }

    pub fn print(&self) {
        println!("   Min: {}", self.min);
        println!("   Max: {}", self.max);
        println!("   Mean: {:.4}", self.mean);
        println!("   Std Dev: {:.4}", self.std_dev);
        println!("   Valid values: {} of {}", self.valid, self.total);
    }
}

/// Prints the structure of `array` followed by its [`ArraySummary`].
pub fn describe_array(array: &LabeledArray) {
    println!("\n Variable Description: {}", array.name());
    println!("={}", "=".repeat(array.name().len() + 25));
    print!("{array}");

    println!("\n Summary:");
    ArraySummary::of(array).print();

    let total_bytes = array.data().len() * std::mem::size_of::<f64>();
    println!("\n Storage Information:");
    println!("    In memory: {}", format_bytes(total_bytes));
}

/// Lists the dimensions and variables of a NetCDF file, sorted by name.
///
/// # Errors
///
/// Returns an error if an attribute value cannot be read.
pub fn list_variables_and_dimensions(file: &File) -> Result<()> {
    println!("\n Dimensions");
    println!("==============");

    let mut dimensions: Vec<_> = file.dimensions().collect();
    dimensions.sort_by_key(|d| d.name());

    if dimensions.is_empty() {
        println!("   (No dimensions found)");
    }
    for dim in dimensions {
        let unlimited = if dim.is_unlimited() { " (unlimited)" } else { "" };
        println!("    {} = {}{unlimited}", dim.name(), dim.len());
    }

    println!("\n Variables");
    println!("=============");

    let mut variables: Vec<_> = file.variables().collect();
    variables.sort_by_key(|v| v.name());

    if variables.is_empty() {
        println!("   (No variables found)");
    }
    for var in variables {
        let dims: Vec<String> = var
            .dimensions()
            .iter()
            .map(|d| format!("{}[{}]", d.name(), d.len()))
            .collect();
        println!("    {} ({})", var.name(), dims.join(", "));

        let mut key_attrs = Vec::new();
        for key in ["units", "long_name", "calendar"] {
            if let Some(attr) = var.attribute(key) {
                if let netcdf::AttributeValue::Str(value) = attr.value()? {
                    key_attrs.push(format!("{key}: {value}"));
                }
            }
        }
        if !key_attrs.is_empty() {
            println!("      └─ {}", key_attrs.join(", "));
        }
    }

    println!("\n💡 Tip: Use describe -v <variable> to summarize one variable");
    Ok(())
}

#[allow(clippy::cast_precision_loss)]
fn format_bytes(bytes: usize) -> String {
    const KB: f64 = 1024.0;
    let b = bytes as f64;
    if b < KB {
        format!("{bytes} bytes")
    } else if b < KB * KB {
        format!("{:.2} KB", b / KB)
    } else if b < KB * KB * KB {
        format!("{:.2} MB", b / (KB * KB))
    } else {
        format!("{:.2} GB", b / (KB * KB * KB))
    }
}
