//! Reductions of labeled arrays along named axes

use super::operations::{StatOperation, StatisticalReduction};
use crate::calendar::CalendarDate;
use crate::errors::{Result, RuClimError};
use crate::labeled_array::{CoordValues, Coordinate, LabeledArray};
use ndarray::{ArrayD, Axis};
use std::cmp::Ordering;

/// Reduces axis `dim` away entirely.
///
/// Name, attributes and the remaining coordinates are kept.
///
/// # Errors
///
/// Returns [`RuClimError::MissingCoordinate`] if `dim` is not an axis.
pub fn reduce_dimension(array: &LabeledArray, dim: &str, operation: StatOperation) -> Result<LabeledArray> {
    let axis = array.axis_index(dim)?;
    let reduced = array.data().reduce_along_axis(axis, operation)?;
    array.remove_axis(axis, reduced)
}

/// Partitions axis `dim` by identical coordinate labels and reduces each
/// group with `operation`.
///
/// Groups come out in ascending label order; the axis keeps its name and
/// its coordinate holds one label per group.
///
/// # Errors
///
/// Returns [`RuClimError::MissingCoordinate`] if `dim` has no coordinate.
pub fn groupby_coordinate(array: &LabeledArray, dim: &str, operation: StatOperation) -> Result<LabeledArray> {
    let axis = array.axis_index(dim)?;
    let coord = array.coord(dim).ok_or_else(|| RuClimError::MissingCoordinate {
        array: array.name().to_string(),
        coord: dim.to_string(),
    })?;

    let groups = label_groups(&coord.values);
    let mut reduced = Vec::with_capacity(groups.len());
    for members in &groups {
        let subset = array.data().select(Axis(axis), members);
        reduced.push(subset.reduce_along_axis(axis, operation)?);
    }

    let data = if reduced.is_empty() {
        let mut shape = array.shape().to_vec();
        shape[axis] = 0;
        ArrayD::zeros(shape)
    } else {
        let views: Vec<_> = reduced.iter().map(|r| r.view()).collect();
        ndarray::stack(Axis(axis), &views)?
    };

    let firsts: Vec<usize> = groups.iter().map(|g| g[0]).collect();
    let new_coord = Coordinate {
        values: coord.values.select(&firsts),
        attrs: coord.attrs.clone(),
    };
    array.replace_axis(axis, dim, data, Some(new_coord))
}

/// Index groups of equal labels, sorted by label
fn label_groups(values: &CoordValues) -> Vec<Vec<usize>> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    let cmp = |a: &usize, b: &usize| -> Ordering {
        match values {
            CoordValues::Numeric(v) => v[*a].total_cmp(&v[*b]),
            CoordValues::Time(t) => {
                let d: &[CalendarDate] = t.dates();
                d[*a].cmp(&d[*b])
            }
            CoordValues::Labels(l) => l[*a].cmp(&l[*b]),
        }
    };
    order.sort_by(cmp);

    let mut groups: Vec<Vec<usize>> = Vec::new();
    for idx in order {
        match groups.last_mut() {
            Some(group) if cmp(&group[0], &idx) == Ordering::Equal => group.push(idx),
            _ => groups.push(vec![idx]),
        }
    }
    groups
}
