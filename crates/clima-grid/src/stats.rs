//! Simple reductions and time-series extraction.
//!
//! These belong to the same aggregation family as [`crate::climatology`] but
//! serve the statistics and point-inspection flows: whole-axis reductions
//! (mean/std/min/max) and extraction of a time series at a geographic point,
//! either from the nearest grid cell or as an area mean over a small box.

use std::fmt;
use std::str::FromStr;

use ndarray::{ArrayD, Axis};
use tracing::debug;

use clima_common::{BoundingBox, ClimError, ClimResult};

use crate::array::{LabeledArray, LabeledAxis};

/// Half-width in degrees of the box used for area-mean point extraction.
pub const POINT_BUFFER_DEGREES: f64 = 0.5;

/// Reduction applied along a single axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Statistic {
    Mean,
    /// Population standard deviation (ddof 0).
    Std,
    Min,
    Max,
}

impl FromStr for Statistic {
    type Err = ClimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mean" => Ok(Statistic::Mean),
            "std" => Ok(Statistic::Std),
            "min" => Ok(Statistic::Min),
            "max" => Ok(Statistic::Max),
            other => Err(ClimError::InvalidArgument(format!(
                "Invalid statistic '{}'. Choose from 'mean', 'std', 'min', or 'max'.",
                other
            ))),
        }
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statistic::Mean => write!(f, "mean"),
            Statistic::Std => write!(f, "std"),
            Statistic::Min => write!(f, "min"),
            Statistic::Max => write!(f, "max"),
        }
    }
}

/// How to turn a geographic point into a value per timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointSelection {
    /// Value of the single nearest grid cell.
    #[default]
    Nearest,
    /// Mean over all grid cells within ±0.5 degrees of the point.
    AreaMean,
}

/// Reduce `array` along the named axis, removing it and preserving all other
/// axes.
pub fn reduce(array: &LabeledArray, axis: &str, stat: Statistic) -> ClimResult<LabeledArray> {
    let axis_idx = array
        .axis_index(axis)
        .ok_or_else(|| ClimError::DimensionNotFound(axis.to_string()))?;
    if array.shape()[axis_idx] == 0 {
        return Err(ClimError::InvalidArgument(format!(
            "Axis '{}' has no samples to reduce",
            axis
        )));
    }

    let data = array.data();
    let reduced: ArrayD<f64> = match stat {
        Statistic::Mean => data
            .mean_axis(Axis(axis_idx))
            .ok_or_else(|| ClimError::Internal("mean over empty axis".to_string()))?,
        Statistic::Std => data.std_axis(Axis(axis_idx), 0.0),
        Statistic::Min => data.fold_axis(Axis(axis_idx), f64::INFINITY, |acc, &x| acc.min(x)),
        Statistic::Max => data.fold_axis(Axis(axis_idx), f64::NEG_INFINITY, |acc, &x| acc.max(x)),
    };

    let mut axes: Vec<LabeledAxis> = array.axes().to_vec();
    axes.remove(axis_idx);

    LabeledArray::new(array.name(), reduced, axes)
}

/// Extract the time series at a geographic point.
///
/// Requires resolvable time, latitude, and longitude roles on the array;
/// extraction without a time axis is a domain error, never a silent
/// whole-array fallback.
pub fn extract_time_series(
    array: &LabeledArray,
    lat: f64,
    lon: f64,
    selection: PointSelection,
) -> ClimResult<LabeledArray> {
    let dims = array.resolve_dims();
    dims.time
        .ok_or_else(|| ClimError::DimensionNotFound("time".to_string()))?;

    match selection {
        PointSelection::Nearest => {
            let lat_name = dims
                .latitude
                .ok_or_else(|| ClimError::DimensionNotFound("latitude".to_string()))?;
            let lon_name = dims
                .longitude
                .ok_or_else(|| ClimError::DimensionNotFound("longitude".to_string()))?;
            let lat_axis = array
                .axis_index(&lat_name)
                .ok_or_else(|| ClimError::DimensionNotFound(lat_name.clone()))?;
            let lon_axis = array
                .axis_index(&lon_name)
                .ok_or_else(|| ClimError::DimensionNotFound(lon_name.clone()))?;

            let lat_idx = nearest_index(array.numeric_coords(lat_axis)?, lat)?;
            let lon_idx = nearest_index(array.numeric_coords(lon_axis)?, lon)?;

            debug!(lat, lon, "Extracting nearest-point time series");

            // Drop the higher axis first so the lower index stays valid.
            let mut picks = [(lat_axis, lat_idx), (lon_axis, lon_idx)];
            picks.sort_by(|a, b| b.0.cmp(&a.0));

            let mut data = array.data().clone();
            let mut axes: Vec<LabeledAxis> = array.axes().to_vec();
            for (axis, index) in picks {
                data = data.index_axis(Axis(axis), index).to_owned();
                axes.remove(axis);
            }

            LabeledArray::new(array.name(), data, axes)
        }
        PointSelection::AreaMean => {
            let bbox =
                BoundingBox::around_point(lon, lat, POINT_BUFFER_DEGREES).clamp_to_valid();
            debug!(lat, lon, "Extracting area-mean time series");
            area_mean(array, &bbox)
        }
    }
}

/// Average `array` over every latitude/longitude grid point inside `bbox`,
/// removing both spatial axes.
pub fn area_mean(array: &LabeledArray, bbox: &BoundingBox) -> ClimResult<LabeledArray> {
    let dims = array.resolve_dims();
    let lat_name = dims
        .latitude
        .ok_or_else(|| ClimError::DimensionNotFound("latitude".to_string()))?;
    let lon_name = dims
        .longitude
        .ok_or_else(|| ClimError::DimensionNotFound("longitude".to_string()))?;
    let lat_axis = array
        .axis_index(&lat_name)
        .ok_or_else(|| ClimError::DimensionNotFound(lat_name.clone()))?;
    let lon_axis = array
        .axis_index(&lon_name)
        .ok_or_else(|| ClimError::DimensionNotFound(lon_name.clone()))?;

    let lat_sel = indices_within(array.numeric_coords(lat_axis)?, bbox.min_lat, bbox.max_lat);
    if lat_sel.is_empty() {
        return Err(ClimError::InvalidArgument(format!(
            "No grid points within latitude range {:.2}..{:.2}",
            bbox.min_lat, bbox.max_lat
        )));
    }
    let lon_sel = indices_within(array.numeric_coords(lon_axis)?, bbox.min_lon, bbox.max_lon);
    if lon_sel.is_empty() {
        return Err(ClimError::InvalidArgument(format!(
            "No grid points within longitude range {:.2}..{:.2}",
            bbox.min_lon, bbox.max_lon
        )));
    }

    let subset = array
        .data()
        .select(Axis(lat_axis), &lat_sel)
        .select(Axis(lon_axis), &lon_sel);

    // Collapse the higher axis first so the lower index stays valid.
    let (first, second) = if lat_axis > lon_axis {
        (lat_axis, lon_axis)
    } else {
        (lon_axis, lat_axis)
    };
    let data = subset
        .mean_axis(Axis(first))
        .and_then(|a| a.mean_axis(Axis(second)))
        .ok_or_else(|| ClimError::Internal("mean over empty spatial axis".to_string()))?;

    let mut axes: Vec<LabeledAxis> = array.axes().to_vec();
    axes.remove(first);
    axes.remove(second);

    LabeledArray::new(array.name(), data, axes)
}

fn nearest_index(coords: &[f64], target: f64) -> ClimResult<usize> {
    coords
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            (*a - target)
                .abs()
                .partial_cmp(&(*b - target).abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|(i, _)| i)
        .ok_or_else(|| ClimError::InvalidArgument("Axis has no coordinate values".to_string()))
}

fn indices_within(coords: &[f64], min: f64, max: f64) -> Vec<usize> {
    coords
        .iter()
        .enumerate()
        .filter(|(_, &v)| v >= min && v <= max)
        .map(|(i, _)| i)
        .collect()
}
