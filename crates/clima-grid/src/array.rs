//! Labeled n-dimensional arrays.

use chrono::{DateTime, Utc};
use ndarray::ArrayD;

use clima_common::{ClimError, ClimResult};

/// Coordinate values attached to one axis of a labeled array.
#[derive(Debug, Clone, PartialEq)]
pub enum AxisCoords {
    /// Timestamps, for a time axis.
    Time(Vec<DateTime<Utc>>),
    /// Numeric coordinates (degrees, pressure levels, ...).
    Numeric(Vec<f64>),
    /// Categorical labels, e.g. season names on a grouping axis.
    Labels(Vec<String>),
}

impl AxisCoords {
    pub fn len(&self) -> usize {
        match self {
            AxisCoords::Time(v) => v.len(),
            AxisCoords::Numeric(v) => v.len(),
            AxisCoords::Labels(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A named axis with its coordinate values.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledAxis {
    pub name: String,
    pub coords: AxisCoords,
}

impl LabeledAxis {
    pub fn new(name: impl Into<String>, coords: AxisCoords) -> Self {
        Self {
            name: name.into(),
            coords,
        }
    }
}

/// An n-dimensional numeric array with named, ordered axes and per-axis
/// coordinate values.
///
/// The analysis layer treats labeled arrays as read-only: reductions return
/// new arrays and leave the input untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledArray {
    name: String,
    data: ArrayD<f64>,
    axes: Vec<LabeledAxis>,
}

impl LabeledArray {
    /// Create a labeled array, validating that the axis list matches the
    /// array's dimensionality and that every axis carries one coordinate per
    /// grid point.
    pub fn new(
        name: impl Into<String>,
        data: ArrayD<f64>,
        axes: Vec<LabeledAxis>,
    ) -> ClimResult<Self> {
        if axes.len() != data.ndim() {
            return Err(ClimError::InvalidArgument(format!(
                "Array has {} dimensions but {} axes were given",
                data.ndim(),
                axes.len()
            )));
        }
        for (i, axis) in axes.iter().enumerate() {
            if axis.coords.len() != data.shape()[i] {
                return Err(ClimError::InvalidArgument(format!(
                    "Axis '{}' has {} coordinates but the array dimension has length {}",
                    axis.name,
                    axis.coords.len(),
                    data.shape()[i]
                )));
            }
        }
        Ok(Self {
            name: name.into(),
            data,
            axes,
        })
    }

    /// Variable name this array was loaded as.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &ArrayD<f64> {
        &self.data
    }

    pub fn axes(&self) -> &[LabeledAxis] {
        &self.axes
    }

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// Axis names in declared dimension order.
    pub fn dim_names(&self) -> Vec<&str> {
        self.axes.iter().map(|a| a.name.as_str()).collect()
    }

    /// Position of the named axis, if present.
    pub fn axis_index(&self, name: &str) -> Option<usize> {
        self.axes.iter().position(|a| a.name == name)
    }

    /// The named axis, if present.
    pub fn axis(&self, name: &str) -> Option<&LabeledAxis> {
        self.axes.iter().find(|a| a.name == name)
    }

    /// Timestamps carried by the axis at `index`.
    ///
    /// Fails with InvalidArgument when the axis holds numeric or label
    /// coordinates instead of timestamps.
    pub fn timestamps(&self, index: usize) -> ClimResult<&[DateTime<Utc>]> {
        match &self.axes[index].coords {
            AxisCoords::Time(values) => Ok(values),
            _ => Err(ClimError::InvalidArgument(format!(
                "Axis '{}' does not carry timestamps",
                self.axes[index].name
            ))),
        }
    }

    /// Numeric coordinates carried by the axis at `index`.
    pub fn numeric_coords(&self, index: usize) -> ClimResult<&[f64]> {
        match &self.axes[index].coords {
            AxisCoords::Numeric(values) => Ok(values),
            _ => Err(ClimError::InvalidArgument(format!(
                "Axis '{}' does not carry numeric coordinates",
                self.axes[index].name
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use ndarray::IxDyn;

    fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_new_rejects_axis_count_mismatch() {
        let data = ArrayD::zeros(IxDyn(&[2, 3]));
        let axes = vec![LabeledAxis::new("time", AxisCoords::Numeric(vec![0.0, 1.0]))];
        assert!(LabeledArray::new("tas", data, axes).is_err());
    }

    #[test]
    fn test_new_rejects_coord_length_mismatch() {
        let data = ArrayD::zeros(IxDyn(&[2]));
        let axes = vec![LabeledAxis::new(
            "lat",
            AxisCoords::Numeric(vec![0.0, 1.0, 2.0]),
        )];
        assert!(LabeledArray::new("tas", data, axes).is_err());
    }

    #[test]
    fn test_axis_lookup() {
        let data = ArrayD::zeros(IxDyn(&[1, 2]));
        let axes = vec![
            LabeledAxis::new("time", AxisCoords::Time(vec![utc(2020, 1, 1)])),
            LabeledAxis::new("lat", AxisCoords::Numeric(vec![0.0, 1.0])),
        ];
        let array = LabeledArray::new("tas", data, axes).unwrap();

        assert_eq!(array.dim_names(), vec!["time", "lat"]);
        assert_eq!(array.axis_index("lat"), Some(1));
        assert_eq!(array.axis_index("lon"), None);
        assert_eq!(array.timestamps(0).unwrap().len(), 1);
        assert!(array.timestamps(1).is_err());
        assert!(array.numeric_coords(0).is_err());
    }
}
