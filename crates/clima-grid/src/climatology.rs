//! Climatology aggregation along the time axis.

use std::collections::HashSet;

use chrono::{DateTime, Datelike, Utc};
use ndarray::{ArrayD, ArrayViewD, Axis};
use tracing::debug;

use clima_common::{ClimError, ClimResult, ClimatologyPeriod, Season};

use crate::array::{AxisCoords, LabeledArray, LabeledAxis};

/// Compute a climatology of `array` along the named time axis.
///
/// Monthly and seasonal periods replace the time axis with a grouping axis
/// (`month`, `season`) holding exactly the groups present in the input.
/// Annual averages within each calendar year and then averages the per-year
/// means, weighting each year equally regardless of how many samples it
/// contributed; the time axis is removed entirely.
///
/// All other axes pass through unchanged.
pub fn climatology(
    array: &LabeledArray,
    time_axis: &str,
    period: ClimatologyPeriod,
) -> ClimResult<LabeledArray> {
    let axis_idx = array
        .axis_index(time_axis)
        .ok_or_else(|| ClimError::DimensionNotFound(time_axis.to_string()))?;
    let times = array.timestamps(axis_idx)?;
    if times.is_empty() {
        return Err(ClimError::InvalidArgument(format!(
            "Axis '{}' has no samples to aggregate",
            time_axis
        )));
    }

    let (data, grouping_axis) = match period {
        ClimatologyPeriod::Monthly => {
            let mut months: Vec<u32> = times.iter().map(|t| t.month()).collect();
            months.sort_unstable();
            months.dedup();

            let means = months
                .iter()
                .map(|&month| {
                    let indices = indices_where(times, |t| t.month() == month);
                    group_mean(array.data(), axis_idx, &indices)
                })
                .collect::<ClimResult<Vec<_>>>()?;

            let coords = AxisCoords::Numeric(months.iter().map(|&m| m as f64).collect());
            (
                stack_groups(axis_idx, &means)?,
                Some(LabeledAxis::new("month", coords)),
            )
        }
        ClimatologyPeriod::Seasonal => {
            let present: HashSet<Season> = times
                .iter()
                .map(|t| Season::from_month(t.month()))
                .collect();
            let seasons: Vec<Season> = Season::ALL
                .iter()
                .copied()
                .filter(|s| present.contains(s))
                .collect();

            let means = seasons
                .iter()
                .map(|&season| {
                    let indices =
                        indices_where(times, |t| Season::from_month(t.month()) == season);
                    group_mean(array.data(), axis_idx, &indices)
                })
                .collect::<ClimResult<Vec<_>>>()?;

            let labels = seasons.iter().map(|s| s.label().to_string()).collect();
            (
                stack_groups(axis_idx, &means)?,
                Some(LabeledAxis::new("season", AxisCoords::Labels(labels))),
            )
        }
        ClimatologyPeriod::Annual => {
            let mut years: Vec<i32> = times.iter().map(|t| t.year()).collect();
            years.sort_unstable();
            years.dedup();

            let yearly = years
                .iter()
                .map(|&year| {
                    let indices = indices_where(times, |t| t.year() == year);
                    group_mean(array.data(), axis_idx, &indices)
                })
                .collect::<ClimResult<Vec<_>>>()?;

            // Mean of the per-year means, not a flat mean over all samples:
            // every year contributes equally however many samples it has.
            let stacked = stack_groups(axis_idx, &yearly)?;
            let data = stacked
                .mean_axis(Axis(axis_idx))
                .ok_or_else(|| ClimError::Internal("no yearly groups to average".to_string()))?;
            (data, None)
        }
    };

    let mut axes: Vec<LabeledAxis> = array.axes().to_vec();
    match grouping_axis {
        Some(axis) => axes[axis_idx] = axis,
        None => {
            axes.remove(axis_idx);
        }
    }

    debug!(
        variable = array.name(),
        period = %period,
        "Computed climatology"
    );

    LabeledArray::new(array.name(), data, axes)
}

fn indices_where<F>(times: &[DateTime<Utc>], pred: F) -> Vec<usize>
where
    F: Fn(&DateTime<Utc>) -> bool,
{
    times
        .iter()
        .enumerate()
        .filter(|(_, t)| pred(t))
        .map(|(i, _)| i)
        .collect()
}

fn group_mean(data: &ArrayD<f64>, axis: usize, indices: &[usize]) -> ClimResult<ArrayD<f64>> {
    let subset = data.select(Axis(axis), indices);
    subset
        .mean_axis(Axis(axis))
        .ok_or_else(|| ClimError::Internal("aggregation group is empty".to_string()))
}

fn stack_groups(axis: usize, groups: &[ArrayD<f64>]) -> ClimResult<ArrayD<f64>> {
    let views: Vec<ArrayViewD<'_, f64>> = groups.iter().map(|g| g.view()).collect();
    ndarray::stack(Axis(axis), &views)
        .map_err(|e| ClimError::Internal(format!("Failed to assemble grouped axis: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use ndarray::IxDyn;

    fn series(name: &str, times: Vec<DateTime<Utc>>, values: Vec<f64>) -> LabeledArray {
        let data = ArrayD::from_shape_vec(IxDyn(&[values.len()]), values).unwrap();
        let axes = vec![LabeledAxis::new("time", AxisCoords::Time(times))];
        LabeledArray::new(name, data, axes).unwrap()
    }

    fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_missing_time_axis_is_an_error() {
        let array = series("tas", vec![utc(2020, 1, 1)], vec![1.0]);
        let err = climatology(&array, "valid_time", ClimatologyPeriod::Monthly).unwrap_err();
        assert!(matches!(err, ClimError::DimensionNotFound(_)));
    }

    #[test]
    fn test_non_time_axis_is_an_error() {
        let data = ArrayD::from_shape_vec(IxDyn(&[2]), vec![1.0, 2.0]).unwrap();
        let axes = vec![LabeledAxis::new("lat", AxisCoords::Numeric(vec![0.0, 1.0]))];
        let array = LabeledArray::new("tas", data, axes).unwrap();

        let err = climatology(&array, "lat", ClimatologyPeriod::Monthly).unwrap_err();
        assert!(matches!(err, ClimError::InvalidArgument(_)));
    }

    #[test]
    fn test_empty_time_axis_is_an_error() {
        let array = series("tas", vec![], vec![]);
        let err = climatology(&array, "time", ClimatologyPeriod::Annual).unwrap_err();
        assert!(matches!(err, ClimError::InvalidArgument(_)));
    }

    #[test]
    fn test_monthly_groups_only_months_present() {
        let array = series(
            "tas",
            vec![utc(2020, 1, 1), utc(2020, 1, 15), utc(2020, 3, 1)],
            vec![2.0, 4.0, 7.0],
        );
        let result = climatology(&array, "time", ClimatologyPeriod::Monthly).unwrap();

        assert_eq!(result.dim_names(), vec!["month"]);
        assert_eq!(
            result.axis("month").unwrap().coords,
            AxisCoords::Numeric(vec![1.0, 3.0])
        );
        let values: Vec<f64> = result.data().iter().copied().collect();
        assert_eq!(values, vec![3.0, 7.0]);
    }
}
