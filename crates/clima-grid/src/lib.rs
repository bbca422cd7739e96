//! Labeled gridded arrays and time aggregation for climate datasets.
//!
//! Gridded climate data arrives with dataset-specific axis names (`time`,
//! `valid_time`, `lat`, `nav_lat`, ...). This crate maps those names onto
//! canonical roles once, centrally, and builds every analysis operation on
//! top of the resolved axes:
//!
//! - **Dimension resolution**: substring heuristics binding raw axis names to
//!   time/latitude/longitude roles ([`dims`])
//! - **Climatology**: monthly, seasonal, and annual aggregation along the
//!   time axis ([`climatology`])
//! - **Statistics**: mean/std/min/max reductions, nearest-point and area-mean
//!   time-series extraction ([`stats`])
//!
//! # Example
//!
//! ```ignore
//! use clima_common::ClimatologyPeriod;
//! use clima_grid::{climatology, LabeledArray};
//!
//! let array: LabeledArray = /* from the dataset loader */;
//! let dims = array.resolve_dims();
//! let time_axis = dims.time.expect("dataset has no time axis");
//! let monthly = climatology(&array, &time_axis, ClimatologyPeriod::Monthly)?;
//! ```
//!
//! Arrays are never mutated: every reduction returns a new [`LabeledArray`]
//! carrying the surviving axes.

pub mod array;
pub mod climatology;
pub mod dataset;
pub mod dims;
pub mod stats;

pub use array::{AxisCoords, LabeledArray, LabeledAxis};
pub use climatology::climatology;
pub use dataset::{load_checked, Dataset, DatasetLoader};
pub use dims::{AxisRole, ResolvedDims};
pub use stats::{area_mean, extract_time_series, reduce, PointSelection, Statistic};
