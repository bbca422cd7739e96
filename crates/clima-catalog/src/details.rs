//! Supplementary per-dataset metadata from the detail endpoint.

use std::collections::HashMap;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

/// Technical detail for one dataset.
///
/// Everything here is optional on the wire; unknown fields in the response
/// are ignored. Detail is supplementary to the catalog listing, so lookups
/// degrade to "no detail available" instead of failing the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetDetails {
    /// Variables provided by the dataset, keyed by variable name.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub variables: HashMap<String, VariableDetail>,

    /// Spatial and temporal coverage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extent: Option<Extent>,

    /// Keywords for discovery.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
}

/// Per-variable metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariableDetail {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The spatial and temporal extent of a dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spatial: Option<SpatialExtent>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub temporal: Option<TemporalExtent>,
}

/// Spatial extent with bounding boxes as [west, south, east, north] arrays.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpatialExtent {
    #[serde(default)]
    pub bbox: Vec<Vec<f64>>,
}

/// Temporal extent as [start, end] ISO 8601 pairs; null marks an open end.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemporalExtent {
    #[serde(default)]
    pub interval: Vec<Vec<Option<String>>>,
}

impl DatasetDetails {
    /// Render the detail block shown alongside a catalog entry.
    pub fn summary(&self) -> String {
        let mut out = String::new();

        if !self.variables.is_empty() {
            out.push_str("Variables:\n");
            let mut names: Vec<&String> = self.variables.keys().collect();
            names.sort_unstable();
            for name in names {
                let var = &self.variables[name];
                let _ = write!(out, "  {}", name);
                if let Some(units) = &var.units {
                    let _ = write!(out, " [{}]", units);
                }
                if let Some(description) = &var.description {
                    let _ = write!(out, ": {}", description);
                }
                out.push('\n');
            }
        }

        if let Some(extent) = &self.extent {
            if let Some(temporal) = &extent.temporal {
                if let Some(interval) = temporal.interval.first() {
                    let start = interval
                        .first()
                        .and_then(|v| v.as_deref())
                        .unwrap_or("open");
                    let end = interval.get(1).and_then(|v| v.as_deref()).unwrap_or("open");
                    let _ = writeln!(out, "Temporal coverage: {} to {}", start, end);
                }
            }
            if let Some(spatial) = &extent.spatial {
                if let Some(bbox) = spatial.bbox.first() {
                    let _ = writeln!(out, "Spatial extent: {:?}", bbox);
                }
            }
        }

        if !self.keywords.is_empty() {
            let _ = writeln!(out, "Keywords: {}", self.keywords.join(", "));
        }

        if out.is_empty() {
            out.push_str("No detail available\n");
        }
        out
    }
}
