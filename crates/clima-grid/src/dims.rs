//! Canonical dimension resolution.
//!
//! Datasets name their axes inconsistently (`time` vs `valid_time`, `lat` vs
//! `latitude` vs `nav_lat`). Every analysis operation needs the same answer
//! to "which axis is time?", so the substring heuristics live here once and
//! all call sites reuse them.

use crate::array::LabeledArray;

/// The semantic role a raw dimension name plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisRole {
    Time,
    Latitude,
    Longitude,
    Other,
}

impl AxisRole {
    /// Classify a single dimension name.
    ///
    /// Matching is case-sensitive substring containment: `"time"` for the
    /// time role, `"lat"` for latitude, `"lon"` for longitude. A name
    /// satisfying more than one rule classifies by the precedence
    /// time > latitude > longitude.
    pub fn of(name: &str) -> AxisRole {
        if name.contains("time") {
            AxisRole::Time
        } else if name.contains("lat") {
            AxisRole::Latitude
        } else if name.contains("lon") {
            AxisRole::Longitude
        } else {
            AxisRole::Other
        }
    }
}

/// Dimension names bound to each canonical role.
///
/// At most one name binds to each role; the first matching name in declared
/// dimension order wins. A role with no matching name resolves to `None` and
/// callers decide whether absence means "operate over the whole array" or a
/// DimensionNotFound error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedDims {
    pub time: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

impl ResolvedDims {
    /// Resolve an ordered list of dimension names.
    ///
    /// The per-role scans are independent: a contrived name containing both
    /// `"lat"` and `"time"` (e.g. `latime`) binds to BOTH roles. No real
    /// provider uses such names; we document the behavior rather than guess
    /// a tiebreak.
    pub fn resolve<S: AsRef<str>>(names: &[S]) -> ResolvedDims {
        let find = |needle: &str| {
            names
                .iter()
                .map(|n| n.as_ref())
                .find(|n| n.contains(needle))
                .map(|n| n.to_string())
        };
        ResolvedDims {
            time: find("time"),
            latitude: find("lat"),
            longitude: find("lon"),
        }
    }
}

impl LabeledArray {
    /// Resolve this array's axis names to canonical roles.
    pub fn resolve_dims(&self) -> ResolvedDims {
        ResolvedDims::resolve(&self.dim_names())
    }
}
