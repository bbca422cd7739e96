//! Dataset container and loader seam.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::Path;

use clima_common::{ClimError, ClimResult};

use crate::array::LabeledArray;

/// A loaded dataset: named variables plus global attributes.
///
/// Instances own their arrays; dropping the dataset releases everything, so
/// scoped acquisition guarantees release on every exit path.
#[derive(Debug, Default)]
pub struct Dataset {
    attributes: HashMap<String, String>,
    variables: HashMap<String, LabeledArray>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// Add a variable, keyed by the array's name.
    pub fn add_variable(&mut self, array: LabeledArray) {
        self.variables.insert(array.name().to_string(), array);
    }

    /// Look up a variable by name.
    pub fn variable(&self, name: &str) -> ClimResult<&LabeledArray> {
        self.variables.get(name).ok_or_else(|| {
            ClimError::InvalidArgument(format!("Variable '{}' not found in dataset", name))
        })
    }

    /// Variable names, sorted for stable output.
    pub fn variable_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.variables.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn attributes(&self) -> &HashMap<String, String> {
        &self.attributes
    }

    /// Render a human-readable summary of global attributes and per-variable
    /// dimensions and shape.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        out.push_str("===== Global Attributes =====\n");
        let mut attrs: Vec<(&String, &String)> = self.attributes.iter().collect();
        attrs.sort_unstable();
        for (key, value) in attrs {
            let _ = writeln!(out, "{}: {}", key, value);
        }

        out.push_str("\n===== Variables =====\n");
        for name in self.variable_names() {
            let array = &self.variables[name];
            let _ = writeln!(out, "\nVariable: {}", name);
            let _ = writeln!(out, "  Dimensions: {:?}", array.dim_names());
            let _ = writeln!(out, "  Shape: {:?}", array.shape());
        }
        out
    }
}

/// Loads datasets from local storage.
///
/// Implementations wrap a concrete NetCDF/Zarr reader; the analysis layer
/// only consumes the labeled arrays a loader produces.
pub trait DatasetLoader {
    fn load(&self, path: &Path) -> ClimResult<Dataset>;
}

/// Load a dataset after guarding that the file exists, so a missing file
/// surfaces as ResourceUnavailable instead of a reader-specific failure.
pub fn load_checked(loader: &dyn DatasetLoader, path: &Path) -> ClimResult<Dataset> {
    if !path.is_file() {
        return Err(ClimError::ResourceUnavailable(format!(
            "File not found at {}",
            path.display()
        )));
    }
    loader.load(path)
}
