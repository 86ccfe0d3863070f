//! Dimensions of a benchmark sweep.
//!
//! A dimension is one independent axis of configuration choice ("message size
//! profile", "batch size", "plugin settings"). Each of its variants carries a
//! configuration fragment: a nested mapping of backend options that gets
//! overlaid onto the merged configuration when that variant is chosen.
//!
//! Dimension files are a top-level mapping of dimension name to a mapping of
//! variant name to fragment. Declaration order is preserved and significant.

use serde_yaml::{Mapping, Value};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use sweep_common::DIGEST_COLUMNS;
use thiserror::Error;

/// Configuration fragment carried by a variant.
pub type Fragment = Mapping;

/// Errors from loading or validating dimension declarations.
#[derive(Debug, Error)]
pub enum DimensionError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse dimension file: {0}")]
    Parse(String),

    #[error("dimension file must map dimension names to variants")]
    NotAMapping,

    #[error("dimension '{dimension}': {reason}")]
    Invalid { dimension: String, reason: String },
}

impl DimensionError {
    fn invalid(dimension: impl Into<String>, reason: impl Into<String>) -> Self {
        DimensionError::Invalid {
            dimension: dimension.into(),
            reason: reason.into(),
        }
    }
}

impl From<DimensionError> for sweep_common::Error {
    fn from(err: DimensionError) -> Self {
        match err {
            DimensionError::Invalid { dimension, reason } => {
                sweep_common::Error::InvalidDimension { dimension, reason }
            }
            other => sweep_common::Error::Config(other.to_string()),
        }
    }
}

/// One named choice within a dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct Variant {
    pub name: String,
    pub fragment: Fragment,
}

/// A named axis of configuration choice.
#[derive(Debug, Clone, PartialEq)]
pub struct Dimension {
    pub name: String,
    pub variants: Vec<Variant>,
}

impl Dimension {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variants: Vec::new(),
        }
    }

    /// Append a variant, keeping declaration order.
    pub fn with_variant(mut self, name: impl Into<String>, fragment: Fragment) -> Self {
        self.variants.push(Variant {
            name: name.into(),
            fragment,
        });
        self
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}

/// Ordered collection of dimensions that defines a sweep.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DimensionSet {
    dimensions: Vec<Dimension>,
}

impl DimensionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dimension(mut self, dimension: Dimension) -> Self {
        self.dimensions.push(dimension);
        self
    }

    pub fn push(&mut self, dimension: Dimension) {
        self.dimensions.push(dimension);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Dimension> {
        self.dimensions.iter()
    }

    pub fn len(&self) -> usize {
        self.dimensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dimensions.is_empty()
    }

    /// Dimension names in declaration order.
    pub fn names(&self) -> Vec<&str> {
        self.dimensions.iter().map(|d| d.name.as_str()).collect()
    }

    /// Number of sweep points the cartesian product will produce.
    ///
    /// Returns `None` if the product overflows `usize`.
    pub fn combination_count(&self) -> Option<usize> {
        self.dimensions
            .iter()
            .try_fold(1usize, |acc, d| acc.checked_mul(d.len()))
    }

    /// Check names for emptiness, duplicates and collisions with digest columns.
    pub fn validate(&self) -> Result<(), DimensionError> {
        let mut seen = HashSet::new();
        for dimension in &self.dimensions {
            if dimension.name.trim().is_empty() {
                return Err(DimensionError::invalid("", "dimension name is empty"));
            }
            if DIGEST_COLUMNS.contains(&dimension.name.as_str()) {
                return Err(DimensionError::invalid(
                    &dimension.name,
                    "name collides with a digest output column",
                ));
            }
            if !seen.insert(dimension.name.as_str()) {
                return Err(DimensionError::invalid(
                    &dimension.name,
                    "dimension declared more than once",
                ));
            }

            let mut variants = HashSet::new();
            for variant in &dimension.variants {
                if variant.name.trim().is_empty() {
                    return Err(DimensionError::invalid(
                        &dimension.name,
                        "variant name is empty",
                    ));
                }
                if !variants.insert(variant.name.as_str()) {
                    return Err(DimensionError::invalid(
                        &dimension.name,
                        format!("variant '{}' declared more than once", variant.name),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Build a dimension set from a parsed YAML/JSON document.
    pub fn from_value(value: Value) -> Result<Self, DimensionError> {
        let root = match value {
            Value::Mapping(m) => m,
            _ => return Err(DimensionError::NotAMapping),
        };

        let mut set = DimensionSet::new();
        for (key, variants) in root {
            let name = scalar_name(&key).ok_or_else(|| {
                DimensionError::invalid(format!("{key:?}"), "dimension name must be a scalar")
            })?;
            let variants = match variants {
                Value::Mapping(m) => m,
                _ => {
                    return Err(DimensionError::invalid(
                        name,
                        "variants must be a mapping of variant name to fragment",
                    ))
                }
            };

            let mut dimension = Dimension::new(name);
            for (variant_key, fragment) in variants {
                let variant_name = scalar_name(&variant_key).ok_or_else(|| {
                    DimensionError::invalid(&dimension.name, "variant name must be a scalar")
                })?;
                let fragment = match fragment {
                    Value::Mapping(m) => m,
                    Value::Null => Mapping::new(),
                    _ => {
                        return Err(DimensionError::invalid(
                            &dimension.name,
                            format!("fragment of variant '{variant_name}' is not a mapping"),
                        ))
                    }
                };
                dimension = dimension.with_variant(variant_name, fragment);
            }
            set.push(dimension);
        }

        set.validate()?;
        Ok(set)
    }

    /// Parse a YAML dimension document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, DimensionError> {
        let value: Value =
            serde_yaml::from_str(yaml).map_err(|e| DimensionError::Parse(e.to_string()))?;
        Self::from_value(value)
    }

    /// Parse a JSON dimension document.
    pub fn from_json_str(json: &str) -> Result<Self, DimensionError> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| DimensionError::Parse(e.to_string()))?;
        Self::from_value(value)
    }

    /// Load dimensions from a file; `.json` files are parsed as JSON, anything else as YAML.
    pub fn from_file(path: &Path) -> Result<Self, DimensionError> {
        let content = std::fs::read_to_string(path).map_err(|source| DimensionError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        }
    }
}

impl<'a> IntoIterator for &'a DimensionSet {
    type Item = &'a Dimension;
    type IntoIter = std::slice::Iter<'a, Dimension>;

    fn into_iter(self) -> Self::IntoIter {
        self.dimensions.iter()
    }
}

fn scalar_name(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
