//! Cartesian product of sweep dimensions.
//!
//! Every combination of one variant per dimension becomes a [`SweepPoint`]:
//! a [`NameDescriptor`] recording the chosen variants, and the merged
//! configuration obtained by overlaying the chosen fragments in dimension
//! order.
//!
//! Merging is a shallow overlay of top-level keys. A later dimension's key
//! replaces an earlier one wholesale; nested mappings are never combined.

use serde_yaml::Mapping;
use std::fmt;
use sweep_config::{DimensionSet, Fragment};

/// Separator between `dimension=variant` pairs in display names.
pub const NAME_SEPARATOR: &str = "-";

/// Ordered mapping of dimension name to chosen variant name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NameDescriptor {
    entries: Vec<(String, String)>,
}

impl NameDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of this descriptor with one more `dimension -> variant` entry.
    pub fn with(&self, dimension: &str, variant: &str) -> Self {
        let mut entries = Vec::with_capacity(self.entries.len() + 1);
        entries.extend(self.entries.iter().cloned());
        entries.push((dimension.to_string(), variant.to_string()));
        Self { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(d, v)| (d.as_str(), v.as_str()))
    }

    /// Dimension names in declaration order.
    pub fn dimensions(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(d, _)| d.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `dim=variant` pairs joined with [`NAME_SEPARATOR`].
    pub fn display_name(&self) -> String {
        self.entries
            .iter()
            .map(|(d, v)| format!("{d}={v}"))
            .collect::<Vec<_>>()
            .join(NAME_SEPARATOR)
    }
}

impl fmt::Display for NameDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}

impl<D: Into<String>, V: Into<String>> FromIterator<(D, V)> for NameDescriptor {
    fn from_iter<I: IntoIterator<Item = (D, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(d, v)| (d.into(), v.into()))
                .collect(),
        }
    }
}

/// One point of the sweep: which variants were chosen and the merged config.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepPoint {
    pub descriptor: NameDescriptor,
    pub config: Mapping,
}

impl SweepPoint {
    fn seed() -> Self {
        Self {
            descriptor: NameDescriptor::new(),
            config: Mapping::new(),
        }
    }
}

/// Overlay `fragment` onto a copy of `base`, top-level keys only.
///
/// Keys already present in `base` keep their position and take the
/// fragment's value.
pub fn overlay(base: &Mapping, fragment: &Fragment) -> Mapping {
    let mut merged = base.clone();
    for (key, value) in fragment {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

/// Expand `dimensions` into every combination of their variants.
///
/// The result has one entry per combination, ordered with the first
/// dimension varying slowest. A dimension without variants empties the
/// result; an empty dimension set yields a single point with an empty
/// descriptor and configuration.
pub fn build_configs(dimensions: &DimensionSet) -> Vec<SweepPoint> {
    let mut points = vec![SweepPoint::seed()];
    for dimension in dimensions {
        let mut next = Vec::with_capacity(points.len().saturating_mul(dimension.len()));
        for point in &points {
            for variant in &dimension.variants {
                next.push(SweepPoint {
                    descriptor: point.descriptor.with(&dimension.name, &variant.name),
                    config: overlay(&point.config, &variant.fragment),
                });
            }
        }
        points = next;
    }
    points
}
