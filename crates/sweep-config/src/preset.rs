//! Built-in dimension presets.

use crate::dimension::{DimensionError, DimensionSet};
use std::fmt;

const STORAGE_PLUGINS_YAML: &str = include_str!("../presets/storage_plugins.yaml");

/// Names of the presets compiled into the binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetName {
    /// Message size profile x batch threshold x storage plugin settings.
    StoragePlugins,
}

impl PresetName {
    pub fn as_str(self) -> &'static str {
        match self {
            PresetName::StoragePlugins => "storage-plugins",
        }
    }

    fn source(self) -> &'static str {
        match self {
            PresetName::StoragePlugins => STORAGE_PLUGINS_YAML,
        }
    }
}

impl fmt::Display for PresetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Load a built-in preset.
pub fn get_preset(name: PresetName) -> Result<DimensionSet, DimensionError> {
    DimensionSet::from_yaml_str(name.source())
}
