//! Resolution of the dimension source and benchmark executable.
//!
//! Dimensions: explicit path (CLI flag or `SWEEP_DIMENSIONS`) → XDG config
//! file → built-in preset. The benchmark executable: explicit path (CLI flag
//! or `SWEEP_BENCHMARK`) → `single_benchmark` next to the running binary.

use crate::dimension::DimensionSet;
use crate::preset::{get_preset, PresetName};
use std::fmt;
use std::path::{Path, PathBuf};
use sweep_common::{Error, Result};
use tracing::debug;

/// Directory under the user config dir holding bench-sweep files.
pub const APP_DIR: &str = "bench-sweep";

/// Dimension file looked up inside [`APP_DIR`].
pub const DIMENSIONS_FILE: &str = "dimensions.yaml";

/// Default benchmark executable name, looked up next to the running binary.
pub const DEFAULT_BENCHMARK: &str = "single_benchmark";

/// Search locations for configuration files.
#[derive(Debug, Clone, Default)]
pub struct ConfigPaths {
    pub config_dir: Option<PathBuf>,
}

impl ConfigPaths {
    /// Use the platform config directory (`$XDG_CONFIG_HOME` on Linux).
    pub fn from_env() -> Self {
        Self {
            config_dir: dirs::config_dir().map(|d| d.join(APP_DIR)),
        }
    }

    pub fn dimensions_file(&self) -> Option<PathBuf> {
        self.config_dir.as_ref().map(|d| d.join(DIMENSIONS_FILE))
    }
}

/// Where the active dimension set came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DimensionSource {
    Explicit(PathBuf),
    UserConfig(PathBuf),
    Preset(PresetName),
}

impl fmt::Display for DimensionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DimensionSource::Explicit(p) => write!(f, "{}", p.display()),
            DimensionSource::UserConfig(p) => write!(f, "{} (user config)", p.display()),
            DimensionSource::Preset(name) => write!(f, "built-in preset {name}"),
        }
    }
}

/// A loaded dimension set and its origin.
#[derive(Debug, Clone)]
pub struct ResolvedDimensions {
    pub set: DimensionSet,
    pub source: DimensionSource,
}

/// Resolve and load the dimension set.
///
/// An explicit path must exist. The user config file is only used if present.
pub fn resolve_dimensions(
    explicit: Option<&Path>,
    paths: &ConfigPaths,
) -> Result<ResolvedDimensions> {
    if let Some(path) = explicit {
        debug!(path = %path.display(), "loading explicit dimension file");
        return Ok(ResolvedDimensions {
            set: DimensionSet::from_file(path)?,
            source: DimensionSource::Explicit(path.to_path_buf()),
        });
    }

    if let Some(path) = paths.dimensions_file().filter(|p| p.is_file()) {
        debug!(path = %path.display(), "loading user dimension file");
        return Ok(ResolvedDimensions {
            set: DimensionSet::from_file(&path)?,
            source: DimensionSource::UserConfig(path),
        });
    }

    let preset = PresetName::StoragePlugins;
    debug!(%preset, "using built-in dimension preset");
    Ok(ResolvedDimensions {
        set: get_preset(preset)?,
        source: DimensionSource::Preset(preset),
    })
}

/// Resolve the benchmark executable path.
///
/// Existence is not checked here; a missing executable surfaces as a spawn
/// error on the first run.
pub fn resolve_benchmark(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    let exe = std::env::current_exe()?;
    let dir = exe.parent().ok_or_else(|| {
        Error::Config(format!(
            "cannot locate {DEFAULT_BENCHMARK}: {} has no parent directory",
            exe.display()
        ))
    })?;
    Ok(dir.join(DEFAULT_BENCHMARK))
}
