//! bench-sweep configuration loading and validation.
//!
//! This crate provides:
//! - The dimension model (dimensions, variants, configuration fragments)
//! - Dimension file parsing (YAML or JSON) and validation
//! - The built-in storage plugin comparison preset
//! - Resolution of the dimension source and benchmark executable

pub mod dimension;
pub mod preset;
pub mod resolve;

pub use dimension::{Dimension, DimensionError, DimensionSet, Fragment, Variant};
pub use preset::{get_preset, PresetName};
pub use resolve::{
    resolve_benchmark, resolve_dimensions, ConfigPaths, DimensionSource, ResolvedDimensions,
};
