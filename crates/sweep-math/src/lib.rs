//! bench-sweep math utilities.

pub mod stats;

pub use stats::{RunningMax, RunningMean};
