//! bench-sweep common types and errors.
//!
//! This crate provides foundational types shared across the sweep crates:
//! - The unified error type and its stable error codes
//! - Sweep run identifiers used to correlate diagnostics

pub mod error;
pub mod id;

pub use error::{Error, Result};
pub use id::SweepId;

/// Fixed digest columns, written after the dimension columns.
///
/// Dimension names may not reuse these.
pub const DIGEST_COLUMNS: [&str; 6] = [
    "name",
    "avg_byte_throughput",
    "max_arena_size",
    "max_in_use_size",
    "max_mmap_size",
    "close_time",
];
