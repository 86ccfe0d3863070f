//! Exit codes for the bench-sweep CLI.
//!
//! Exit codes communicate the sweep outcome without requiring output parsing.

use sweep_common::Error;

/// Exit codes for bench-sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Every sweep point produced a digest row and the table was written
    Clean = 0,

    /// Invalid dimensions or unresolvable paths
    ConfigError = 10,

    /// Benchmark missing, failed, or produced unreadable output
    InvocationError = 11,

    /// Benchmark telemetry could not be reduced
    TelemetryError = 12,

    /// I/O or serialization error
    IoError = 13,

    /// Internal/unknown error
    InternalError = 99,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl From<&Error> for ExitCode {
    fn from(err: &Error) -> Self {
        match err.code() {
            10..=19 => ExitCode::ConfigError,
            20..=29 => ExitCode::InvocationError,
            30..=39 => ExitCode::TelemetryError,
            60..=69 => ExitCode::IoError,
            _ => ExitCode::InternalError,
        }
    }
}
