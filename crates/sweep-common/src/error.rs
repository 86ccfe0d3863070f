//! Error types for bench-sweep.

use thiserror::Error;

/// Result type alias for sweep operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for bench-sweep.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration-space errors (10-19)
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid dimension '{dimension}': {reason}")]
    InvalidDimension { dimension: String, reason: String },

    // Process invocation errors (20-29)
    #[error("failed to launch benchmark '{executable}': {source}")]
    Spawn {
        executable: String,
        #[source]
        source: std::io::Error,
    },

    #[error("benchmark exited with {status}")]
    BenchmarkFailed { status: String },

    #[error("benchmark output is not valid UTF-8: {0}")]
    UnreadableOutput(String),

    #[error("failed to serialize configuration: {0}")]
    ConfigSerialization(String),

    // Telemetry format errors (30-39)
    #[error("malformed telemetry: {0}")]
    Telemetry(String),

    #[error("telemetry is missing field '{field}'")]
    MissingField { field: String },

    #[error("telemetry line {line}: invalid {field} value '{value}'")]
    InvalidField {
        field: String,
        value: String,
        line: u64,
    },

    #[error("telemetry contains no write records")]
    NoWriteRecords,

    // Per-run wrapper carrying the offending descriptor
    #[error("run {name} failed: {source}")]
    Run {
        name: String,
        #[source]
        source: Box<Error>,
    },

    // I/O and serialization errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    /// Returns the error code for this error type.
    ///
    /// A `Run` wrapper reports the code of the error it carries.
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::InvalidDimension { .. } => 11,
            Error::Spawn { .. } => 20,
            Error::BenchmarkFailed { .. } => 21,
            Error::UnreadableOutput(_) => 22,
            Error::ConfigSerialization(_) => 23,
            Error::Telemetry(_) => 30,
            Error::MissingField { .. } => 31,
            Error::InvalidField { .. } => 32,
            Error::NoWriteRecords => 33,
            Error::Run { source, .. } => source.code(),
            Error::Io(_) => 60,
            Error::Json(_) => 61,
            Error::Yaml(_) => 62,
            Error::Csv(_) => 63,
        }
    }

    /// Attach the descriptor of the sweep point that produced this error.
    pub fn in_run(self, name: impl Into<String>) -> Self {
        Error::Run {
            name: name.into(),
            source: Box::new(self),
        }
    }
}
