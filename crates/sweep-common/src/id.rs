//! Sweep identity types.

use std::fmt;

/// Sweep ID for correlating diagnostics of one sweep invocation.
///
/// Format: `sweep-<date>-<time>-<random>`
/// Example: `sweep-20260115-143022-abc123`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SweepId(pub String);

impl SweepId {
    /// Generate a new sweep ID.
    pub fn new() -> Self {
        let now = chrono::Utc::now();
        let random: String = uuid::Uuid::new_v4()
            .to_string()
            .chars()
            .take(6)
            .collect();
        SweepId(format!("sweep-{}-{}", now.format("%Y%m%d-%H%M%S"), random))
    }
}

impl Default for SweepId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SweepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
