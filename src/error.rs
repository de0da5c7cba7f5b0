//! Error types for board configuration.
//!
//! The simulation never clamps statistical inputs; anything outside its
//! preconditions is rejected here when configuration is applied.

use thiserror::Error;

/// Configuration violations
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Row count {value} is out of range [{min}, {max}]")]
    RowCountOutOfRange { value: u32, min: u32, max: u32 },

    #[error("Probability {value} is out of range [0.0, 1.0]")]
    ProbabilityOutOfRange { value: f64 },

    #[error("Bin index {index} is out of range for {bin_count} bins")]
    BinOutOfRange { index: usize, bin_count: usize },

    #[error("Batch launch size must be at least 1")]
    EmptyBatch,

    #[error("Launch cap '{cap}' must be at least 1")]
    ZeroCap { cap: &'static str },

    #[error("Invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to read settings: {0}")]
    Io(#[from] std::io::Error),
}
