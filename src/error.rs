//! Error handling for the bmx280 sampler crate.

use crate::sensor::SensorModel;

/// A specialized `Result` type for sampler operations.
pub type Result<T> = std::result::Result<T, SamplerError>;

/// The main error type for run-level sampler operations.
///
/// Per-attempt poll failures are not represented here: they are absorbed
/// by the sampling loop and only show up as a failed attempt.
#[derive(Debug, thiserror::Error)]
pub enum SamplerError {
    /// The run finished without a single successful read
    #[error("No successful reads out of {attempts} attempts")]
    NoData { attempts: u64 },

    /// A sample reported a different model than the one declared for the run
    #[error("Sample {index} reported model {found}, but the run was started on a {expected}")]
    InconsistentModel {
        expected: SensorModel,
        found: SensorModel,
        index: usize,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Sensor could not be opened or identified
    #[error("Sensor error: {0}")]
    Sensor(String),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SamplerError {
    /// Create a new configuration error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new sensor error
    pub fn sensor_error(msg: impl Into<String>) -> Self {
        Self::Sensor(msg.into())
    }

    /// Whether this error is the expected "nothing was collected" outcome
    /// rather than a fault.
    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData { .. })
    }
}
