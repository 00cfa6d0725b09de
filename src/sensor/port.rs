//! The capability the sampling loop needs from a sensor driver.

use crate::sensor::reading::{Reading, SensorModel};

/// Why a single poll produced no data.
///
/// The sampling loop treats every variant the same way; the distinction
/// only matters for debug logging.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PollFailure {
    /// The driver did not answer within its timeout
    #[error("sensor read timed out")]
    Timeout,

    /// The underlying bus or file access failed
    #[error("sensor I/O failed: {0}")]
    Io(String),

    /// The driver answered with something that is not a valid reading
    #[error("invalid sensor data: {0}")]
    InvalidData(String),

    /// The sensor has no fresh measurement yet
    #[error("sensor not ready")]
    NotReady,
}

/// A sensor that can be polled for readings.
///
/// Implementations own the transport and protocol decoding. The model is
/// identified once when the port is opened and must stay the same for
/// every reading it returns.
pub trait SensorPort {
    /// The chip variant identified when the port was opened.
    fn model(&self) -> SensorModel;

    /// Take one reading.
    fn poll(&mut self) -> impl std::future::Future<Output = Result<Reading, PollFailure>> + Send;
}
