//! # bmx280 sampler - timed BME280/BMP280 test runs
//!
//! Polls a BME280 or BMP280 environmental sensor at a fixed interval for a
//! fixed time, tolerating failed reads, and reports min/avg/max
//! temperature, humidity (BME280 only) and pressure in the units you ask
//! for.
//!
//! ## Features
//!
//! - **Deadline-driven sampling**: never sleeps past the end of the run
//! - **Failure tolerant**: failed reads are counted, not fatal
//! - **Cancellable**: a cancelled run still produces a summary of what it got
//! - **Unit selection**: Celsius/Fahrenheit and psi/bar/Pa/atm
//! - **Linux IIO support**: reads sensors bound to the kernel `bmp280` driver
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bmx280_sampler::{
//!     CancelSignal, IioSensor, RunConfig, Sampler, SummaryFormatter, TracingSink,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RunConfig::new(10, 1).validate()?;
//!     let mut sensor = IioSensor::discover_first("/sys/bus/iio/devices")?;
//!
//!     let result = Sampler::new(config)
//!         .run(&mut sensor, &mut CancelSignal::never(), &mut TracingSink)
//!         .await;
//!     SummaryFormatter::report(&result, &config, &mut TracingSink)?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod sampling;
pub mod sensor;

// Re-export public API
pub use error::{Result, SamplerError};
pub use sampling::{
    cancel_pair, summarize, CancelHandle, CancelSignal, LineSink, RunConfig, RunResult, Sampler,
    Stats, Summary, SummaryFormatter, Termination, TracingSink,
};
pub use sensor::{
    IioSensor, PollFailure, PressureUnit, Reading, SensorModel, SensorPort, SimulatedSensor,
    TemperatureUnit,
};

/// The default run duration in seconds
pub const DEFAULT_DURATION_SECS: u64 = 120;

/// The default interval between polls in seconds
pub const DEFAULT_INTERVAL_SECS: u64 = 1;
