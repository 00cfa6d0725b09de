//! Sensor-facing types: readings, units and the ports that produce them.
//!
//! The sampling loop only sees [`SensorPort`]. Concrete ports live here
//! too: an IIO sysfs reader for real hardware and a scripted simulator.

pub mod iio;
pub mod port;
pub mod reading;
pub mod simulated;
pub mod units;

// Re-export commonly used items
pub use iio::IioSensor;
pub use port::{PollFailure, SensorPort};
pub use reading::{Reading, SensorModel};
pub use simulated::SimulatedSensor;
pub use units::{PressureUnit, TemperatureUnit};
