//! Run configuration.

use crate::error::{Result, SamplerError};
use crate::sensor::{PressureUnit, TemperatureUnit};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Configuration for a single sampling run.
///
/// All defaults are resolved when the value is built; the sampling loop
/// never looks anything up while it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Total wall-clock budget of the run in seconds (must be > 0)
    pub duration_secs: u64,
    /// Minimum spacing between poll attempts in seconds
    pub interval_secs: u64,
    /// Unit for displayed temperatures
    pub temperature_unit: TemperatureUnit,
    /// Unit for displayed pressures
    pub pressure_unit: PressureUnit,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            duration_secs: crate::DEFAULT_DURATION_SECS,
            interval_secs: crate::DEFAULT_INTERVAL_SECS,
            temperature_unit: TemperatureUnit::Celsius,
            pressure_unit: PressureUnit::Psi,
        }
    }
}

impl RunConfig {
    /// Create a run configuration with custom duration and interval.
    pub fn new(duration_secs: u64, interval_secs: u64) -> Self {
        Self {
            duration_secs,
            interval_secs,
            ..Default::default()
        }
    }

    /// Load a configuration from a JSON file. Missing keys keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()
    }

    /// Set the run duration.
    pub fn with_duration_secs(mut self, secs: u64) -> Self {
        self.duration_secs = secs;
        self
    }

    /// Set the poll interval.
    pub fn with_interval_secs(mut self, secs: u64) -> Self {
        self.interval_secs = secs;
        self
    }

    /// Set the temperature display unit.
    pub fn with_temperature_unit(mut self, unit: TemperatureUnit) -> Self {
        self.temperature_unit = unit;
        self
    }

    /// Set the pressure display unit.
    pub fn with_pressure_unit(mut self, unit: PressureUnit) -> Self {
        self.pressure_unit = unit;
        self
    }

    /// Check the configuration, returning it unchanged when usable.
    pub fn validate(self) -> Result<Self> {
        if self.duration_secs == 0 {
            return Err(SamplerError::config_error(
                "run duration must be at least one second",
            ));
        }
        Ok(self)
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.duration_secs)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RunConfig::default();
        assert_eq!(config.duration_secs, 120);
        assert_eq!(config.interval_secs, 1);
        assert_eq!(config.temperature_unit, TemperatureUnit::Celsius);
        assert_eq!(config.pressure_unit, PressureUnit::Psi);
    }

    #[test]
    fn test_zero_duration_rejected() {
        let err = RunConfig::new(0, 1).validate().unwrap_err();
        assert!(matches!(err, SamplerError::Config(_)));
        assert!(RunConfig::new(1, 0).validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: RunConfig =
            serde_json::from_str(r#"{"duration_secs": 10, "pressure_unit": "atm"}"#).unwrap();
        assert_eq!(config.duration_secs, 10);
        assert_eq!(config.interval_secs, 1);
        assert_eq!(config.pressure_unit, PressureUnit::Atm);
        assert_eq!(config.temperature_unit, TemperatureUnit::Celsius);
    }

    #[test]
    fn test_json_file_loading() {
        let path = std::env::temp_dir().join(format!("bmx280_config_{}.json", std::process::id()));
        std::fs::write(&path, r#"{"interval_secs": 5, "temperature_unit": "fahrenheit"}"#).unwrap();

        let config = RunConfig::from_json_file(&path).unwrap();
        assert_eq!(config.interval_secs, 5);
        assert_eq!(config.temperature_unit, TemperatureUnit::Fahrenheit);

        std::fs::write(&path, r#"{"duration_secs": 0}"#).unwrap();
        assert!(RunConfig::from_json_file(&path).is_err());

        std::fs::remove_file(path).unwrap();
    }
}
