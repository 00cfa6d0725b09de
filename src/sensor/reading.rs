//! Sensor models and the readings they produce.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Chip variant of a BMx280 sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
pub enum SensorModel {
    /// Temperature, humidity and pressure
    #[serde(rename = "BME280")]
    Bme280,
    /// Temperature and pressure only
    #[serde(rename = "BMP280")]
    Bmp280,
}

impl SensorModel {
    /// Whether readings from this model carry a humidity value.
    pub fn has_humidity(self) -> bool {
        matches!(self, Self::Bme280)
    }
}

impl fmt::Display for SensorModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bme280 => f.write_str("BME280"),
            Self::Bmp280 => f.write_str("BMP280"),
        }
    }
}

impl FromStr for SensorModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bme280" => Ok(Self::Bme280),
            "bmp280" => Ok(Self::Bmp280),
            other => Err(format!("unsupported sensor model '{}'", other)),
        }
    }
}

/// A single successful sensor read, in canonical units.
///
/// Humidity only exists on the BME280 variant, so a reading can never
/// disagree with its own model about whether humidity is present.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model")]
pub enum Reading {
    #[serde(rename = "BME280")]
    Bme280 {
        temperature_c: f64,
        humidity_percent: f64,
        pressure_pa: f64,
    },
    #[serde(rename = "BMP280")]
    Bmp280 { temperature_c: f64, pressure_pa: f64 },
}

impl Reading {
    /// Build a reading for `model`, dropping humidity on models without it.
    ///
    /// Returns `None` when a BME280 reading is requested without humidity.
    pub fn for_model(
        model: SensorModel,
        temperature_c: f64,
        humidity_percent: Option<f64>,
        pressure_pa: f64,
    ) -> Option<Self> {
        match model {
            SensorModel::Bme280 => Some(Self::Bme280 {
                temperature_c,
                humidity_percent: humidity_percent?,
                pressure_pa,
            }),
            SensorModel::Bmp280 => Some(Self::Bmp280 {
                temperature_c,
                pressure_pa,
            }),
        }
    }

    pub fn model(&self) -> SensorModel {
        match self {
            Self::Bme280 { .. } => SensorModel::Bme280,
            Self::Bmp280 { .. } => SensorModel::Bmp280,
        }
    }

    pub fn temperature_c(&self) -> f64 {
        match *self {
            Self::Bme280 { temperature_c, .. } | Self::Bmp280 { temperature_c, .. } => {
                temperature_c
            }
        }
    }

    pub fn humidity_percent(&self) -> Option<f64> {
        match *self {
            Self::Bme280 {
                humidity_percent, ..
            } => Some(humidity_percent),
            Self::Bmp280 { .. } => None,
        }
    }

    pub fn pressure_pa(&self) -> f64 {
        match *self {
            Self::Bme280 { pressure_pa, .. } | Self::Bmp280 { pressure_pa, .. } => pressure_pa,
        }
    }

    /// True when every field is a finite number.
    pub fn is_finite(&self) -> bool {
        self.temperature_c().is_finite()
            && self.pressure_pa().is_finite()
            && self.humidity_percent().map_or(true, f64::is_finite)
    }
}
