//! Display unit conversions.
//!
//! Readings are always stored in canonical units (Celsius and Pascals);
//! everything shown to a user is derived through these enums.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const PSI_PER_PASCAL: f64 = 0.00014503773800722;
const PASCALS_PER_BAR: f64 = 100_000.0;
const PASCALS_PER_ATM: f64 = 101_325.0;

/// Unit used when displaying temperatures.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    /// Convert a canonical Celsius value into this unit.
    pub fn convert(self, celsius: f64) -> f64 {
        match self {
            Self::Celsius => celsius,
            Self::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
        }
    }

    /// Convert a value in this unit back to Celsius.
    pub fn to_celsius(self, value: f64) -> f64 {
        match self {
            Self::Celsius => value,
            Self::Fahrenheit => (value - 32.0) * 5.0 / 9.0,
        }
    }

    /// Short label used in log lines.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Celsius => "C",
            Self::Fahrenheit => "F",
        }
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for TemperatureUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "c" | "celsius" => Ok(Self::Celsius),
            "f" | "fahrenheit" => Ok(Self::Fahrenheit),
            other => Err(format!("unknown temperature unit '{}'", other)),
        }
    }
}

/// Unit used when displaying pressures.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum PressureUnit {
    #[default]
    Psi,
    Bar,
    Pa,
    Atm,
}

impl PressureUnit {
    /// Convert a canonical Pascal value into this unit.
    pub fn convert(self, pascals: f64) -> f64 {
        match self {
            Self::Psi => pascals * PSI_PER_PASCAL,
            Self::Bar => pascals / PASCALS_PER_BAR,
            Self::Pa => pascals,
            Self::Atm => pascals / PASCALS_PER_ATM,
        }
    }

    /// Convert a value in this unit back to Pascals.
    pub fn to_pascals(self, value: f64) -> f64 {
        match self {
            Self::Psi => value / PSI_PER_PASCAL,
            Self::Bar => value * PASCALS_PER_BAR,
            Self::Pa => value,
            Self::Atm => value * PASCALS_PER_ATM,
        }
    }

    /// Short label used in log lines.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Psi => "psi",
            Self::Bar => "bar",
            Self::Pa => "Pa",
            Self::Atm => "atm",
        }
    }
}

impl fmt::Display for PressureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for PressureUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "psi" => Ok(Self::Psi),
            "bar" => Ok(Self::Bar),
            "pa" => Ok(Self::Pa),
            "atm" => Ok(Self::Atm),
            other => Err(format!("unknown pressure unit '{}'", other)),
        }
    }
}
