//! Turns a finished run into min/avg/max statistics.

use crate::error::{Result, SamplerError};
use crate::sampling::config::RunConfig;
use crate::sampling::sampler::{RunResult, Termination};
use crate::sensor::{PressureUnit, SensorModel, TemperatureUnit};
use serde::{Deserialize, Serialize};

/// Minimum, mean and maximum of one measured quantity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub min: f64,
    pub avg: f64,
    pub max: f64,
}

impl Stats {
    /// Statistics over `values`, or `None` when there are none.
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        let mut count = 0usize;
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;

        for value in values {
            count += 1;
            sum += value;
            min = min.min(value);
            max = max.max(value);
        }

        if count == 0 {
            return None;
        }

        // Summation error can push the mean a hair outside [min, max].
        // NaN inputs leave min > max, where clamping is undefined.
        let mut avg = sum / count as f64;
        if avg.is_finite() && min <= max {
            avg = avg.clamp(min, max);
        }
        Some(Self { min, avg, max })
    }

    /// The same statistics rounded to two decimals for display.
    pub fn rounded(&self) -> Self {
        Self {
            min: round_to(self.min, 2),
            avg: round_to(self.avg, 2),
            max: round_to(self.max, 2),
        }
    }
}

/// Round `value` to `decimals` decimal places, halves away from zero.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Aggregate view of a run, in the configured display units.
///
/// Values are kept at full precision; rounding happens when rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub model: SensorModel,
    pub attempts: u64,
    pub successes: u64,
    /// Fraction of attempts that produced a sample (0.0 to 1.0)
    pub success_rate: f64,
    pub temperature: Stats,
    pub temperature_unit: TemperatureUnit,
    /// Present only for models that measure humidity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub humidity: Option<Stats>,
    pub pressure: Stats,
    pub pressure_unit: PressureUnit,
    pub termination: Termination,
}

/// Summarize a finished run.
///
/// Fails with [`SamplerError::NoData`] when nothing was collected and with
/// [`SamplerError::InconsistentModel`] when a sample disagrees with the
/// run's declared model.
pub fn summarize(result: &RunResult, config: &RunConfig) -> Result<Summary> {
    let samples = result.samples();

    let success_rate = match result.success_rate() {
        Some(rate) if !samples.is_empty() => rate,
        _ => {
            return Err(SamplerError::NoData {
                attempts: result.attempts(),
            })
        }
    };

    let model = result.model();
    if let Some((index, reading)) = samples
        .iter()
        .enumerate()
        .find(|(_, reading)| reading.model() != model)
    {
        return Err(SamplerError::InconsistentModel {
            expected: model,
            found: reading.model(),
            index,
        });
    }

    let temperature_unit = config.temperature_unit;
    let pressure_unit = config.pressure_unit;

    let temperature = Stats::from_values(
        samples
            .iter()
            .map(|r| temperature_unit.convert(r.temperature_c())),
    );
    let pressure = Stats::from_values(samples.iter().map(|r| pressure_unit.convert(r.pressure_pa())));
    let humidity = if model.has_humidity() {
        Stats::from_values(samples.iter().filter_map(|r| r.humidity_percent()))
    } else {
        None
    };

    let (Some(temperature), Some(pressure)) = (temperature, pressure) else {
        return Err(SamplerError::NoData {
            attempts: result.attempts(),
        });
    };

    Ok(Summary {
        model,
        attempts: result.attempts(),
        successes: result.successes(),
        success_rate,
        temperature,
        temperature_unit,
        humidity,
        pressure,
        pressure_unit,
        termination: result.termination(),
    })
}
