//! Text rendering of readings and run summaries.

use crate::error::{Result, SamplerError};
use crate::sampling::aggregator::{round_to, summarize, Stats, Summary};
use crate::sampling::config::RunConfig;
use crate::sampling::emit::LineSink;
use crate::sampling::sampler::RunResult;
use crate::sensor::Reading;

const FAILED_READING: &str = "Failed reading!";

/// Renders the lines the sampler and the end-of-run report emit.
pub struct SummaryFormatter;

impl SummaryFormatter {
    /// One successful reading in the run's display units.
    pub fn sample_line(reading: &Reading, config: &RunConfig) -> String {
        let temperature = config.temperature_unit.convert(reading.temperature_c());
        let pressure = config.pressure_unit.convert(reading.pressure_pa());

        match reading.humidity_percent() {
            Some(humidity) => format!(
                "{}: {:.2} deg {}, {:.2} %, {:.2} {}",
                reading.model(),
                temperature,
                config.temperature_unit,
                humidity,
                pressure,
                config.pressure_unit
            ),
            None => format!(
                "{}: {:.2} deg {}, {:.2} {}",
                reading.model(),
                temperature,
                config.temperature_unit,
                pressure,
                config.pressure_unit
            ),
        }
    }

    /// The warning emitted for a failed poll.
    pub fn failure_line() -> &'static str {
        FAILED_READING
    }

    /// Success rate as a percentage, rounded to four decimals of the ratio.
    pub fn rate_percent(successes: u64, attempts: u64) -> f64 {
        if attempts == 0 {
            return 0.0;
        }
        round_to(successes as f64 / attempts as f64, 4) * 100.0
    }

    /// The end-of-run line for a run that produced samples.
    pub fn summary_line(summary: &Summary) -> String {
        let t = summary.temperature.rounded();
        let p = summary.pressure.rounded();

        let humidity = summary
            .humidity
            .map(|h| {
                let h = h.rounded();
                format!("Humidity (min/avg/max): {} %, ", triple(&h))
            })
            .unwrap_or_default();

        format!(
            "{}/{} ({:.2}%): Temps (min/avg/max): {} deg {}, {}Pressure (min/avg/max): {} {}",
            summary.successes,
            summary.attempts,
            Self::rate_percent(summary.successes, summary.attempts),
            triple(&t),
            summary.temperature_unit,
            humidity,
            triple(&p),
            summary.pressure_unit
        )
    }

    /// The end-of-run line for a run without a single sample.
    pub fn no_data_line(attempts: u64) -> String {
        format!("No successful reads out of {} attempts!", attempts)
    }

    /// Summarize `result` and emit the matching end-of-run line.
    ///
    /// Summaries go out as info, an empty run and a model mismatch as
    /// errors. The aggregation outcome is returned either way.
    pub fn report<S: LineSink>(result: &RunResult, config: &RunConfig, sink: &mut S) -> Result<Summary> {
        let outcome = summarize(result, config);
        match &outcome {
            Ok(summary) => sink.info(&Self::summary_line(summary)),
            Err(SamplerError::NoData { attempts }) => sink.error(&Self::no_data_line(*attempts)),
            Err(other) => sink.error(&other.to_string()),
        }
        outcome
    }
}

fn triple(stats: &Stats) -> String {
    format!("{:.2}/{:.2}/{:.2}", stats.min, stats.avg, stats.max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::emit::{LineLevel, MemorySink};
    use crate::sampling::sampler::Termination;
    use crate::sensor::{PressureUnit, SensorModel, TemperatureUnit};

    fn summary(humidity: Option<Stats>) -> Summary {
        Summary {
            model: if humidity.is_some() {
                SensorModel::Bme280
            } else {
                SensorModel::Bmp280
            },
            attempts: 10,
            successes: 10,
            success_rate: 1.0,
            temperature: Stats {
                min: 75.7412,
                avg: 75.7689,
                max: 75.7911,
            },
            temperature_unit: TemperatureUnit::Fahrenheit,
            humidity,
            pressure: Stats {
                min: 14.0512,
                avg: 14.0561,
                max: 14.0573,
            },
            pressure_unit: PressureUnit::Psi,
            termination: Termination::Completed,
        }
    }

    #[test]
    fn test_summary_line_with_humidity() {
        let line = SummaryFormatter::summary_line(&summary(Some(Stats {
            min: 24.94,
            avg: 24.953,
            max: 24.98,
        })));
        assert_eq!(
            line,
            "10/10 (100.00%): Temps (min/avg/max): 75.74/75.77/75.79 deg F, \
             Humidity (min/avg/max): 24.94/24.95/24.98 %, \
             Pressure (min/avg/max): 14.05/14.06/14.06 psi"
        );
    }

    #[test]
    fn test_summary_line_without_humidity() {
        let line = SummaryFormatter::summary_line(&summary(None));
        assert!(!line.contains("Humidity"));
        assert!(line.contains("deg F, Pressure (min/avg/max): 14.05/14.06/14.06 psi"));
    }

    #[test]
    fn test_rate_percent() {
        assert_eq!(SummaryFormatter::rate_percent(10, 10), 100.0);
        assert!((SummaryFormatter::rate_percent(2, 3) - 66.67).abs() < 1e-9);
        assert_eq!(SummaryFormatter::rate_percent(0, 0), 0.0);
    }

    #[test]
    fn test_sample_lines() {
        let config = RunConfig::default().with_pressure_unit(PressureUnit::Pa);
        let bme = Reading::Bme280 {
            temperature_c: 24.3,
            humidity_percent: 40.126,
            pressure_pa: 101_325.0,
        };
        assert_eq!(
            SummaryFormatter::sample_line(&bme, &config),
            "BME280: 24.30 deg C, 40.13 %, 101325.00 Pa"
        );

        let bmp = Reading::Bmp280 {
            temperature_c: 24.3,
            pressure_pa: 101_325.0,
        };
        assert_eq!(
            SummaryFormatter::sample_line(&bmp, &config),
            "BMP280: 24.30 deg C, 101325.00 Pa"
        );
    }

    #[test]
    fn test_report_no_data() {
        let result = RunResult::from_samples(SensorModel::Bmp280, 7, Vec::new());
        let mut sink = MemorySink::new();

        let outcome = SummaryFormatter::report(&result, &RunConfig::default(), &mut sink);
        assert!(outcome.unwrap_err().is_no_data());
        assert_eq!(sink.at(LineLevel::Error), vec!["No successful reads out of 7 attempts!"]);
        assert!(sink.at(LineLevel::Info).is_empty());
    }
}
