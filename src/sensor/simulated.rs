//! Deterministic sensor port for running without hardware.

use crate::sensor::port::{PollFailure, SensorPort};
use crate::sensor::reading::{Reading, SensorModel};
use std::time::Duration;

/// A sensor that replays a fixed cycle of outcomes.
///
/// Used by the binary's `--simulate` mode, by the benchmarks and by
/// tests that need exact control over what each poll returns.
#[derive(Debug, Clone)]
pub struct SimulatedSensor {
    model: SensorModel,
    script: Vec<Result<Reading, PollFailure>>,
    position: usize,
    polls: u64,
    latency: Duration,
}

impl SimulatedSensor {
    /// Replay `script` in order, wrapping around at the end.
    ///
    /// An empty script makes every poll fail with `NotReady`.
    pub fn from_script(model: SensorModel, script: Vec<Result<Reading, PollFailure>>) -> Self {
        Self {
            model,
            script,
            position: 0,
            polls: 0,
            latency: Duration::ZERO,
        }
    }

    /// Succeed on every poll, cycling through the given temperatures.
    pub fn cycling_temperatures(model: SensorModel, temperatures_c: &[f64]) -> Self {
        let script = temperatures_c
            .iter()
            .map(|&t| Ok(reading(model, t, 45.0, 101_325.0)))
            .collect();
        Self::from_script(model, script)
    }

    /// Fail on every poll.
    pub fn always_failing(model: SensorModel) -> Self {
        Self::from_script(model, vec![Err(PollFailure::Timeout)])
    }

    /// A gently drifting indoor climate, one minute of readings long.
    ///
    /// When `fail_every` is set, every n-th poll times out.
    pub fn drifting(model: SensorModel, fail_every: Option<usize>) -> Self {
        let script = (0..60)
            .map(|i| {
                if let Some(n) = fail_every.filter(|&n| n > 0) {
                    if (i + 1) % n == 0 {
                        return Err(PollFailure::Timeout);
                    }
                }
                let phase = i as f64 / 60.0 * std::f64::consts::TAU;
                let temperature_c = 22.5 + 0.4 * phase.sin();
                let humidity = 41.0 + 1.5 * phase.cos();
                let pressure_pa = 101_200.0 + 35.0 * (phase * 2.0).sin();
                Ok(reading(model, temperature_c, humidity, pressure_pa))
            })
            .collect();
        Self::from_script(model, script)
    }

    /// Delay every poll by `latency`, as a slow bus would.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Number of polls served so far.
    pub fn polls(&self) -> u64 {
        self.polls
    }

    fn next_outcome(&mut self) -> Result<Reading, PollFailure> {
        self.polls += 1;
        if self.script.is_empty() {
            return Err(PollFailure::NotReady);
        }
        let outcome = self.script[self.position].clone();
        self.position = (self.position + 1) % self.script.len();
        outcome
    }
}

fn reading(model: SensorModel, temperature_c: f64, humidity_percent: f64, pressure_pa: f64) -> Reading {
    match model {
        SensorModel::Bme280 => Reading::Bme280 {
            temperature_c,
            humidity_percent,
            pressure_pa,
        },
        SensorModel::Bmp280 => Reading::Bmp280 {
            temperature_c,
            pressure_pa,
        },
    }
}

impl SensorPort for SimulatedSensor {
    fn model(&self) -> SensorModel {
        self.model
    }

    async fn poll(&mut self) -> Result<Reading, PollFailure> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.next_outcome()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_script_wraps_around() {
        let mut sensor = SimulatedSensor::cycling_temperatures(SensorModel::Bmp280, &[1.0, 2.0]);
        let temps: Vec<f64> = [
            sensor.poll().await.unwrap(),
            sensor.poll().await.unwrap(),
            sensor.poll().await.unwrap(),
        ]
        .iter()
        .map(Reading::temperature_c)
        .collect();
        assert_eq!(temps, vec![1.0, 2.0, 1.0]);
        assert_eq!(sensor.polls(), 3);
    }

    #[tokio::test]
    async fn test_empty_script_is_not_ready() {
        let mut sensor = SimulatedSensor::from_script(SensorModel::Bme280, Vec::new());
        assert_eq!(sensor.poll().await, Err(PollFailure::NotReady));
    }

    #[tokio::test]
    async fn test_drifting_failures() {
        let mut sensor = SimulatedSensor::drifting(SensorModel::Bme280, Some(3));
        let mut failures = 0;
        for _ in 0..60 {
            match sensor.poll().await {
                Ok(reading) => assert!(reading.humidity_percent().is_some()),
                Err(_) => failures += 1,
            }
        }
        assert_eq!(failures, 20);
    }
}
