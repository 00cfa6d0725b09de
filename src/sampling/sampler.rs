//! The deadline-driven polling loop.

use crate::sampling::cancel::CancelSignal;
use crate::sampling::config::RunConfig;
use crate::sampling::emit::LineSink;
use crate::sampling::summary::SummaryFormatter;
use crate::sensor::{Reading, SensorModel, SensorPort};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::{self, Instant};

/// Stand-in deadline for durations too large to add to the clock.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Termination {
    /// The deadline was reached
    Completed,
    /// Cancellation was requested before the deadline
    Cancelled,
}

/// Everything a run collected.
///
/// Only the sampler records into a `RunResult`; once returned it is
/// read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    model: SensorModel,
    attempts: u64,
    samples: Vec<Reading>,
    termination: Termination,
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
}

impl RunResult {
    pub(crate) fn start(model: SensorModel) -> Self {
        let now = Utc::now();
        Self {
            model,
            attempts: 0,
            samples: Vec::new(),
            termination: Termination::Completed,
            started_at: now,
            finished_at: now,
        }
    }

    /// Build a finished result directly, for callers that collected samples elsewhere.
    pub fn from_samples(model: SensorModel, attempts: u64, samples: Vec<Reading>) -> Self {
        let mut result = Self::start(model);
        result.attempts = attempts.max(samples.len() as u64);
        result.samples = samples;
        result
    }

    fn record_attempt(&mut self) {
        self.attempts += 1;
    }

    fn record_sample(&mut self, reading: Reading) {
        self.samples.push(reading);
    }

    fn finish(&mut self, termination: Termination) {
        self.termination = termination;
        self.finished_at = Utc::now();
    }

    /// Model declared by the sensor when the run started.
    pub fn model(&self) -> SensorModel {
        self.model
    }

    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    pub fn successes(&self) -> u64 {
        self.samples.len() as u64
    }

    /// Successful readings in poll order.
    pub fn samples(&self) -> &[Reading] {
        &self.samples
    }

    pub fn termination(&self) -> Termination {
        self.termination
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn finished_at(&self) -> DateTime<Utc> {
        self.finished_at
    }

    /// `successes / attempts`, or `None` before the first attempt.
    pub fn success_rate(&self) -> Option<f64> {
        if self.attempts == 0 {
            None
        } else {
            Some(self.successes() as f64 / self.attempts as f64)
        }
    }
}

/// Drives a timed sampling run against a single sensor.
#[derive(Debug, Clone)]
pub struct Sampler {
    config: RunConfig,
}

impl Sampler {
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Poll `port` until the deadline passes or `cancel` is raised.
    ///
    /// Individual poll failures are reported to `sink` and counted as
    /// attempts; they never end the run early.
    pub async fn run<P, S>(&self, port: &mut P, cancel: &mut CancelSignal, sink: &mut S) -> RunResult
    where
        P: SensorPort,
        S: LineSink,
    {
        let interval = self.config.interval();
        let mut result = RunResult::start(port.model());

        sink.info(&format!(
            "Starting run on {}. Will run for {} seconds",
            result.model(),
            self.config.duration_secs
        ));

        let started = Instant::now();
        let deadline = started
            .checked_add(self.config.duration())
            .unwrap_or_else(|| started + FAR_FUTURE);
        let mut termination = Termination::Completed;

        while Instant::now() < deadline {
            if cancel.is_cancelled() {
                termination = Termination::Cancelled;
                break;
            }

            result.record_attempt();
            let polled_at = Instant::now();
            match port.poll().await {
                Ok(reading) => {
                    sink.info(&SummaryFormatter::sample_line(&reading, &self.config));
                    result.record_sample(reading);
                }
                Err(failure) => {
                    tracing::debug!("Poll {} failed: {}", result.attempts(), failure);
                    sink.warn(SummaryFormatter::failure_line());
                }
            }
            tracing::debug!(
                "Poll {} took {:?}",
                result.attempts(),
                polled_at.elapsed()
            );

            // Never sleep past the deadline.
            if interval >= deadline.saturating_duration_since(Instant::now()) {
                break;
            }
            if interval.is_zero() {
                continue;
            }

            tokio::select! {
                _ = time::sleep(interval) => {}
                _ = cancel.cancelled() => {
                    termination = Termination::Cancelled;
                    break;
                }
            }
        }

        if termination == Termination::Cancelled {
            sink.warn(&format!(
                "Run cancelled after {} attempts",
                result.attempts()
            ));
        }

        result.finish(termination);
        result
    }
}
