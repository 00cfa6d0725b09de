//! The sampling-and-aggregation core.
//!
//! A [`Sampler`] polls a sensor on a fixed interval until its deadline
//! passes or the run is cancelled, [`summarize`] reduces the collected
//! readings to min/avg/max statistics, and [`SummaryFormatter`] renders
//! the lines a run emits.

pub mod aggregator;
pub mod cancel;
pub mod config;
pub mod emit;
pub mod sampler;
pub mod summary;

// Re-export commonly used items
pub use aggregator::{summarize, Stats, Summary};
pub use cancel::{cancel_pair, CancelHandle, CancelSignal};
pub use config::RunConfig;
pub use emit::{LineLevel, LineSink, MemorySink, TracingSink};
pub use sampler::{RunResult, Sampler, Termination};
pub use summary::SummaryFormatter;
