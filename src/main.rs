//! bmx280 sampler binary
//!
//! Runs a timed BME280/BMP280 test and logs a min/avg/max summary.

use anyhow::Context;
use bmx280_sampler::sensor::iio::{self, DEFAULT_IIO_ROOT, DEFAULT_POLL_TIMEOUT_MS};
use bmx280_sampler::{
    cancel_pair, IioSensor, PressureUnit, RunConfig, Sampler, SensorModel, SensorPort,
    SimulatedSensor, Summary, SummaryFormatter, TemperatureUnit, TracingSink,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;
use tracing::{info, warn, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "bmx280_sampler")]
#[command(about = "Timed BME280/BMP280 test run with a min/avg/max summary")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    long_about = "Start a BME280/BMP280 test run. The exact model is read from the device when it is opened."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    run: RunArgs,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Only log warnings and errors; the summary line goes to stdout instead
    #[arg(short, long, global = true, conflicts_with = "debug")]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List BME280/BMP280 devices known to the IIO subsystem
    Devices {
        /// IIO device directory to scan
        #[arg(long, default_value = DEFAULT_IIO_ROOT)]
        iio_root: PathBuf,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Time in seconds to run the test [default: 120]
    #[arg(long = "time", value_name = "SECONDS")]
    duration: Option<u64>,

    /// Interval in seconds between reads [default: 1]
    #[arg(long, value_name = "SECONDS")]
    interval: Option<u64>,

    /// Print temperatures in Fahrenheit rather than Celsius
    #[arg(long)]
    temp_f: bool,

    /// Pressure unit for the summary [default: psi]
    #[arg(long, value_enum)]
    pressure: Option<PressureUnit>,

    /// JSON file with run settings; command line flags take precedence
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// IIO device directory of the sensor (e.g. /sys/bus/iio/devices/iio:device0)
    #[arg(long, conflicts_with = "simulate")]
    device: Option<PathBuf>,

    /// IIO device directory to search when --device is not given
    #[arg(long, default_value = DEFAULT_IIO_ROOT)]
    iio_root: PathBuf,

    /// Upper bound for a single sensor read in milliseconds
    #[arg(long, default_value_t = DEFAULT_POLL_TIMEOUT_MS)]
    poll_timeout_ms: u64,

    /// Use a simulated sensor of the given model instead of hardware
    #[arg(long, value_enum)]
    simulate: Option<SensorModel>,

    /// Make every n-th simulated read fail
    #[arg(long, requires = "simulate", value_name = "N")]
    simulate_fail_every: Option<usize>,

    /// Output format for the summary
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Log the summary line only
    Text,
    /// Also print the summary as JSON on stdout
    Json,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    init_logging(&cli)?;

    match &cli.command {
        Some(Commands::Devices { iio_root }) => devices_command(iio_root),
        None => run_command(&cli.run, cli.quiet).await,
    }
}

fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    let level = if cli.debug {
        Level::DEBUG
    } else if cli.quiet {
        Level::WARN
    } else {
        Level::INFO
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_ascii_lowercase()));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}

/// Resolve the run configuration: defaults, then the config file, then flags.
fn resolve_config(args: &RunArgs) -> anyhow::Result<RunConfig> {
    let mut config = match &args.config {
        Some(path) => RunConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => RunConfig::default(),
    };

    if let Some(duration) = args.duration {
        config = config.with_duration_secs(duration);
    }
    if let Some(interval) = args.interval {
        config = config.with_interval_secs(interval);
    }
    if args.temp_f {
        config = config.with_temperature_unit(TemperatureUnit::Fahrenheit);
    }
    if let Some(pressure) = args.pressure {
        config = config.with_pressure_unit(pressure);
    }

    Ok(config.validate()?)
}

async fn run_command(args: &RunArgs, quiet: bool) -> anyhow::Result<ExitCode> {
    let config = resolve_config(args)?;

    if let Some(model) = args.simulate {
        info!("Using a simulated {}", model);
        let mut sensor = SimulatedSensor::drifting(model, args.simulate_fail_every);
        return sample(&mut sensor, config, args.format, quiet).await;
    }

    let sensor = match &args.device {
        Some(device) => IioSensor::open(device)?,
        None => IioSensor::discover_first(&args.iio_root)?,
    };
    info!("Using {} at {}", sensor.model(), sensor.device().display());

    let mut sensor = sensor.with_poll_timeout(Duration::from_millis(args.poll_timeout_ms));
    sample(&mut sensor, config, args.format, quiet).await
}

async fn sample<P: SensorPort>(
    sensor: &mut P,
    config: RunConfig,
    format: OutputFormat,
    quiet: bool,
) -> anyhow::Result<ExitCode> {
    let (handle, mut signal) = cancel_pair();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Keyboard interrupt!");
            handle.cancel();
        }
    });

    let result = Sampler::new(config)
        .run(sensor, &mut signal, &mut TracingSink)
        .await;

    match SummaryFormatter::report(&result, &config, &mut TracingSink) {
        Ok(summary) => {
            if let Some(output) = stdout_summary(&summary, format, quiet)? {
                println!("{}", output);
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(e) if e.is_no_data() => Ok(ExitCode::FAILURE),
        Err(e) => Err(e.into()),
    }
}

/// What a finished run prints on stdout, next to the log.
///
/// In quiet mode the info-level summary line is filtered out of the log,
/// so it is printed here instead.
fn stdout_summary(
    summary: &Summary,
    format: OutputFormat,
    quiet: bool,
) -> anyhow::Result<Option<String>> {
    match format {
        OutputFormat::Json => Ok(Some(serde_json::to_string_pretty(summary)?)),
        OutputFormat::Text if quiet => Ok(Some(SummaryFormatter::summary_line(summary))),
        OutputFormat::Text => Ok(None),
    }
}

fn devices_command(iio_root: &Path) -> anyhow::Result<ExitCode> {
    let devices = iio::discover(iio_root)
        .with_context(|| format!("Failed to scan {}", iio_root.display()))?;

    if devices.is_empty() {
        println!("No BME280/BMP280 devices found under {}", iio_root.display());
        return Ok(ExitCode::FAILURE);
    }

    for device in devices {
        println!("{}: {}", device.path.display(), device.model);
    }

    Ok(ExitCode::SUCCESS)
}
