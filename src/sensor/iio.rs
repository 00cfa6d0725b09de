//! BME280/BMP280 access through the Linux industrial I/O subsystem.
//!
//! The kernel `bmp280` driver (SPI or I2C) performs the chip's calibration
//! compensation and exposes the results under
//! `/sys/bus/iio/devices/iio:deviceN/`:
//!
//! - `name`: `bme280` or `bmp280`
//! - `in_temp_input`: milli degrees Celsius
//! - `in_pressure_input`: kilopascals
//! - `in_humidityrelative_input`: milli percent relative humidity (BME280 only)

use crate::error::{Result, SamplerError};
use crate::sensor::port::{PollFailure, SensorPort};
use crate::sensor::reading::{Reading, SensorModel};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time;

/// Default location of IIO devices on Linux.
pub const DEFAULT_IIO_ROOT: &str = "/sys/bus/iio/devices";

/// Default upper bound for a single poll.
pub const DEFAULT_POLL_TIMEOUT_MS: u64 = 1000;

const TEMPERATURE_FILE: &str = "in_temp_input";
const PRESSURE_FILE: &str = "in_pressure_input";
const HUMIDITY_FILE: &str = "in_humidityrelative_input";

/// An IIO device directory that identified itself as a BMx280.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IioDevice {
    pub path: PathBuf,
    pub model: SensorModel,
}

/// List BMx280 devices below `root`, sorted by path.
///
/// Devices whose `name` is unreadable or not a BMx280 are skipped.
pub fn discover(root: impl AsRef<Path>) -> Result<Vec<IioDevice>> {
    let mut devices = Vec::new();

    for entry in std::fs::read_dir(root.as_ref())? {
        let path = entry?.path();
        if let Ok(model) = read_model(&path) {
            devices.push(IioDevice { path, model });
        }
    }

    devices.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(devices)
}

fn read_model(device: &Path) -> Result<SensorModel> {
    let name = std::fs::read_to_string(device.join("name"))?;
    name.parse::<SensorModel>().map_err(SamplerError::sensor_error)
}

/// Sensor port backed by an IIO sysfs directory.
#[derive(Debug, Clone)]
pub struct IioSensor {
    device: PathBuf,
    model: SensorModel,
    poll_timeout: Duration,
}

impl IioSensor {
    /// Open the device at `device`, identifying its model from `name`.
    pub fn open(device: impl Into<PathBuf>) -> Result<Self> {
        let device = device.into();
        let model = read_model(&device).map_err(|e| {
            SamplerError::sensor_error(format!(
                "{} is not a usable BMx280 device: {}",
                device.display(),
                e
            ))
        })?;

        tracing::debug!("Opened {} at {}", model, device.display());

        Ok(Self {
            device,
            model,
            poll_timeout: Duration::from_millis(DEFAULT_POLL_TIMEOUT_MS),
        })
    }

    /// Open the first BMx280 found below `root`.
    pub fn discover_first(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let device = discover(root)?.into_iter().next().ok_or_else(|| {
            SamplerError::sensor_error(format!("No BME280/BMP280 found under {}", root.display()))
        })?;
        Self::open(device.path)
    }

    /// Set the upper bound for a single poll.
    pub fn with_poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = timeout;
        self
    }

    pub fn device(&self) -> &Path {
        &self.device
    }

    async fn read_channel(&self, file: &str) -> std::result::Result<f64, PollFailure> {
        let raw = tokio::fs::read_to_string(self.device.join(file))
            .await
            .map_err(|e| PollFailure::Io(format!("{}: {}", file, e)))?;

        let value = raw
            .trim()
            .parse::<f64>()
            .map_err(|e| PollFailure::InvalidData(format!("{}: {:?} ({})", file, raw.trim(), e)))?;

        if value.is_finite() {
            Ok(value)
        } else {
            Err(PollFailure::InvalidData(format!("{}: non-finite value", file)))
        }
    }

    async fn read_once(&self) -> std::result::Result<Reading, PollFailure> {
        let temperature_c = self.read_channel(TEMPERATURE_FILE).await? / 1000.0;
        let pressure_pa = self.read_channel(PRESSURE_FILE).await? * 1000.0;

        let humidity_percent = if self.model.has_humidity() {
            Some(self.read_channel(HUMIDITY_FILE).await? / 1000.0)
        } else {
            None
        };

        Reading::for_model(self.model, temperature_c, humidity_percent, pressure_pa)
            .ok_or_else(|| PollFailure::InvalidData("missing humidity channel".to_string()))
    }
}

impl SensorPort for IioSensor {
    fn model(&self) -> SensorModel {
        self.model
    }

    async fn poll(&mut self) -> std::result::Result<Reading, PollFailure> {
        match time::timeout(self.poll_timeout, self.read_once()).await {
            Ok(result) => result,
            Err(_) => Err(PollFailure::Timeout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn fixture(label: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "bmx280_iio_{}_{}",
            label,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_device(root: &Path, name: &str, files: &[(&str, &str)]) -> PathBuf {
        let device = root.join(name);
        fs::create_dir_all(&device).unwrap();
        for (file, contents) in files {
            fs::write(device.join(file), contents).unwrap();
        }
        device
    }

    #[tokio::test]
    async fn test_bme280_poll() {
        let root = fixture("bme");
        let device = write_device(
            &root,
            "iio:device0",
            &[
                ("name", "bme280\n"),
                ("in_temp_input", "24310\n"),
                ("in_pressure_input", "101.325000000\n"),
                ("in_humidityrelative_input", "40125\n"),
            ],
        );

        let mut sensor = IioSensor::open(&device).unwrap();
        assert_eq!(sensor.model(), SensorModel::Bme280);

        let reading = sensor.poll().await.unwrap();
        assert!((reading.temperature_c() - 24.31).abs() < 1e-9);
        assert!((reading.pressure_pa() - 101_325.0).abs() < 1e-6);
        assert!((reading.humidity_percent().unwrap() - 40.125).abs() < 1e-9);

        fs::remove_dir_all(root).unwrap();
    }

    #[tokio::test]
    async fn test_bmp280_has_no_humidity() {
        let root = fixture("bmp");
        let device = write_device(
            &root,
            "iio:device1",
            &[
                ("name", "bmp280\n"),
                ("in_temp_input", "22000\n"),
                ("in_pressure_input", "99.5\n"),
            ],
        );

        let mut sensor = IioSensor::open(&device).unwrap();
        let reading = sensor.poll().await.unwrap();
        assert_eq!(reading.model(), SensorModel::Bmp280);
        assert_eq!(reading.humidity_percent(), None);

        fs::remove_dir_all(root).unwrap();
    }

    #[tokio::test]
    async fn test_bad_channel_is_a_poll_failure() {
        let root = fixture("bad");
        let device = write_device(
            &root,
            "iio:device0",
            &[
                ("name", "bmp280\n"),
                ("in_temp_input", "garbage\n"),
                ("in_pressure_input", "99.5\n"),
            ],
        );

        let mut sensor = IioSensor::open(&device).unwrap();
        assert!(matches!(sensor.poll().await, Err(PollFailure::InvalidData(_))));

        fs::remove_file(device.join("in_temp_input")).unwrap();
        assert!(matches!(sensor.poll().await, Err(PollFailure::Io(_))));

        fs::remove_dir_all(root).unwrap();
    }

    #[test]
    fn test_discover_skips_other_devices() {
        let root = fixture("discover");
        write_device(&root, "iio:device0", &[("name", "ads1015\n")]);
        write_device(&root, "iio:device1", &[("name", "bme280\n")]);
        write_device(&root, "iio:device2", &[]);

        let devices = discover(&root).unwrap();
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].model, SensorModel::Bme280);
        assert!(devices[0].path.ends_with("iio:device1"));

        let sensor = IioSensor::discover_first(&root).unwrap();
        assert_eq!(sensor.model(), SensorModel::Bme280);

        fs::remove_dir_all(root).unwrap();
    }

    #[test]
    fn test_open_rejects_unknown_chip() {
        let root = fixture("unknown");
        let device = write_device(&root, "iio:device0", &[("name", "bme680\n")]);

        let err = IioSensor::open(&device).unwrap_err();
        assert!(err.to_string().contains("not a usable BMx280"));

        fs::remove_dir_all(root).unwrap();
    }
}
