use std::env;
use std::path::PathBuf;

use thiserror::Error;

use tank_level::sensor::ProcFile;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
  #[error("invalid value '{value}' for {key}")]
  Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SensorKind {
  /// Text file published by the kernel driver.
  Proc(PathBuf),
  /// HC-SR04 driven directly over GPIO.
  Gpio,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
  pub sensor: SensorKind,
  pub i2c_bus: u8,
}

impl Config {
  pub fn from_env() -> Result<Self, ConfigError> {
    Self::from_lookup(|key| env::var(key).ok())
  }

  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
    let path = lookup("TANK_SENSOR_PATH").map(PathBuf::from).unwrap_or_else(|| PathBuf::from(ProcFile::DEFAULT_PATH));

    let sensor = match lookup("TANK_SENSOR").as_deref() {
      None | Some("proc") => SensorKind::Proc(path),
      Some("gpio") => SensorKind::Gpio,
      Some(value) => return Err(ConfigError::Invalid { key: "TANK_SENSOR", value: value.to_owned() }),
    };

    let i2c_bus = match lookup("TANK_I2C_BUS") {
      None => 1,
      Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid { key: "TANK_I2C_BUS", value })?,
    };

    Ok(Self { sensor, i2c_bus })
  }
}
