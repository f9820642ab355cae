use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use hc_sr04::HcSr04;
use log::debug;
use thiserror::Error;

/// Raw range from the sensor to the water surface, in centimeters.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Distance(f64);

impl Distance {
  pub fn from_centimeters(cm: f64) -> Self {
    Distance(cm)
  }

  pub fn as_centimeters(&self) -> f64 {
    self.0
  }
}

impl fmt::Display for Distance {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{:.2} cm", self.0)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cause {
  Unreachable,
  Empty,
  Unparsable,
  OutOfRange,
}

impl fmt::Display for Cause {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    f.write_str(match self {
      Cause::Unreachable => "no sensor",
      Cause::Empty => "empty reading",
      Cause::Unparsable => "bad reading",
      Cause::OutOfRange => "out of range",
    })
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SensorError {
  #[error("sensor unavailable: {0}")]
  Unavailable(Cause),
}

/// Anything that can hand out the latest distance as text.
pub trait SensorSource {
  type Error: fmt::Display;

  fn read_value(&mut self) -> Result<String, Self::Error>;
}

/// A file holding the current distance, re-read on every call. The kernel
/// driver publishes its measurement this way.
#[derive(Debug, Clone)]
pub struct ProcFile {
  path: PathBuf,
}

impl ProcFile {
  pub const DEFAULT_PATH: &'static str = "/proc/hc_sr04_distance";

  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }
}

impl SensorSource for ProcFile {
  type Error = io::Error;

  fn read_value(&mut self) -> Result<String, io::Error> {
    fs::read_to_string(&self.path)
  }
}

#[derive(Debug, Error)]
#[error("echo measurement failed: {0:?}")]
pub struct EchoError(hc_sr04::Error);

/// Measures directly with an HC-SR04 on GPIO, one ping per read.
#[derive(Debug)]
pub struct Echo {
  sensor: HcSr04,
}

impl Echo {
  pub fn new(sensor: HcSr04) -> Self {
    Self { sensor }
  }
}

impl SensorSource for Echo {
  type Error = EchoError;

  fn read_value(&mut self) -> Result<String, EchoError> {
    let cm = self.sensor.measure().map_err(EchoError)?;
    Ok(format!("{:.1}", cm.into_inner()))
  }
}

/// Extracts a distance from text such as `"30"`, `"30.5\n"` or
/// `"Measured distance: 30 cm"`. Exactly one number must be present.
pub fn parse_distance(text: &str) -> Result<Distance, SensorError> {
  let text = text.trim();

  if text.is_empty() {
    return Err(SensorError::Unavailable(Cause::Empty))
  }

  let cm = match text.parse::<f64>() {
    Ok(cm) => cm,
    Err(_) => {
      let mut numbers = text.split_whitespace().filter_map(|token| token.parse::<f64>().ok());

      match (numbers.next(), numbers.next()) {
        (Some(cm), None) => cm,
        _ => return Err(SensorError::Unavailable(Cause::Unparsable)),
      }
    },
  };

  if !cm.is_finite() || cm < 0.0 {
    return Err(SensorError::Unavailable(Cause::OutOfRange))
  }

  Ok(Distance::from_centimeters(cm))
}

/// Pulls one reading per call from its source. No retries; the next cycle is
/// the retry.
#[derive(Debug)]
pub struct DistanceReader<S> {
  source: S,
}

impl<S: SensorSource> DistanceReader<S> {
  pub fn new(source: S) -> Self {
    Self { source }
  }

  pub fn read(&mut self) -> Result<Distance, SensorError> {
    let text = self.source.read_value().map_err(|err| {
      debug!("Reading sensor failed: {}", err);
      SensorError::Unavailable(Cause::Unreachable)
    })?;

    parse_distance(&text)
  }
}
