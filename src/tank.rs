use measurements::{Length, Volume};
use thiserror::Error;
use vessel::{CylindricalTank, Tank};

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CalibrationError {
  #[error("invalid range [{min}, {max}]")]
  InvalidRange { min: f64, max: f64 },
  #[error("invalid step {0}")]
  InvalidStep(f64),
  #[error("invalid tank dimension {0} m")]
  InvalidDimension(f64),
}

/// Tank geometry confirmed by the operator. Read-only once monitoring starts.
#[derive(Debug, Clone, Copy)]
pub struct CalibrationParameters {
  tank: CylindricalTank,
}

impl CalibrationParameters {
  pub fn new(max_height: Length, diameter: Length) -> Result<Self, CalibrationError> {
    for dimension in [max_height, diameter] {
      let meters = dimension.as_meters();
      if !meters.is_finite() || meters <= 0.0 {
        return Err(CalibrationError::InvalidDimension(meters))
      }
    }

    Ok(Self { tank: CylindricalTank::new(diameter, max_height) })
  }

  pub fn max_height(&self) -> Length {
    self.tank.height()
  }

  pub fn diameter(&self) -> Length {
    self.tank.diameter()
  }

  /// Volume of the tank when filled up to the "full" mark.
  pub fn capacity(&self) -> Volume {
    self.tank.volume()
  }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TankReading {
  percentage_full: f64,
  volume: Volume,
}

impl TankReading {
  /// Fill percentage in `[0, 100]`.
  pub fn percentage_full(&self) -> f64 {
    self.percentage_full
  }

  pub fn volume_liters(&self) -> f64 {
    self.volume.as_liters()
  }
}

/// Fill state for a surface `effective_height` below the "full" mark.
pub fn evaluate(effective_height: Length, params: &CalibrationParameters) -> TankReading {
  let filled_height = params.max_height() - effective_height;
  let level = params.tank.level(filled_height);

  TankReading { percentage_full: level.percentage() * 100.0, volume: level.volume() }
}

#[cfg(test)]
mod tests {
  use super::*;

  use std::f64::consts::PI;

  use crate::convert::to_effective_height;
  use crate::sensor::Distance;

  fn params(max_height: f64, diameter: f64) -> CalibrationParameters {
    CalibrationParameters::new(Length::from_meters(max_height), Length::from_meters(diameter)).unwrap()
  }

  #[test]
  fn rejects_degenerate_geometry() {
    assert_eq!(
      CalibrationParameters::new(Length::from_meters(0.0), Length::from_meters(0.5)).unwrap_err(),
      CalibrationError::InvalidDimension(0.0),
    );
    assert!(CalibrationParameters::new(Length::from_meters(1.0), Length::from_meters(-0.5)).is_err());
    assert!(CalibrationParameters::new(Length::from_meters(f64::NAN), Length::from_meters(0.5)).is_err());
  }

  #[test]
  fn capacity_of_calibrated_tank() {
    let liters = params(1.0, 0.5).capacity().as_liters();
    assert!((liters - PI * 0.25 * 0.25 * 1000.0).abs() < 1e-6, "{}", liters);
  }

  #[test]
  fn half_full_tank() {
    let reading = evaluate(Length::from_meters(0.5), &params(1.0, 0.5));
    assert!((reading.percentage_full() - 50.0).abs() < 1e-9);
    assert!((reading.volume_liters() - PI * 0.25 * 0.25 * 0.5 * 1000.0).abs() < 1e-6);
  }

  #[test]
  fn thirty_centimeters_end_to_end() {
    let height = to_effective_height(Distance::from_centimeters(30.0));
    assert!((height.as_meters() - 0.2).abs() < 1e-12);

    let reading = evaluate(height, &params(1.0, 0.5));
    assert_eq!(format!("{:.2}", reading.percentage_full()), "80.00");
    assert!((reading.volume_liters() - 157.08).abs() < 0.01, "{}", reading.volume_liters());
  }

  #[test]
  fn surface_below_the_floor_is_empty() {
    let height = to_effective_height(Distance::from_centimeters(200.0));
    assert!((height.as_meters() - 1.9).abs() < 1e-12);

    let reading = evaluate(height, &params(1.0, 0.5));
    assert_eq!(reading.percentage_full(), 0.0);
    assert_eq!(reading.volume_liters(), 0.0);
  }

  #[test]
  fn stays_in_range() {
    for &(max_height, diameter) in &[(0.1, 0.1), (1.0, 0.5), (2.5, 1.2), (5.0, 3.0)] {
      let params = params(max_height, diameter);

      for step in 0..=200 {
        let height = Length::from_meters(max_height * 2.0 * f64::from(step) / 200.0);
        let reading = evaluate(height, &params);

        assert!((0.0..=100.0).contains(&reading.percentage_full()), "{:?}", reading);
        assert!(reading.volume_liters() >= 0.0, "{:?}", reading);
      }
    }
  }

  #[test]
  fn is_deterministic() {
    let params = params(1.3, 0.7);
    let height = Length::from_meters(0.42);
    assert_eq!(evaluate(height, &params), evaluate(height, &params));
  }
}
