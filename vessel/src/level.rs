use measurements::Volume;

/// Fill state of a tank. The percentage is a fraction in `[0, 1]` and the
/// volume is never negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Level {
  pub(crate) volume: Volume,
  pub(crate) percentage: f64,
}

impl Level {
  pub(crate) fn new(liters: f64, percentage: f64) -> Self {
    let liters = if liters.is_nan() { 0.0 } else { liters.max(0.0) };
    let percentage = if percentage.is_nan() { 0.0 } else { percentage.max(0.0).min(1.0) };

    Self { volume: Volume::from_liters(liters), percentage }
  }

  pub fn volume(&self) -> Volume {
    self.volume
  }

  pub fn percentage(&self) -> f64 {
    self.percentage
  }
}
