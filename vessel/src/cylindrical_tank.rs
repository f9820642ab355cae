use std::f64::consts::PI;

use measurements::Length;
use measurements::Volume;

use crate::level::Level;
use crate::tank::Tank;

/// An upright cylinder, measured from the floor to the "full" mark.
#[derive(Debug, Clone, Copy)]
pub struct CylindricalTank {
  diameter: Length,
  height: Length,
}

impl CylindricalTank {
  pub fn new(diameter: Length, height: Length) -> Self {
    Self { diameter, height }
  }

  pub fn diameter(&self) -> Length {
    self.diameter
  }

  fn liters(&self, filling_height: Length) -> f64 {
    let radius = self.diameter.as_decimeters() / 2.0;
    PI * radius * radius * filling_height.as_decimeters()
  }
}

impl Tank for CylindricalTank {
  fn height(&self) -> Length {
    self.height
  }

  fn volume(&self) -> Volume {
    Volume::from_liters(self.liters(self.height))
  }

  fn level(&self, filling_height: Length) -> Level {
    Level::new(self.liters(filling_height), filling_height / self.height)
  }
}
