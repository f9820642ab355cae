use measurements::{Length, Volume};

use crate::level::Level;

pub trait Tank {
  fn height(&self) -> Length;
  fn volume(&self) -> Volume;

  /// Fill level for water standing `filling_height` above the tank floor.
  fn level(&self, filling_height: Length) -> Level;
}
