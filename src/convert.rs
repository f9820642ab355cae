use measurements::Length;

use crate::sensor::Distance;

/// Readings closer than this are inside the sensor's blind zone; the surface
/// is taken to be right at the sensor.
pub const DEAD_ZONE_CM: f64 = 10.0;

/// Converts a raw sensor distance to the effective height used by the tank
/// model, with the dead-zone offset removed. Never negative.
pub fn to_effective_height(distance: Distance) -> Length {
  let cm = distance.as_centimeters();

  if !cm.is_finite() || cm < DEAD_ZONE_CM {
    return Length::from_meters(0.0)
  }

  Length::from_meters((cm - DEAD_ZONE_CM) / 100.0)
}
