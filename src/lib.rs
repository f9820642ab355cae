//! Tank level monitor: ultrasonic distance in, fill percentage and volume of a
//! cylindrical tank out, rendered on a 128×128 monochrome display.

pub mod calibration;
pub mod clock;
pub mod convert;
pub mod display;
pub mod monitor;
pub mod sensor;
pub mod shutdown;
pub mod tank;

#[cfg(test)]
mod testing;
