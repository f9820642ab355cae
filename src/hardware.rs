use hc_sr04::HcSr04;
use rppal::gpio::{Gpio, InputPin};
use rppal::i2c::I2c;
use sh1107::Sh1107;
use thiserror::Error;

use tank_level::calibration::ButtonPanel;
use tank_level::sensor::{Echo, ProcFile};

use crate::config::{Config, SensorKind};

const INCREMENT_PIN: u8 = 5;
const DECREMENT_PIN: u8 = 6;
const CONFIRM_PIN:   u8 = 13;

pub const TRIGGER_PIN: u8 = 23;
pub const ECHO_PIN:    u8 = 24;

#[derive(Debug, Error)]
pub enum HardwareError {
  #[error("failed to access GPIO: {0}")]
  Gpio(#[from] rppal::gpio::Error),
  #[error("failed to access display: {0}")]
  I2c(#[from] rppal::i2c::Error),
  #[error("failed to set up distance sensor: {0:?}")]
  Sensor(hc_sr04::Error),
}

#[derive(Debug)]
pub enum Sensor {
  Proc(ProcFile),
  Echo(Echo),
}

/// Buttons, display and sensor. GPIO lines all come from one `Gpio` handle.
/// Whatever was claimed before a failure is released again on the way out.
#[derive(Debug)]
pub struct Hardware {
  pub panel: ButtonPanel<InputPin>,
  pub display: Sh1107,
  pub sensor: Sensor,
}

impl Hardware {
  pub fn acquire(config: &Config) -> Result<Hardware, HardwareError> {
    let gpio = Gpio::new()?;

    let panel = ButtonPanel::new(
      gpio.get(INCREMENT_PIN)?.into_input_pullup(),
      gpio.get(DECREMENT_PIN)?.into_input_pullup(),
      gpio.get(CONFIRM_PIN)?.into_input_pullup(),
    );

    let sensor = match &config.sensor {
      SensorKind::Gpio => {
        let trigger = gpio.get(TRIGGER_PIN)?.into_output();
        let echo = gpio.get(ECHO_PIN)?.into_input();
        Sensor::Echo(Echo::new(HcSr04::new(trigger, echo).map_err(HardwareError::Sensor)?))
      },
      SensorKind::Proc(path) => Sensor::Proc(ProcFile::new(path)),
    };

    let i2c = I2c::with_bus(config.i2c_bus)?;
    let display = Sh1107::new(i2c)?;

    Ok(Hardware { panel, display, sensor })
  }
}
