use std::process;

use log::{error, info};
use simple_signal::{self, Signal};
use thiserror::Error;

use tank_level::calibration::{calibrate_tank, ButtonPanel};
use tank_level::clock::SystemClock;
use tank_level::display::Renderer;
use tank_level::monitor::Monitor;
use tank_level::sensor::{DistanceReader, SensorSource};
use tank_level::shutdown::Shutdown;
use tank_level::tank::CalibrationError;

mod config;
use self::config::{Config, ConfigError};

mod hardware;
use self::hardware::{Hardware, HardwareError, Sensor, ECHO_PIN, TRIGGER_PIN};

#[derive(Debug, Error)]
enum StartupError {
  #[error(transparent)]
  Config(#[from] ConfigError),
  #[error(transparent)]
  Hardware(#[from] HardwareError),
  #[error(transparent)]
  Calibration(#[from] CalibrationError),
}

fn monitor<S: SensorSource>(
  source: S,
  mut panel: ButtonPanel<rppal::gpio::InputPin>,
  display: sh1107::Sh1107,
  shutdown: &Shutdown,
) -> Result<(), StartupError> {
  let mut renderer = Renderer::new(display);
  let mut clock = SystemClock;

  let params = match calibrate_tank(&mut panel, &mut renderer, &mut clock, shutdown)? {
    Some(params) => params,
    None => {
      info!("Interrupted during calibration.");
      return Ok(())
    },
  };

  drop(panel);

  let mut monitor = Monitor::new(DistanceReader::new(source), renderer, clock, params);
  monitor.run(shutdown);

  Ok(())
}

fn run() -> Result<(), StartupError> {
  let config = Config::from_env()?;

  let (sig_tx, shutdown) = Shutdown::channel();

  simple_signal::set_handler(&[Signal::Int, Signal::Term], move |_| {
    let _ = sig_tx.send(());
  });

  let Hardware { panel, display, sensor } = Hardware::acquire(&config)?;

  match sensor {
    Sensor::Echo(echo) => {
      info!("Measuring distance on GPIO {}/{}.", TRIGGER_PIN, ECHO_PIN);
      monitor(echo, panel, display, &shutdown)
    },
    Sensor::Proc(file) => {
      info!("Reading distance from {}.", file.path().display());
      monitor(file, panel, display, &shutdown)
    },
  }
}

fn main() {
  env_logger::init();

  match run() {
    Ok(()) => info!("Hardware released, exiting."),
    Err(err) => {
      error!("{}", err);
      process::exit(1);
    },
  }
}
