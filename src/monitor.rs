use std::fmt;
use std::time::Duration;

use log::{debug, info, warn};

use crate::clock::Clock;
use crate::convert::to_effective_height;
use crate::display::{Canvas, DisplayFrame, Renderer};
use crate::sensor::{Distance, DistanceReader, SensorError, SensorSource};
use crate::shutdown::Shutdown;
use crate::tank::{evaluate, CalibrationParameters, TankReading};

pub const REFRESH_INTERVAL: Duration = Duration::from_secs(1);

/// What one cycle ended up showing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cycle {
  Reading { distance: Distance, reading: TankReading },
  NoData(SensorError),
}

/// Read, compute, render, sleep; until shutdown.
#[derive(Debug)]
pub struct Monitor<S, C, K> {
  reader: DistanceReader<S>,
  renderer: Renderer<C>,
  clock: K,
  params: CalibrationParameters,
  has_data: bool,
}

impl<S, C, K> Monitor<S, C, K>
where
  S: SensorSource,
  C: Canvas,
  C::Error: fmt::Debug,
  K: Clock,
{
  pub fn new(reader: DistanceReader<S>, renderer: Renderer<C>, clock: K, params: CalibrationParameters) -> Self {
    Self { reader, renderer, clock, params, has_data: true }
  }

  /// One pass through the pipeline, without the trailing sleep.
  pub fn cycle(&mut self) -> Cycle {
    let (cycle, rendered) = match self.reader.read() {
      Ok(distance) => {
        let reading = evaluate(to_effective_height(distance), &self.params);

        if !self.has_data {
          info!("Sensor data is back.");
          self.has_data = true;
        }
        debug!("{} -> {:.2}%, {:.2} l", distance, reading.percentage_full(), reading.volume_liters());

        (Cycle::Reading { distance, reading }, self.renderer.render(&DisplayFrame::reading(distance, &reading)))
      },
      Err(err @ SensorError::Unavailable(cause)) => {
        if self.has_data {
          warn!("No sensor data: {}", cause);
          self.has_data = false;
        } else {
          debug!("Still no sensor data: {}", cause);
        }

        (Cycle::NoData(err), self.renderer.render_error(&cause.to_string()))
      },
    };

    if let Err(err) = rendered {
      warn!("Failed to update display: {:?}", err);
    }

    cycle
  }

  /// Runs cycles until shutdown is requested, checking only between cycles.
  /// Returns the number of completed cycles.
  pub fn run(&mut self, shutdown: &Shutdown) -> usize {
    let mut cycles = 0;

    while !shutdown.requested() {
      self.cycle();
      cycles += 1;
      self.clock.sleep(REFRESH_INTERVAL);
    }

    info!("Monitoring stopped after {} cycles.", cycles);
    cycles
  }

  pub fn renderer(&self) -> &Renderer<C> {
    &self.renderer
  }

  pub fn clock(&self) -> &K {
    &self.clock
  }
}
