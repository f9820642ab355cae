use std::time::Duration;
use std::thread;

use ordered_float::NotNan;
use rppal::gpio::{self, OutputPin, InputPin, Trigger};

const TEMPERATURE: f64 = 15.5; // °C

const TRIGGER_PULSE: Duration = Duration::from_micros(10);
const ECHO_TIMEOUT: Duration = Duration::from_millis(100);

/// Speed of sound in air in m/s.
fn speed_of_sound(temperature: f64) -> f64 {
  331.5 + 0.6 * temperature
}

/// Distance in centimeters covered by an echo of the given round-trip length.
pub fn echo_to_centimeters(echo: Duration, temperature: f64) -> f64 {
  echo.as_secs_f64() / 2.0 * speed_of_sound(temperature) * 100.0
}

/// Round-trip time between the echo's rising and falling edge. Edges are
/// given as interrupt timestamps; anything before the rising edge is ignored.
pub fn echo_duration(edges: &[(Trigger, Duration)]) -> Result<Duration, Error> {
  let mut start = None;
  let mut stop = None;

  for &(trigger, timestamp) in edges {
    match trigger {
      Trigger::RisingEdge => {
        if start.is_none() {
          start = Some(timestamp);
        }
      },
      Trigger::FallingEdge => {
        if start.is_some() && stop.is_none() {
          stop = Some(timestamp)
        }
      },
      _ => (),
    }
  }

  let start = start.ok_or(Error::NoRisingEdgeDetected)?;
  let stop = stop.ok_or(Error::NoFallingEdgeDetected)?;

  stop.checked_sub(start).ok_or(Error::InvalidEcho)
}

#[derive(Debug)]
pub enum Error {
  NoRisingEdgeDetected,
  NoFallingEdgeDetected,
  InvalidEcho,
  Gpio(gpio::Error),
}

#[derive(Debug)]
pub struct HcSr04 {
  trigger: OutputPin,
  echo: InputPin,
}

impl HcSr04 {
  pub fn new(mut trigger: OutputPin, mut echo: InputPin) -> Result<HcSr04, Error> {
    trigger.set_low();
    echo.set_interrupt(Trigger::Both, None).map_err(Error::Gpio)?;

    Ok(HcSr04 { trigger, echo })
  }

  /// Triggers an ultrasonic measurement and returns the distance in centimeters.
  pub fn measure(&mut self) -> Result<NotNan<f64>, Error> {
    self.trigger.set_high();
    thread::sleep(TRIGGER_PULSE);
    self.trigger.set_low();

    let mut edges = Vec::with_capacity(2);

    while let Some(event) = self.echo.poll_interrupt(false, Some(ECHO_TIMEOUT)).map_err(Error::Gpio)? {
      edges.push((event.trigger, event.timestamp));
    }

    let echo = echo_duration(&edges)?;

    NotNan::new(echo_to_centimeters(echo, TEMPERATURE)).map_err(|_| Error::InvalidEcho)
  }
}
