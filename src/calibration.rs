use std::fmt;
use std::time::Duration;

use log::{info, warn};
use measurements::Length;
use rppal::gpio::{InputPin, Level};

use crate::clock::Clock;
use crate::display::{Canvas, DisplayFrame, Renderer};
use crate::shutdown::Shutdown;
use crate::tank::{CalibrationError, CalibrationParameters};

/// Pause after a recognised press before the buttons are looked at again.
pub const DEBOUNCE: Duration = Duration::from_millis(200);

/// Pause between polls while no button is pressed.
pub const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Values are kept on a micrometer grid so repeated steps don't drift.
fn snap(value: f64) -> f64 {
  (value * 1e6).round() / 1e6
}

/// A bounded number the operator dials in with the buttons.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdjustableValue {
  label: &'static str,
  current: f64,
  step: f64,
  min: f64,
  max: f64,
}

impl AdjustableValue {
  pub fn new(label: &'static str, current: f64, step: f64, min: f64, max: f64) -> Result<Self, CalibrationError> {
    if !min.is_finite() || !max.is_finite() || min <= 0.0 || min > max {
      return Err(CalibrationError::InvalidRange { min, max })
    }

    if !step.is_finite() || step <= 0.0 {
      return Err(CalibrationError::InvalidStep(step))
    }

    let current = if current.is_nan() { min } else { current.max(min).min(max) };

    Ok(Self { label, current, step, min, max })
  }

  pub fn tank_height() -> Result<Self, CalibrationError> {
    Self::new("tank height", 1.0, 0.1, 0.1, 5.0)
  }

  pub fn tank_diameter() -> Result<Self, CalibrationError> {
    Self::new("diameter", 0.5, 0.05, 0.1, 3.0)
  }

  pub fn label(&self) -> &'static str {
    self.label
  }

  pub fn current(&self) -> f64 {
    self.current
  }

  pub fn increment(self) -> Self {
    Self { current: snap(self.current + self.step).min(self.max), ..self }
  }

  pub fn decrement(self) -> Self {
    Self { current: snap(self.current - self.step).max(self.min), ..self }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
  Increment,
  Decrement,
  Confirm,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CalibrationState {
  Idle(AdjustableValue),
  Confirmed(f64),
}

impl CalibrationState {
  pub fn on(self, event: ButtonEvent) -> Self {
    match self {
      CalibrationState::Idle(value) => match event {
        ButtonEvent::Increment => CalibrationState::Idle(value.increment()),
        ButtonEvent::Decrement => CalibrationState::Idle(value.decrement()),
        ButtonEvent::Confirm => CalibrationState::Confirmed(value.current()),
      },
      confirmed => confirmed,
    }
  }
}

/// A digital input line. Buttons pull their line low while pressed.
pub trait Button {
  fn level(&mut self) -> Level;

  fn is_pressed(&mut self) -> bool {
    self.level() == Level::Low
  }
}

impl Button for InputPin {
  fn level(&mut self) -> Level {
    self.read()
  }
}

#[derive(Debug)]
pub struct ButtonPanel<B> {
  pub increment: B,
  pub decrement: B,
  pub confirm: B,
}

impl<B: Button> ButtonPanel<B> {
  pub fn new(increment: B, decrement: B, confirm: B) -> Self {
    Self { increment, decrement, confirm }
  }

  /// At most one event per poll; increment wins over decrement, which wins
  /// over confirm.
  pub fn poll(&mut self) -> Option<ButtonEvent> {
    if self.increment.is_pressed() {
      Some(ButtonEvent::Increment)
    } else if self.decrement.is_pressed() {
      Some(ButtonEvent::Decrement)
    } else if self.confirm.is_pressed() {
      Some(ButtonEvent::Confirm)
    } else {
      None
    }
  }
}

/// Lets the operator adjust `value` until confirm is pressed. Returns `None`
/// only if shutdown was requested first.
pub fn calibrate<B, C, K>(
  value: AdjustableValue,
  panel: &mut ButtonPanel<B>,
  renderer: &mut Renderer<C>,
  clock: &mut K,
  shutdown: &Shutdown,
) -> Option<f64>
where
  B: Button,
  C: Canvas,
  C::Error: fmt::Debug,
  K: Clock,
{
  let mut state = CalibrationState::Idle(value);

  loop {
    if shutdown.requested() {
      return None
    }

    let value = match state {
      CalibrationState::Idle(value) => value,
      CalibrationState::Confirmed(confirmed) => {
        // Hold here until release so the same press can't confirm the next value.
        while panel.confirm.is_pressed() {
          if shutdown.requested() {
            return None
          }

          clock.sleep(POLL_INTERVAL);
        }

        clock.sleep(DEBOUNCE);
        return Some(confirmed)
      },
    };

    if let Err(err) = renderer.render(&DisplayFrame::prompt(&value)) {
      warn!("Failed to render calibration prompt: {:?}", err);
    }

    match panel.poll() {
      Some(event) => {
        state = state.on(event);

        if event != ButtonEvent::Confirm {
          clock.sleep(DEBOUNCE);
        }
      },
      None => clock.sleep(POLL_INTERVAL),
    }
  }
}

/// Asks for the tank height, then the diameter.
pub fn calibrate_tank<B, C, K>(
  panel: &mut ButtonPanel<B>,
  renderer: &mut Renderer<C>,
  clock: &mut K,
  shutdown: &Shutdown,
) -> Result<Option<CalibrationParameters>, CalibrationError>
where
  B: Button,
  C: Canvas,
  C::Error: fmt::Debug,
  K: Clock,
{
  let height = AdjustableValue::tank_height()?;
  let diameter = AdjustableValue::tank_diameter()?;

  let height = match calibrate(height, panel, renderer, clock, shutdown) {
    Some(height) => height,
    None => return Ok(None),
  };
  info!("Tank height set to {:.2} m.", height);

  let diameter = match calibrate(diameter, panel, renderer, clock, shutdown) {
    Some(diameter) => diameter,
    None => return Ok(None),
  };
  info!("Tank diameter set to {:.2} m.", diameter);

  let params = CalibrationParameters::new(Length::from_meters(height), Length::from_meters(diameter))?;
  info!("Tank holds {:.1} l when full.", params.capacity().as_liters());

  Ok(Some(params))
}
