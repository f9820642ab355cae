//! Fakes for running the pipeline on virtual time without hardware.

use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::mpsc::Sender;
use std::time::Duration;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use rppal::gpio::Level;

use crate::calibration::Button;
use crate::clock::Clock;
use crate::display::Canvas;
use crate::sensor::SensorSource;

pub fn ms(millis: u64) -> Duration {
  Duration::from_millis(millis)
}

/// Virtual clock. Sleeping advances time instantly and can raise a shutdown
/// once a given number of sleeps has happened.
#[derive(Debug)]
pub struct FakeClock {
  now: Rc<Cell<Duration>>,
  sleeps: usize,
  stop: Option<(usize, Sender<()>)>,
}

impl FakeClock {
  pub fn new() -> Self {
    Self { now: Rc::new(Cell::new(Duration::ZERO)), sleeps: 0, stop: None }
  }

  pub fn stop_after(mut self, sleeps: usize, tx: Sender<()>) -> Self {
    self.stop = Some((sleeps, tx));
    self
  }

  pub fn now(&self) -> Duration {
    self.now.get()
  }

  pub fn advance(&self, duration: Duration) {
    self.now.set(self.now.get() + duration);
  }

  pub fn sleeps(&self) -> usize {
    self.sleeps
  }
}

impl Clock for FakeClock {
  fn sleep(&mut self, duration: Duration) {
    self.advance(duration);
    self.sleeps += 1;

    if let Some((after, tx)) = &self.stop {
      if self.sleeps == *after {
        let _ = tx.send(());
      }
    }
  }
}

/// Button held down during fixed windows of virtual time, given in
/// milliseconds as `[start, end)`.
#[derive(Debug)]
pub struct ScriptedButton {
  now: Rc<Cell<Duration>>,
  windows: Vec<(Duration, Duration)>,
}

impl ScriptedButton {
  pub fn new(clock: &FakeClock, windows: &[(u64, u64)]) -> Self {
    Self {
      now: clock.now.clone(),
      windows: windows.iter().map(|&(start, end)| (ms(start), ms(end))).collect(),
    }
  }
}

impl Button for ScriptedButton {
  fn level(&mut self) -> Level {
    let now = self.now.get();

    if self.windows.iter().any(|&(start, end)| start <= now && now < end) {
      Level::Low
    } else {
      Level::High
    }
  }
}

/// Hands out queued values; `None` stands for an unreachable source.
#[derive(Debug)]
pub struct ScriptedSource {
  values: VecDeque<Option<&'static str>>,
}

impl ScriptedSource {
  pub fn new(values: Vec<Option<&'static str>>) -> Self {
    Self { values: values.into() }
  }
}

impl SensorSource for ScriptedSource {
  type Error = &'static str;

  fn read_value(&mut self) -> Result<String, &'static str> {
    match self.values.pop_front() {
      Some(Some(value)) => Ok(value.to_owned()),
      _ => Err("source unreachable"),
    }
  }
}

const SIZE: usize = 128;

/// In-memory 128×128 canvas with a back buffer and a "shown" buffer.
#[derive(Debug)]
pub struct FakeCanvas {
  back: Vec<bool>,
  front: Vec<bool>,
  flushes: usize,
  discards: usize,
  fail_after: Option<usize>,
}

impl FakeCanvas {
  pub fn new() -> Self {
    Self { back: vec![false; SIZE * SIZE], front: vec![false; SIZE * SIZE], flushes: 0, discards: 0, fail_after: None }
  }

  /// Makes drawing fail once this many more pixels have been drawn.
  pub fn fail_after(&mut self, pixels: usize) {
    self.fail_after = Some(pixels);
  }

  pub fn flushes(&self) -> usize {
    self.flushes
  }

  pub fn discards(&self) -> usize {
    self.discards
  }

  pub fn shown(&self, point: Point) -> bool {
    point.x >= 0 && point.y >= 0 && (point.x as usize) < SIZE && (point.y as usize) < SIZE
      && self.front[point.y as usize * SIZE + point.x as usize]
  }
}

impl OriginDimensions for FakeCanvas {
  fn size(&self) -> Size {
    Size::new(SIZE as u32, SIZE as u32)
  }
}

impl DrawTarget for FakeCanvas {
  type Color = BinaryColor;
  type Error = &'static str;

  fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
  where
    I: IntoIterator<Item = Pixel<Self::Color>>,
  {
    for Pixel(point, color) in pixels {
      if let Some(remaining) = self.fail_after.as_mut() {
        if *remaining == 0 {
          return Err("draw failed")
        }
        *remaining -= 1;
      }

      if point.x >= 0 && point.y >= 0 && (point.x as usize) < SIZE && (point.y as usize) < SIZE {
        self.back[point.y as usize * SIZE + point.x as usize] = color.is_on();
      }
    }

    Ok(())
  }

  fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
    self.back.iter_mut().for_each(|pixel| *pixel = color.is_on());
    Ok(())
  }
}

impl Canvas for FakeCanvas {
  fn flush(&mut self) -> Result<(), Self::Error> {
    self.front.copy_from_slice(&self.back);
    self.flushes += 1;
    Ok(())
  }

  fn discard(&mut self) {
    self.back.copy_from_slice(&self.front);
    self.discards += 1;
  }
}
