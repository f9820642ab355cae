use std::ops::{Deref, DerefMut};

use embedded_graphics::mono_font::{ascii::FONT_6X10, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};
use sh1107::Sh1107;

use crate::calibration::AdjustableValue;
use crate::sensor::Distance;
use crate::tank::TankReading;

const MARGIN: i32 = 10;
const ROWS: [i32; 3] = [4, 16, 28];

const GAUGE_ORIGIN: Point = Point::new(10, 42);
const GAUGE_SIZE: Size = Size::new(108, 84);
const GAUGE_INSET: u32 = 2;

/// Pixel height of a completely full gauge.
pub const GAUGE_FILL_MAX: u32 = GAUGE_SIZE.height - 2 * GAUGE_INSET;

/// A monochrome surface that collects one frame off-screen and shows it on
/// `flush`.
pub trait Canvas: DrawTarget<Color = BinaryColor> + OriginDimensions {
  fn flush(&mut self) -> Result<(), Self::Error>;

  /// Throws away whatever was drawn since the last flush. The buffer may be
  /// blanked or restored to the last flushed frame; the panel is left as is.
  fn discard(&mut self);
}

impl Canvas for Sh1107 {
  fn flush(&mut self) -> Result<(), rppal::i2c::Error> {
    Sh1107::flush(self)
  }

  fn discard(&mut self) {
    self.clear_buffer()
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
  pub position: Point,
  pub text: String,
}

/// Everything shown during one cycle: text lines and an optional fill gauge.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayFrame {
  lines: Vec<TextLine>,
  gauge: Option<f64>,
}

impl DisplayFrame {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn line(mut self, position: Point, text: impl Into<String>) -> Self {
    self.lines.push(TextLine { position, text: text.into() });
    self
  }

  pub fn gauge(mut self, percentage_full: f64) -> Self {
    self.gauge = Some(percentage_full);
    self
  }

  pub fn reading(distance: Distance, reading: &TankReading) -> Self {
    Self::new()
      .line(Point::new(MARGIN, ROWS[0]), format!("Dist: {:.2} cm", distance.as_centimeters()))
      .line(Point::new(MARGIN, ROWS[1]), format!("Tank: {:.2}%", reading.percentage_full()))
      .line(Point::new(MARGIN, ROWS[2]), format!("Vol: {:.2} L", reading.volume_liters()))
      .gauge(reading.percentage_full())
  }

  pub fn no_data(message: &str) -> Self {
    Self::new()
      .line(Point::new(MARGIN, ROWS[0]), "Error: No data")
      .line(Point::new(MARGIN, ROWS[1]), message)
  }

  pub fn prompt(value: &AdjustableValue) -> Self {
    Self::new()
      .line(Point::new(MARGIN, ROWS[0]), format!("Set {}", value.label()))
      .line(Point::new(MARGIN, ROWS[2]), format!("{:.2} m", value.current()))
      .line(Point::new(MARGIN, 100), "+/- to adjust")
      .line(Point::new(MARGIN, 112), "OK to confirm")
  }

  pub fn lines(&self) -> &[TextLine] {
    &self.lines
  }

  pub fn gauge_percentage(&self) -> Option<f64> {
    self.gauge
  }
}

/// Height in pixels of the gauge fill, clamped to the outline.
pub fn fill_height(percentage_full: f64) -> u32 {
  let percentage = if percentage_full.is_nan() { 0.0 } else { percentage_full.max(0.0).min(100.0) };
  ((percentage / 100.0 * f64::from(GAUGE_FILL_MAX)).round() as u32).min(GAUGE_FILL_MAX)
}

pub fn gauge_outline() -> Rectangle {
  Rectangle::new(GAUGE_ORIGIN, GAUGE_SIZE)
}

/// Bottom-anchored fill inside the gauge outline, `None` when empty.
pub fn gauge_fill(percentage_full: f64) -> Option<Rectangle> {
  let height = fill_height(percentage_full);

  if height == 0 {
    return None
  }

  let inset = GAUGE_INSET as i32;
  let top = GAUGE_ORIGIN.y + inset + (GAUGE_FILL_MAX - height) as i32;

  Some(Rectangle::new(
    Point::new(GAUGE_ORIGIN.x + inset, top),
    Size::new(GAUGE_SIZE.width - 2 * GAUGE_INSET, height),
  ))
}

/// Holds the canvas for one frame. Unless committed, the partial frame is
/// discarded when the guard goes away.
struct FrameGuard<'a, C: Canvas> {
  canvas: &'a mut C,
  committed: bool,
}

impl<'a, C: Canvas> FrameGuard<'a, C> {
  fn new(canvas: &'a mut C) -> Self {
    Self { canvas, committed: false }
  }

  fn commit(mut self) -> Result<(), C::Error> {
    self.committed = true;
    self.canvas.flush()
  }
}

impl<C: Canvas> Deref for FrameGuard<'_, C> {
  type Target = C;

  fn deref(&self) -> &C {
    self.canvas
  }
}

impl<C: Canvas> DerefMut for FrameGuard<'_, C> {
  fn deref_mut(&mut self) -> &mut C {
    self.canvas
  }
}

impl<C: Canvas> Drop for FrameGuard<'_, C> {
  fn drop(&mut self) {
    if !self.committed {
      self.canvas.discard();
    }
  }
}

#[derive(Debug)]
pub struct Renderer<C> {
  canvas: C,
}

impl<C: Canvas> Renderer<C> {
  pub fn new(canvas: C) -> Self {
    Self { canvas }
  }

  pub fn render(&mut self, frame: &DisplayFrame) -> Result<(), C::Error> {
    let mut target = FrameGuard::new(&mut self.canvas);
    let text_style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);

    target.clear(BinaryColor::Off)?;

    for line in frame.lines() {
      Text::with_baseline(&line.text, line.position, text_style, Baseline::Top).draw(&mut *target)?;
    }

    if let Some(percentage_full) = frame.gauge_percentage() {
      gauge_outline().into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1)).draw(&mut *target)?;

      if let Some(fill) = gauge_fill(percentage_full) {
        fill.into_styled(PrimitiveStyle::with_fill(BinaryColor::On)).draw(&mut *target)?;
      }
    }

    target.commit()
  }

  pub fn render_error(&mut self, message: &str) -> Result<(), C::Error> {
    self.render(&DisplayFrame::no_data(message))
  }

  pub fn canvas(&self) -> &C {
    &self.canvas
  }

  pub fn canvas_mut(&mut self) -> &mut C {
    &mut self.canvas
  }
}
