use std::{thread::sleep, time::Duration};

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use rppal::i2c::I2c;

#[derive(Debug, Clone, Copy)]
#[repr(u8)]
pub enum Command {
  SetLowerColumn   = 0x00,
  SetHigherColumn  = 0x10,
  AddressingMode   = 0x20,
  Contrast         = 0x81,
  SegmentRemap     = 0xA0,
  EntireDisplayOn  = 0xA4,
  NormalDisplay    = 0xA6,
  MultiplexRatio   = 0xA8,
  DcDcControl      = 0xAD,
  DisplayOff       = 0xAE,
  DisplayOn        = 0xAF,
  SetPage          = 0xB0,
  ScanDirection    = 0xC0,
  DisplayOffset    = 0xD3,
  ClockDivide      = 0xD5,
  Precharge        = 0xD9,
  VcomDeselect     = 0xDB,
  StartLine        = 0xDC,
}

#[derive(Debug, Clone, Copy)]
#[repr(u8)]
pub enum Mode {
  Command = 0x00,
  Data    = 0x40,
}

pub const WIDTH: usize = 128;
pub const HEIGHT: usize = 128;

const PAGES: usize = HEIGHT / 8;
const BUFFER_SIZE: usize = WIDTH * PAGES;

/// SH1107 OLED on an I2C bus. Drawing goes to an off-screen page buffer,
/// which only reaches the panel on [`Sh1107::flush`].
#[derive(Debug)]
pub struct Sh1107 {
  pub bus: I2c,
  buffer: [u8; BUFFER_SIZE],
}

impl Sh1107 {
  pub const ADDR: u16 = 0x3C;

  pub fn new(bus: I2c) -> Result<Sh1107, rppal::i2c::Error> {
    Self::with_address(bus, Self::ADDR)
  }

  pub fn with_address(mut bus: I2c, address: u16) -> Result<Sh1107, rppal::i2c::Error> {
    bus.set_slave_address(address)?;

    let mut display = Sh1107 { bus, buffer: [0; BUFFER_SIZE] };

    display.init()?;

    Ok(display)
  }

  fn init(&mut self) -> Result<(), rppal::i2c::Error> {
    self.command(&[Command::DisplayOff as u8])?;
    self.command(&[Command::SetLowerColumn as u8])?;
    self.command(&[Command::SetHigherColumn as u8])?;
    self.command(&[Command::SetPage as u8])?;
    self.command(&[Command::StartLine as u8, 0x00])?;
    self.command(&[Command::Contrast as u8, 0x6F])?;
    // Page addressing: the column pointer advances, the page stays put.
    self.command(&[Command::AddressingMode as u8])?;
    self.command(&[Command::SegmentRemap as u8])?;
    self.command(&[Command::ScanDirection as u8])?;
    self.command(&[Command::EntireDisplayOn as u8])?;
    self.command(&[Command::NormalDisplay as u8])?;
    self.command(&[Command::MultiplexRatio as u8, (HEIGHT - 1) as u8])?;
    self.command(&[Command::DisplayOffset as u8, 0x00])?;
    self.command(&[Command::ClockDivide as u8, 0x50])?;
    self.command(&[Command::Precharge as u8, 0x22])?;
    self.command(&[Command::VcomDeselect as u8, 0x35])?;
    self.command(&[Command::DcDcControl as u8, 0x81])?;

    self.clear_buffer();
    self.flush()?;

    self.command(&[Command::DisplayOn as u8])?;
    sleep(Duration::from_millis(100));

    Ok(())
  }

  pub fn off(&mut self) -> Result<(), rppal::i2c::Error> {
    self.command(&[Command::DisplayOff as u8])
  }

  /// Blanks the off-screen buffer without touching the panel.
  pub fn clear_buffer(&mut self) {
    self.buffer = [0; BUFFER_SIZE];
  }

  /// Writes the whole buffer to the panel, one page at a time.
  pub fn flush(&mut self) -> Result<(), rppal::i2c::Error> {
    for page in 0..PAGES {
      self.command(&[
        Command::SetPage as u8 | page as u8,
        Command::SetLowerColumn as u8,
        Command::SetHigherColumn as u8,
      ])?;

      let start = page * WIDTH;
      let data = self.buffer[start..start + WIDTH].to_vec();
      self.send(&data, Mode::Data)?;
    }

    Ok(())
  }

  pub fn set_pixel(&mut self, x: usize, y: usize, on: bool) {
    if x >= WIDTH || y >= HEIGHT {
      return
    }

    let byte = &mut self.buffer[(y / 8) * WIDTH + x];
    let bit = 1 << (y % 8);

    if on {
      *byte |= bit;
    } else {
      *byte &= !bit;
    }
  }

  fn command(&mut self, bytes: &[u8]) -> Result<(), rppal::i2c::Error> {
    self.send(bytes, Mode::Command)
  }

  fn send(&mut self, bytes: &[u8], mode: Mode) -> Result<(), rppal::i2c::Error> {
    let mut message = Vec::with_capacity(bytes.len() + 1);
    message.push(mode as u8);
    message.extend_from_slice(bytes);

    self.bus.write(&message)?;
    Ok(())
  }
}

impl Drop for Sh1107 {
  fn drop(&mut self) {
    let _ = self.off();
  }
}

impl OriginDimensions for Sh1107 {
  fn size(&self) -> Size {
    Size::new(WIDTH as u32, HEIGHT as u32)
  }
}

impl DrawTarget for Sh1107 {
  type Color = BinaryColor;
  type Error = rppal::i2c::Error;

  fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
  where
    I: IntoIterator<Item = Pixel<Self::Color>>,
  {
    for Pixel(point, color) in pixels {
      if point.x >= 0 && point.y >= 0 {
        self.set_pixel(point.x as usize, point.y as usize, color.is_on());
      }
    }

    Ok(())
  }
}
