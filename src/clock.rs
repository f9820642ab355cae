use std::thread;
use std::time::Duration;

/// Source of delays for the polling loops, so tests can run on virtual time.
pub trait Clock {
  fn sleep(&mut self, duration: Duration);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn sleep(&mut self, duration: Duration) {
    thread::sleep(duration)
  }
}

