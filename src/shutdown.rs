use std::cell::Cell;
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};

/// Latching shutdown request, fed from a signal handler over a channel.
#[derive(Debug)]
pub struct Shutdown {
  rx: Receiver<()>,
  requested: Cell<bool>,
}

impl Shutdown {
  pub fn channel() -> (Sender<()>, Shutdown) {
    let (tx, rx) = channel();
    (tx, Shutdown { rx, requested: Cell::new(false) })
  }

  pub fn requested(&self) -> bool {
    if !self.requested.get() {
      match self.rx.try_recv() {
        Ok(()) | Err(TryRecvError::Disconnected) => self.requested.set(true),
        Err(TryRecvError::Empty) => (),
      }
    }

    self.requested.get()
  }
}
