//! Cooperative cancellation for elevator threads.
//!
//! A [`StopHandle`] owns the only sender of an unbuffered channel. Stopping
//! sets a flag and drops that sender, which disconnects every
//! [`StopSignal`] receiver at once: from then on `recv` on it returns
//! immediately, so blocking `select!`s wake up.
use crossbeam_channel as cbc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug)]
pub struct StopHandle {
    stopped: Arc<AtomicBool>,
    tx: Mutex<Option<cbc::Sender<()>>>,
    rx: cbc::Receiver<()>,
}

/// Read-only view of a [`StopHandle`], cheap to clone into every thread.
#[derive(Clone, Debug)]
pub struct StopSignal {
    stopped: Arc<AtomicBool>,
    rx: cbc::Receiver<()>,
}

impl StopHandle {
    pub fn new() -> StopHandle {
        let (tx, rx) = cbc::bounded::<()>(0);
        StopHandle {
            stopped: Arc::new(AtomicBool::new(false)),
            tx: Mutex::new(Some(tx)),
            rx,
        }
    }

    pub fn signal(&self) -> StopSignal {
        StopSignal {
            stopped: Arc::clone(&self.stopped),
            rx: self.rx.clone(),
        }
    }

    /// Returns `true` only for the call that actually raised the signal.
    pub fn stop(&self) -> bool {
        let first = !self.stopped.swap(true, Ordering::SeqCst);
        let mut tx = match self.tx.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        tx.take();
        first
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

impl Default for StopHandle {
    fn default() -> StopHandle {
        StopHandle::new()
    }
}

impl StopSignal {
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// Receiver that becomes ready (disconnected) once the handle is stopped.
    pub fn receiver(&self) -> &cbc::Receiver<()> {
        &self.rx
    }
}
