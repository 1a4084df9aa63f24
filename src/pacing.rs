// Copyright (c) 2023 Mike Tsao. All rights reserved.

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TryRecvError};
use dna_music_core::{Error, Result};
use std::time::Duration;

/// Paces playback and decides when it has to stop.
pub trait Pacer {
    /// Returns [Error::Interrupted] if playback should stop now.
    fn check(&mut self) -> Result<()>;

    /// Waits for `duration`, returning [Error::Interrupted] early if playback
    /// is stopped during the wait.
    fn hold(&mut self, duration: Duration) -> Result<()>;
}
impl<T: Pacer + ?Sized> Pacer for &mut T {
    fn check(&mut self) -> Result<()> {
        (**self).check()
    }

    fn hold(&mut self, duration: Duration) -> Result<()> {
        (**self).hold(duration)
    }
}

/// Asks a [StopSignal] to stop. Cheap to clone, so it can be moved into a
/// signal handler.
#[derive(Clone, Debug)]
pub struct StopHandle {
    sender: Sender<()>,
}
impl StopHandle {
    pub fn stop(&self) {
        // A full channel means a stop is already pending.
        let _ = self.sender.try_send(());
    }
}

/// The real-time [Pacer]. Holds are timed waits on a channel, so they run
/// against the monotonic clock and wake as soon as a [StopHandle] fires.
/// Dropping every [StopHandle] also counts as a stop.
#[derive(Debug)]
pub struct StopSignal {
    receiver: Receiver<()>,
    stopped: bool,
}
impl StopSignal {
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    fn stop(&mut self) -> Result<()> {
        if !self.stopped {
            log::debug!("Stop requested");
        }
        self.stopped = true;
        Err(Error::Interrupted)
    }
}
impl Pacer for StopSignal {
    fn check(&mut self) -> Result<()> {
        if self.stopped {
            return Err(Error::Interrupted);
        }
        match self.receiver.try_recv() {
            Err(TryRecvError::Empty) => Ok(()),
            Ok(()) | Err(TryRecvError::Disconnected) => self.stop(),
        }
    }

    fn hold(&mut self, duration: Duration) -> Result<()> {
        self.check()?;
        match self.receiver.recv_timeout(duration) {
            Err(RecvTimeoutError::Timeout) => Ok(()),
            Ok(()) | Err(RecvTimeoutError::Disconnected) => self.stop(),
        }
    }
}

/// Creates a connected [StopHandle] and [StopSignal].
pub fn stop_channel() -> (StopHandle, StopSignal) {
    let (sender, receiver) = bounded(1);
    (
        StopHandle { sender },
        StopSignal {
            receiver,
            stopped: false,
        },
    )
}
