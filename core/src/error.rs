// Copyright (c) 2023 Mike Tsao. All rights reserved.

use std::{io, path::PathBuf};
use thiserror::Error;

/// Everything that can stop a run.
///
/// [Error::FileAccess] and [Error::DeviceUnavailable] happen at startup and
/// are fatal. [Error::EndOfSequence] and [Error::Interrupted] are the two
/// ordinary ways playback ends; the scheduler turns them into a successful
/// summary rather than passing them on.
#[derive(Debug, Error)]
pub enum Error {
    #[error("couldn't open sequence file {}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("couldn't read sequence data: {0}")]
    Read(#[from] io::Error),

    #[error("no MIDI output device available: {0}")]
    DeviceUnavailable(String),

    #[error("couldn't send MIDI message: {0}")]
    Send(String),

    #[error("sequence ended after {received} of {needed} symbols in a group")]
    EndOfSequence { needed: usize, received: usize },

    #[error("playback interrupted")]
    Interrupted,
}
impl Error {
    /// True for the conditions that end playback normally.
    pub fn is_expected_stop(&self) -> bool {
        matches!(self, Error::EndOfSequence { .. } | Error::Interrupted)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
