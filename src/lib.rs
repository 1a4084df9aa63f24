// Copyright (c) 2023 Mike Tsao. All rights reserved.

//! Plays a genomic sequence file as music: a [SequenceDecoder] streams
//! nucleotides out of the file, and a [Scheduler] turns each group of them
//! into a chord and melody on a MIDI output.

pub use crate::decoder::SequenceDecoder;
pub use crate::pacing::{stop_channel, Pacer, StopHandle, StopSignal};
pub use crate::scheduler::{Arrangement, PlaybackSummary, Scheduler, StopReason};

/// The [decoder] module reads sequence files.
pub mod decoder;
/// The [pacing] module times notes and carries stop requests.
pub mod pacing;
/// The [scheduler] module decides what plays when.
pub mod scheduler;

/// A short version string for `--version`.
pub fn app_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
