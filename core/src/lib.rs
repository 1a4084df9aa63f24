// Copyright (c) 2023 Mike Tsao. All rights reserved.

//! Fundamental types shared by the sequence decoder, the playback scheduler,
//! and the MIDI output.

use std::time::Duration;

/// The [error] module defines the one error type every crate in the workspace
/// returns.
pub mod error;
/// The [mapping] module holds the fixed tables that turn nucleotides into
/// pitches and chords.
pub mod mapping;
/// The [midi] module knows about [MIDI](https://en.wikipedia.org/wiki/MIDI)
/// and the sinks that MIDI messages are sent to.
pub mod midi;
/// The [nucleotide] module describes the symbols a sequence file decodes to.
pub mod nucleotide;

pub use error::{Error, Result};

/// Every note, melody or chord, is struck at this velocity.
pub const NOTE_VELOCITY: u8 = 100;

/// How long each melody note sounds. This is the only source of pacing during
/// playback.
pub const HOLD_DURATION: Duration = Duration::from_millis(250);

/// General MIDI program selected once at startup (Orchestral Harp).
pub const INSTRUMENT_PROGRAM: u8 = 46;

/// All output goes to the first MIDI channel.
pub const MIDI_CHANNEL: u8 = 0;
