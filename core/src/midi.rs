// Copyright (c) 2023 Mike Tsao. All rights reserved.

use crate::{Error, Result};
use std::io::Write;

pub use midly::{
    num::{u4, u7},
    MidiMessage,
};

pub type MidiChannel = u8;

/// Controller number of the channel-mode "All Notes Off" message.
pub const ALL_NOTES_OFF: u8 = 123;

/// Something that accepts MIDI messages, like a hardware port. Playback
/// treats it as an opaque capability: it only ever selects an instrument and
/// turns notes on and off.
pub trait MidiSink {
    fn send(&mut self, message: MidiMessage) -> Result<()>;

    fn set_instrument(&mut self, program: u7) -> Result<()> {
        self.send(MidiMessage::ProgramChange { program })
    }

    fn note_on(&mut self, key: u7, vel: u7) -> Result<()> {
        self.send(MidiMessage::NoteOn { key, vel })
    }

    fn note_off(&mut self, key: u7, vel: u7) -> Result<()> {
        self.send(MidiMessage::NoteOff { key, vel })
    }
}
impl<T: MidiSink + ?Sized> MidiSink for &mut T {
    fn send(&mut self, message: MidiMessage) -> Result<()> {
        (**self).send(message)
    }
}
impl<T: MidiSink + ?Sized> MidiSink for Box<T> {
    fn send(&mut self, message: MidiMessage) -> Result<()> {
        (**self).send(message)
    }
}

/// Keeps every message it's given, in order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    messages: Vec<MidiMessage>,
}
impl MidiSink for RecordingSink {
    fn send(&mut self, message: MidiMessage) -> Result<()> {
        self.messages.push(message);
        Ok(())
    }
}
impl RecordingSink {
    pub fn messages(&self) -> &[MidiMessage] {
        &self.messages
    }

    /// Keys that have been turned on more often than they've been turned off.
    pub fn sounding_keys(&self) -> Vec<u7> {
        let mut sounding: Vec<u7> = Vec::default();
        for message in &self.messages {
            match message {
                MidiMessage::NoteOn { key, .. } => sounding.push(*key),
                MidiMessage::NoteOff { key, .. } => {
                    if let Some(index) = sounding.iter().position(|k| k == key) {
                        sounding.remove(index);
                    }
                }
                _ => {}
            }
        }
        sounding
    }
}

/// Writes one line per message instead of making any sound.
#[derive(Debug)]
pub struct PrintingSink<W: Write> {
    out: W,
}
impl<W: Write> PrintingSink<W> {
    pub fn new_with(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
impl<W: Write> MidiSink for PrintingSink<W> {
    fn send(&mut self, message: MidiMessage) -> Result<()> {
        match message {
            MidiMessage::NoteOn { key, vel } => {
                writeln!(self.out, "on  {:>3} {:>3}", key.as_int(), vel.as_int())
            }
            MidiMessage::NoteOff { key, vel } => {
                writeln!(self.out, "off {:>3} {:>3}", key.as_int(), vel.as_int())
            }
            MidiMessage::ProgramChange { program } => {
                writeln!(self.out, "program {}", program.as_int())
            }
            other => writeln!(self.out, "{other:?}"),
        }
        .map_err(|err| Error::Send(err.to_string()))
    }
}
