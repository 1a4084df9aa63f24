// Copyright (c) 2023 Mike Tsao. All rights reserved.

//! This crate sends playback to an external MIDI output, thanks to the
//! `midir` crate. Open a [MidiOutputSink] and hand it to the scheduler as its
//! [MidiSink].

use dna_music_core::{
    midi::{u4, u7, MidiMessage, MidiSink, ALL_NOTES_OFF},
    Error, Result, MIDI_CHANNEL,
};
use midir::{MidiOutput, MidiOutputConnection};
use midly::live::LiveEvent;
use rustc_hash::FxHashSet;
use std::fmt::Display;

const CLIENT_NAME: &str = "DNA Music output";
const CONNECTION_NAME: &str = "DNA Music";

/// Names one of the system's MIDI output ports.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MidiPortDescriptor {
    pub index: usize,
    pub name: String,
}
impl Display for MidiPortDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}: {}", self.index, self.name)
    }
}

/// Lists the MIDI output ports currently available.
pub fn output_ports() -> Result<Vec<MidiPortDescriptor>> {
    Ok(describe_ports(&new_output()?))
}

fn new_output() -> Result<MidiOutput> {
    MidiOutput::new(CLIENT_NAME).map_err(|err| Error::DeviceUnavailable(err.to_string()))
}

fn describe_ports(midi: &MidiOutput) -> Vec<MidiPortDescriptor> {
    midi.ports()
        .iter()
        .enumerate()
        .map(|(index, port)| MidiPortDescriptor {
            index,
            name: midi
                .port_name(port)
                .unwrap_or("[unnamed output]".to_string()),
        })
        .collect()
}

/// With no name, the first port wins. Otherwise the first port whose name
/// contains `wanted`, ignoring case.
fn choose_port(ports: &[MidiPortDescriptor], wanted: Option<&str>) -> Option<usize> {
    match wanted {
        None => ports.first().map(|p| p.index),
        Some(wanted) => {
            let wanted = wanted.to_lowercase();
            ports
                .iter()
                .find(|p| p.name.to_lowercase().contains(&wanted))
                .map(|p| p.index)
        }
    }
}

fn encode(channel: u4, message: MidiMessage) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(3);
    LiveEvent::Midi { channel, message }
        .write(&mut buf)
        .map_err(|_| Error::Send(format!("couldn't encode {message:?}")))?;
    Ok(buf)
}

/// Keeps `sounding` up to date with a message that was just sent. A note-on
/// with zero velocity counts as a note-off.
fn track(sounding: &mut FxHashSet<u7>, message: MidiMessage) {
    match message {
        MidiMessage::NoteOn { key, vel } if vel.as_int() > 0 => {
            sounding.insert(key);
        }
        MidiMessage::NoteOn { key, .. } | MidiMessage::NoteOff { key, .. } => {
            sounding.remove(&key);
        }
        _ => {}
    }
}

/// Drains `sounding` into a note-off per key, followed by All Notes Off.
fn silencers(sounding: &mut FxHashSet<u7>) -> Vec<MidiMessage> {
    let mut messages: Vec<MidiMessage> = sounding
        .drain()
        .map(|key| MidiMessage::NoteOff {
            key,
            vel: u7::from(0),
        })
        .collect();
    messages.push(MidiMessage::Controller {
        controller: u7::from(ALL_NOTES_OFF),
        value: u7::from(0),
    });
    messages
}

/// An open connection to a MIDI output port.
///
/// Closing it, explicitly or by dropping it, turns off every note it left
/// sounding before the connection goes away.
pub struct MidiOutputSink {
    connection: Option<MidiOutputConnection>,
    port: MidiPortDescriptor,
    channel: u4,
    sounding: FxHashSet<u7>,
}
impl std::fmt::Debug for MidiOutputSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MidiOutputSink")
            .field("port", &self.port)
            .field("open", &self.connection.is_some())
            .finish()
    }
}
impl MidiOutputSink {
    /// Connects to the port chosen by `wanted` (see [output_ports]). Fails with
    /// [Error::DeviceUnavailable] if there's nothing to connect to.
    pub fn open(wanted: Option<&str>) -> Result<Self> {
        let midi = new_output()?;
        let ports = midi.ports();
        let descriptors = describe_ports(&midi);
        let index = choose_port(&descriptors, wanted).ok_or_else(|| {
            Error::DeviceUnavailable(match wanted {
                Some(name) => format!("no MIDI output port matches \"{name}\""),
                None => "no MIDI output ports found".to_string(),
            })
        })?;
        let (Some(port), Some(descriptor)) = (ports.get(index), descriptors.get(index)) else {
            return Err(Error::DeviceUnavailable(format!(
                "MIDI output port #{index} is no longer valid"
            )));
        };
        let connection = midi
            .connect(port, CONNECTION_NAME)
            .map_err(|err| Error::DeviceUnavailable(err.to_string()))?;
        Ok(Self {
            connection: Some(connection),
            port: descriptor.clone(),
            channel: u4::from(MIDI_CHANNEL),
            sounding: Default::default(),
        })
    }

    pub fn port(&self) -> &MidiPortDescriptor {
        &self.port
    }

    /// Silences anything still sounding and releases the port. Safe to call
    /// more than once.
    pub fn close(&mut self) {
        if let Some(mut connection) = self.connection.take() {
            for message in silencers(&mut self.sounding) {
                if let Ok(bytes) = encode(self.channel, message) {
                    let _ = connection.send(&bytes);
                }
            }
            connection.close();
            log::debug!("Closed MIDI output {}", self.port);
        }
    }
}
impl MidiSink for MidiOutputSink {
    fn send(&mut self, message: MidiMessage) -> Result<()> {
        let Some(connection) = self.connection.as_mut() else {
            return Err(Error::Send("MIDI output is closed".to_string()));
        };
        let bytes = encode(self.channel, message)?;
        connection
            .send(&bytes)
            .map_err(|err| Error::Send(err.to_string()))?;
        track(&mut self.sounding, message);
        Ok(())
    }
}
impl Drop for MidiOutputSink {
    fn drop(&mut self) {
        self.close();
    }
}
