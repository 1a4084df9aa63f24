// Copyright (c) 2023 Mike Tsao. All rights reserved.

//! Pulls groups of symbols from a decoder and plays each one as a chord with
//! a melody over it.

use crate::pacing::Pacer;
use dna_music_core::{
    mapping::{chord_for_codon, chord_for_symbol, pitch_for_codon, pitch_for_symbol, Chord},
    midi::{u7, MidiSink},
    nucleotide::{Codon, Symbol},
    Error, Result, HOLD_DURATION, INSTRUMENT_PROGRAM, NOTE_VELOCITY,
};
use std::{fmt::Display, time::Duration};
use strum_macros::{Display as StrumDisplay, EnumIter, EnumString};

/// How a group of symbols becomes music.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, StrumDisplay, EnumIter, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum Arrangement {
    /// One codon picks a chord stacked on its pitch base. No melody.
    CodonChord,

    /// The first symbol picks a chord; the next three are the melody.
    #[default]
    SymbolChord,

    /// The first symbol picks a chord; the next three codons are the melody.
    CodonMelody,

    /// One codon picks a chord stacked on its pitch base; the symbol after it
    /// is a single melody note.
    CodonChordNote,
}
impl Arrangement {
    /// How many symbols make up one group.
    pub fn group_len(&self) -> usize {
        match self {
            Arrangement::CodonChord => Codon::LEN,
            Arrangement::SymbolChord => 1 + 3,
            Arrangement::CodonMelody => 1 + 3 * Codon::LEN,
            Arrangement::CodonChordNote => Codon::LEN + 1,
        }
    }

    pub fn phrase(&self, group: &Group) -> Phrase {
        let symbols = group.symbols();
        match self {
            Arrangement::CodonChord => Phrase {
                chord: Codon::from_slice(symbols)
                    .map_or_else(Chord::default, |codon| chord_for_codon(&codon)),
                melody: Vec::default(),
            },
            Arrangement::SymbolChord => Phrase {
                chord: symbols
                    .first()
                    .map_or_else(Chord::default, |s| chord_for_symbol(*s)),
                melody: symbols.iter().skip(1).map(|s| pitch_for_symbol(*s)).collect(),
            },
            Arrangement::CodonMelody => Phrase {
                chord: symbols
                    .first()
                    .map_or_else(Chord::default, |s| chord_for_symbol(*s)),
                melody: symbols
                    .get(1..)
                    .unwrap_or_default()
                    .chunks_exact(Codon::LEN)
                    .filter_map(Codon::from_slice)
                    .map(|codon| pitch_for_codon(&codon))
                    .collect(),
            },
            Arrangement::CodonChordNote => Phrase {
                chord: Codon::from_slice(symbols)
                    .map_or_else(Chord::default, |codon| chord_for_codon(&codon)),
                melody: symbols
                    .iter()
                    .skip(Codon::LEN)
                    .map(|s| pitch_for_symbol(*s))
                    .collect(),
            },
        }
    }
}

/// Consecutive symbols pulled from the decoder together.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Group(Vec<Symbol>);
impl Group {
    pub fn symbols(&self) -> &[Symbol] {
        &self.0
    }
}
impl Display for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for symbol in &self.0 {
            write!(f, "{symbol}")?;
        }
        Ok(())
    }
}

/// What gets played for one group: the chord is held while the melody notes
/// sound one after another.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Phrase {
    pub chord: Chord,
    pub melody: Vec<u7>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroupOutcome {
    /// The group came before the offset and was consumed silently.
    Skipped,
    Played,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    EndOfSequence,
    Interrupted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlaybackSummary {
    pub groups_skipped: usize,
    pub groups_played: usize,
    pub stop: StopReason,
}

/// Drives playback: decoder in, MIDI out, one group at a time.
///
/// Groups up to and including `offset` are decoded but not played, so
/// playback that starts at an offset lines up with a run from the beginning.
#[derive(Debug)]
pub struct Scheduler<I, S, P> {
    symbols: I,
    sink: S,
    pacer: P,
    arrangement: Arrangement,
    offset: usize,
    hold: Duration,
    velocity: u7,

    groups_consumed: usize,
    groups_played: usize,
    sounding: Vec<u7>,
}
impl<I, S, P> Scheduler<I, S, P>
where
    I: Iterator<Item = Result<Symbol>>,
    S: MidiSink,
    P: Pacer,
{
    pub fn new_with(symbols: I, sink: S, pacer: P, arrangement: Arrangement, offset: usize) -> Self {
        Self {
            symbols,
            sink,
            pacer,
            arrangement,
            offset,
            hold: HOLD_DURATION,
            velocity: u7::from(NOTE_VELOCITY),
            groups_consumed: Default::default(),
            groups_played: Default::default(),
            sounding: Default::default(),
        }
    }

    /// Overrides [HOLD_DURATION].
    pub fn with_hold(mut self, hold: Duration) -> Self {
        self.hold = hold;
        self
    }

    pub fn arrangement(&self) -> Arrangement {
        self.arrangement
    }

    pub fn groups_consumed(&self) -> usize {
        self.groups_consumed
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Gives back the decoder, sink, and pacer.
    pub fn into_parts(self) -> (I, S, P) {
        (self.symbols, self.sink, self.pacer)
    }

    /// Selects the instrument. Call once before the first group.
    pub fn start(&mut self) -> Result<()> {
        self.sink.set_instrument(u7::from(INSTRUMENT_PROGRAM))
    }

    /// Pulls exactly one group's worth of symbols. Running out partway
    /// through is [Error::EndOfSequence], and the partial group is dropped.
    pub fn pull_group(&mut self) -> Result<Group> {
        let needed = self.arrangement.group_len();
        let mut symbols = Vec::with_capacity(needed);
        while symbols.len() < needed {
            match self.symbols.next() {
                Some(symbol) => symbols.push(symbol?),
                None => {
                    return Err(Error::EndOfSequence {
                        needed,
                        received: symbols.len(),
                    })
                }
            }
        }
        Ok(Group(symbols))
    }

    /// Consumes one group, playing it unless it falls within the offset.
    pub fn step(&mut self) -> Result<GroupOutcome> {
        self.pacer.check()?;
        let group = self.pull_group()?;
        self.groups_consumed += 1;
        if self.groups_consumed <= self.offset {
            log::debug!("Skipped group {} ({group})", self.groups_consumed);
            return Ok(GroupOutcome::Skipped);
        }
        log::debug!("Playing group {} ({group})", self.groups_consumed);
        let phrase = self.arrangement.phrase(&group);
        self.play(&phrase)?;
        self.groups_played += 1;
        Ok(GroupOutcome::Played)
    }

    /// Chord on, then each melody note on/hold/off, then chord off. A phrase
    /// without a melody holds the chord once.
    fn play(&mut self, phrase: &Phrase) -> Result<()> {
        for key in phrase.chord.pitches() {
            self.strike(*key)?;
        }
        if phrase.melody.is_empty() {
            self.pacer.hold(self.hold)?;
        }
        for key in &phrase.melody {
            self.pacer.check()?;
            self.strike(*key)?;
            self.pacer.hold(self.hold)?;
            self.release(*key)?;
        }
        for key in phrase.chord.pitches() {
            self.release(*key)?;
        }
        Ok(())
    }

    fn strike(&mut self, key: u7) -> Result<()> {
        self.sink.note_on(key, self.velocity)?;
        self.sounding.push(key);
        Ok(())
    }

    fn release(&mut self, key: u7) -> Result<()> {
        self.sink.note_off(key, self.velocity)?;
        if let Some(index) = self.sounding.iter().position(|k| *k == key) {
            self.sounding.remove(index);
        }
        Ok(())
    }

    /// Turns off everything this scheduler left sounding, newest first.
    fn silence(&mut self) {
        while let Some(key) = self.sounding.pop() {
            if let Err(err) = self.sink.note_off(key, self.velocity) {
                log::warn!("Couldn't release note {}: {err}", key.as_int());
            }
        }
    }

    /// Plays until the sequence runs out or the pacer stops it. Either way,
    /// nothing is left sounding when this returns. Any other failure is
    /// passed on, also after silencing.
    pub fn run(&mut self) -> Result<PlaybackSummary> {
        self.start()?;
        let err = loop {
            if let Err(err) = self.step() {
                break err;
            }
        };
        self.silence();

        let stop = match err {
            Error::EndOfSequence { needed, received } => {
                if received > 0 {
                    log::debug!("Dropped a partial group ({received} of {needed} symbols)");
                }
                StopReason::EndOfSequence
            }
            Error::Interrupted => StopReason::Interrupted,
            err => return Err(err),
        };
        let summary = PlaybackSummary {
            groups_skipped: self.groups_consumed - self.groups_played,
            groups_played: self.groups_played,
            stop,
        };
        log::info!(
            "Playback stopped ({stop:?}): {} groups played, {} skipped",
            summary.groups_played,
            summary.groups_skipped
        );
        Ok(summary)
    }
}
