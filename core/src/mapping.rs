// Copyright (c) 2023 Mike Tsao. All rights reserved.

//! Deterministic tables from nucleotides to MIDI pitches.
//!
//! Every lookup is total: input that isn't in a table gets that table's
//! default, so an unexpected character in a sequence file still sounds.

use crate::{
    midi::u7,
    nucleotide::{Codon, Symbol},
};
use rustc_hash::FxHashMap;
use std::sync::OnceLock;

/// Melody pitch for anything that isn't one of the four canonical nucleotides.
pub const DEFAULT_PITCH: u8 = 74;

/// Chord for anything that isn't one of the four canonical nucleotides (D
/// minor).
pub const DEFAULT_CHORD: [u8; 3] = [50, 53, 57];

/// The first codon (`aaa`) sounds at this pitch; each later codon is one
/// semitone higher.
pub const CODON_PITCH_BASE: u8 = 36;

const NOTE_TABLE: [(Symbol, u8); 4] = [
    (Symbol::A, 69),
    (Symbol::C, 72),
    (Symbol::G, 67),
    (Symbol::T, 76),
];

const CHORD_TABLE: [(Symbol, [u8; 3]); 4] = [
    (Symbol::A, [45, 48, 52]), // A minor
    (Symbol::C, [48, 52, 55]), // C major
    (Symbol::G, [43, 47, 50]), // G major
    (Symbol::T, [52, 55, 59]), // E minor
];

/// Three pitches sounded together.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Chord(pub [u7; 3]);
impl Default for Chord {
    fn default() -> Self {
        Self::from_raw(DEFAULT_CHORD)
    }
}
impl Chord {
    pub fn pitches(&self) -> &[u7] {
        &self.0
    }

    fn from_raw(raw: [u8; 3]) -> Self {
        Self(raw.map(u7::from))
    }

    /// A stacked triad on `base`: {base, base+2, base+4}.
    fn stacked_on(base: u8) -> Self {
        Self::from_raw([base, base + 2, base + 4])
    }
}

/// Returns the melody pitch for a single symbol.
pub fn pitch_for_symbol(symbol: Symbol) -> u7 {
    u7::from(
        NOTE_TABLE
            .iter()
            .find(|(s, _)| *s == symbol)
            .map_or(DEFAULT_PITCH, |(_, pitch)| *pitch),
    )
}

/// Returns the chord that a single symbol selects.
pub fn chord_for_symbol(symbol: Symbol) -> Chord {
    Chord::from_raw(
        CHORD_TABLE
            .iter()
            .find(|(s, _)| *s == symbol)
            .map_or(DEFAULT_CHORD, |(_, chord)| *chord),
    )
}

/// Returns the melody pitch for a codon, which is its pitch base.
pub fn pitch_for_codon(codon: &Codon) -> u7 {
    u7::from(codon_table().pitch_base(codon).unwrap_or(DEFAULT_PITCH))
}

/// Returns the chord stacked on a codon's pitch base.
pub fn chord_for_codon(codon: &Codon) -> Chord {
    codon_table()
        .pitch_base(codon)
        .map_or_else(Chord::default, Chord::stacked_on)
}

/// All 64 canonical codons in lexicographic order, each with its own pitch
/// base.
#[derive(Debug)]
pub struct CodonTable {
    codons: Vec<Codon>,
    bases: FxHashMap<Codon, u8>,
}
impl CodonTable {
    fn new() -> Self {
        let mut codons = Vec::with_capacity(64);
        for first in Symbol::CANONICAL {
            for second in Symbol::CANONICAL {
                for third in Symbol::CANONICAL {
                    codons.push(Codon([first, second, third]));
                }
            }
        }
        let bases = codons
            .iter()
            .zip(CODON_PITCH_BASE..)
            .map(|(codon, base)| (*codon, base))
            .collect();
        Self { codons, bases }
    }

    pub fn codons(&self) -> &[Codon] {
        &self.codons
    }

    pub fn len(&self) -> usize {
        self.codons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codons.is_empty()
    }

    /// None for any codon containing a non-canonical symbol.
    pub fn pitch_base(&self, codon: &Codon) -> Option<u8> {
        self.bases.get(codon).copied()
    }
}

static CODON_TABLE: OnceLock<CodonTable> = OnceLock::new();

/// The process-wide codon table, built on first use.
pub fn codon_table() -> &'static CodonTable {
    CODON_TABLE.get_or_init(CodonTable::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use more_asserts::assert_le;
    use rustc_hash::FxHashSet;

    #[test]
    fn codon_enumeration_is_a_bijection() {
        let table = codon_table();
        assert_eq!(table.len(), 64);

        let distinct_codons: FxHashSet<_> = table.codons().iter().collect();
        assert_eq!(distinct_codons.len(), 64);

        let distinct_bases: FxHashSet<_> = table
            .codons()
            .iter()
            .map(|c| table.pitch_base(c).unwrap())
            .collect();
        assert_eq!(distinct_bases.len(), 64);
    }

    #[test]
    fn codons_are_enumerated_lexicographically() {
        let table = codon_table();
        let codons = table.codons();
        assert_eq!(codons.first().unwrap().to_string(), "aaa");
        assert_eq!(codons[1].to_string(), "aac");
        assert_eq!(codons.last().unwrap().to_string(), "ttt");
        assert!(codons.windows(2).all(|w| w[0] < w[1]));

        assert_eq!(table.pitch_base(&codons[0]), Some(CODON_PITCH_BASE));
        assert_eq!(table.pitch_base(&codons[63]), Some(CODON_PITCH_BASE + 63));
    }

    #[test]
    fn codon_chords_are_stacked_thirds_in_range() {
        for codon in codon_table().codons() {
            let chord = chord_for_codon(codon);
            let base = pitch_for_codon(codon).as_int();
            assert_eq!(
                chord.pitches(),
                &[u7::from(base), u7::from(base + 2), u7::from(base + 4)]
            );
            assert_le!(base + 4, 127);
        }
    }

    #[test]
    fn unmapped_input_falls_back_to_defaults() {
        assert_eq!(pitch_for_symbol(Symbol::N), u7::from(DEFAULT_PITCH));
        assert_eq!(pitch_for_symbol(Symbol::Other('x')), u7::from(DEFAULT_PITCH));
        assert_eq!(chord_for_symbol(Symbol::N), Chord::default());

        let masked = Codon([Symbol::A, Symbol::N, Symbol::G]);
        assert_eq!(codon_table().pitch_base(&masked), None);
        assert_eq!(pitch_for_codon(&masked), u7::from(DEFAULT_PITCH));
        assert_eq!(chord_for_codon(&masked), Chord::default());
    }

    #[test]
    fn each_canonical_symbol_has_its_own_pitch_and_chord() {
        let pitches: FxHashSet<_> = Symbol::CANONICAL
            .iter()
            .map(|s| pitch_for_symbol(*s))
            .collect();
        assert_eq!(pitches.len(), 4);
        assert!(!pitches.contains(&u7::from(DEFAULT_PITCH)));

        let chords: FxHashSet<_> = Symbol::CANONICAL
            .iter()
            .map(|s| chord_for_symbol(*s))
            .collect();
        assert_eq!(chords.len(), 4);
        assert_eq!(chord_for_symbol(Symbol::C).pitches()[0], u7::from(48));
    }
}
