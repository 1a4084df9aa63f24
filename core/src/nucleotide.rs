// Copyright (c) 2023 Mike Tsao. All rights reserved.

use std::fmt::Display;

/// One decoded position of a sequence.
///
/// The four canonical nucleotides sort in alphabetical order, which is also
/// the order the codon table is enumerated in. Anything else that isn't
/// whitespace passes through as [Symbol::Other] and is left for the pitch
/// tables to handle with their defaults.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbol {
    A,
    C,
    G,
    T,
    /// The placeholder for a masked (unknown) base.
    N,
    Other(char),
}
impl Symbol {
    /// The canonical alphabet, in lexicographic order.
    pub const CANONICAL: [Symbol; 4] = [Symbol::A, Symbol::C, Symbol::G, Symbol::T];

    /// Normalizes one input character. Returns None for whitespace, which is
    /// never a symbol.
    pub fn from_char(c: char) -> Option<Self> {
        if c.is_whitespace() {
            return None;
        }
        let c = c.to_lowercase().next().unwrap_or(c);
        Some(match c {
            'a' => Symbol::A,
            'c' => Symbol::C,
            'g' => Symbol::G,
            't' => Symbol::T,
            'n' => Symbol::N,
            other => Symbol::Other(other),
        })
    }

    pub fn as_char(&self) -> char {
        match self {
            Symbol::A => 'a',
            Symbol::C => 'c',
            Symbol::G => 'g',
            Symbol::T => 't',
            Symbol::N => 'n',
            Symbol::Other(c) => *c,
        }
    }

    pub fn is_masked(&self) -> bool {
        *self == Symbol::N
    }

    pub fn is_canonical(&self) -> bool {
        matches!(self, Symbol::A | Symbol::C | Symbol::G | Symbol::T)
    }
}
impl Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Three consecutive symbols used together as one lookup key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Codon(pub [Symbol; 3]);
impl Codon {
    pub const LEN: usize = 3;

    /// Builds a codon from the first three symbols of a slice.
    pub fn from_slice(symbols: &[Symbol]) -> Option<Self> {
        match symbols {
            [a, b, c, ..] => Some(Self([*a, *b, *c])),
            _ => None,
        }
    }
}
impl Display for Codon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}{}", self.0[0], self.0[1], self.0[2])
    }
}
