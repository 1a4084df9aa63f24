// Copyright (c) 2023 Mike Tsao. All rights reserved.

//! Turns a line-oriented sequence file into a stream of [Symbol]s.

use dna_music_core::{nucleotide::Symbol, Error, Result};
use std::{
    fs::File,
    io::{BufRead, BufReader, Lines},
    path::Path,
};

/// Lines starting with this character (after trimming) are headers and
/// contribute nothing.
pub const HEADER_SENTINEL: char = '>';

/// Reads symbols from a sequence one at a time, on demand.
///
/// While masking suppression is on, masked symbols (`n`) are dropped. The
/// first symbol that isn't masked turns suppression off for good, so masked
/// runs later in the sequence come through like any other symbol.
///
/// The reader is released as soon as it's exhausted or fails, and in any case
/// when the decoder is dropped.
#[derive(Debug)]
pub struct SequenceDecoder<R> {
    lines: Option<Lines<R>>,
    line: String,
    cursor: usize,
    suppress_masked: bool,
    lines_read: usize,
}
impl SequenceDecoder<BufReader<File>> {
    /// Opens a sequence file. Failing to open it is fatal:
    /// [Error::FileAccess].
    pub fn open(path: impl AsRef<Path>, suppress_masked: bool) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::FileAccess {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new_with(BufReader::new(file), suppress_masked))
    }
}
impl<R: BufRead> SequenceDecoder<R> {
    pub fn new_with(reader: R, suppress_masked: bool) -> Self {
        Self {
            lines: Some(reader.lines()),
            line: String::default(),
            cursor: 0,
            suppress_masked,
            lines_read: 0,
        }
    }

    /// Whether masked symbols are still being dropped.
    pub fn is_suppressing(&self) -> bool {
        self.suppress_masked
    }

    /// Whether the underlying reader is still held.
    pub fn is_open(&self) -> bool {
        self.lines.is_some()
    }

    pub fn lines_read(&self) -> usize {
        self.lines_read
    }

    fn release(&mut self) {
        if self.lines.take().is_some() {
            log::debug!("Sequence reader released after {} lines", self.lines_read);
        }
    }

    /// Loads the next line that isn't a header. Returns false once the reader
    /// is exhausted.
    fn advance_line(&mut self) -> Result<bool> {
        loop {
            let Some(lines) = self.lines.as_mut() else {
                return Ok(false);
            };
            match lines.next() {
                None => {
                    self.release();
                    return Ok(false);
                }
                Some(Err(err)) => {
                    self.release();
                    return Err(Error::Read(err));
                }
                Some(Ok(line)) => {
                    self.lines_read += 1;
                    let trimmed = line.trim();
                    if trimmed.starts_with(HEADER_SENTINEL) {
                        continue;
                    }
                    self.line = trimmed.to_string();
                    self.cursor = 0;
                    return Ok(true);
                }
            }
        }
    }
}
impl<R: BufRead> Iterator for SequenceDecoder<R> {
    type Item = Result<Symbol>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(c) = self.line[self.cursor..].chars().next() {
                self.cursor += c.len_utf8();
                let Some(symbol) = Symbol::from_char(c) else {
                    continue;
                };
                if symbol.is_masked() && self.suppress_masked {
                    continue;
                }
                self.suppress_masked = false;
                return Some(Ok(symbol));
            }
            match self.advance_line() {
                Ok(true) => continue,
                Ok(false) => return None,
                Err(err) => return Some(Err(err)),
            }
        }
    }
}
