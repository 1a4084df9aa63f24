// Copyright (c) 2023 Mike Tsao. All rights reserved.

use dna_music::{
    stop_channel, Arrangement, Pacer, PlaybackSummary, Scheduler, SequenceDecoder, StopReason,
};
use dna_music_core::{
    midi::{u7, MidiMessage, RecordingSink},
    nucleotide::Symbol,
    Error, NOTE_VELOCITY,
};
use more_asserts::assert_lt;
use std::{
    io::Write,
    time::{Duration, Instant},
};
use tempfile::NamedTempFile;

/// Holds return immediately.
#[derive(Debug, Default)]
struct NoWait;
impl Pacer for NoWait {
    fn check(&mut self) -> dna_music_core::Result<()> {
        Ok(())
    }

    fn hold(&mut self, _duration: Duration) -> dna_music_core::Result<()> {
        Ok(())
    }
}

fn sequence_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn decode_file(contents: &str, suppress_masked: bool) -> Vec<Symbol> {
    let file = sequence_file(contents);
    SequenceDecoder::open(file.path(), suppress_masked)
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}

fn play_file(
    contents: &str,
    arrangement: Arrangement,
    offset: usize,
) -> (PlaybackSummary, RecordingSink) {
    let file = sequence_file(contents);
    let decoder = SequenceDecoder::open(file.path(), true).unwrap();
    let mut scheduler =
        Scheduler::new_with(decoder, RecordingSink::default(), NoWait, arrangement, offset);
    let summary = scheduler.run().unwrap();
    let (_, sink, _) = scheduler.into_parts();
    (summary, sink)
}

fn note_messages(sink: &RecordingSink) -> Vec<MidiMessage> {
    sink.messages()
        .iter()
        .filter(|m| matches!(m, MidiMessage::NoteOn { .. } | MidiMessage::NoteOff { .. }))
        .copied()
        .collect()
}

#[test]
fn header_then_short_record_plays_exactly_one_group() {
    assert_eq!(
        decode_file(">header\nATGCN\n", true),
        vec![Symbol::A, Symbol::T, Symbol::G, Symbol::C, Symbol::N]
    );

    let (summary, sink) = play_file(">header\nATGCN\n", Arrangement::SymbolChord, 0);
    assert_eq!(
        summary,
        PlaybackSummary {
            groups_skipped: 0,
            groups_played: 1,
            stop: StopReason::EndOfSequence,
        }
    );

    // a picks A minor; t, g, c are the melody.
    let vel = u7::from(NOTE_VELOCITY);
    let keys: Vec<(bool, u8)> = note_messages(&sink)
        .iter()
        .map(|m| match m {
            MidiMessage::NoteOn { key, vel: v } => {
                assert_eq!(*v, vel);
                (true, key.as_int())
            }
            MidiMessage::NoteOff { key, .. } => (false, key.as_int()),
            _ => unreachable!(),
        })
        .collect();
    assert_eq!(
        keys,
        vec![
            (true, 45),
            (true, 48),
            (true, 52),
            (true, 76),
            (false, 76),
            (true, 67),
            (false, 67),
            (true, 72),
            (false, 72),
            (false, 45),
            (false, 48),
            (false, 52),
        ]
    );
    assert!(sink.sounding_keys().is_empty());
}

#[test]
fn codon_chord_note_plays_header_record_as_one_group() {
    let (summary, sink) = play_file(">header\nATGCN\n", Arrangement::CodonChordNote, 0);
    assert_eq!(summary.groups_played, 1);
    assert_eq!(summary.stop, StopReason::EndOfSequence);

    // The atg codon chord sits on base 50; c is the melody note.
    let keys: Vec<(bool, u8)> = note_messages(&sink)
        .iter()
        .map(|m| match m {
            MidiMessage::NoteOn { key, .. } => (true, key.as_int()),
            MidiMessage::NoteOff { key, .. } => (false, key.as_int()),
            _ => unreachable!(),
        })
        .collect();
    assert_eq!(
        keys,
        vec![
            (true, 50),
            (true, 52),
            (true, 54),
            (true, 72),
            (false, 72),
            (false, 50),
            (false, 52),
            (false, 54),
        ]
    );
}

#[test]
fn headers_with_alphabet_letters_are_ignored() {
    assert_eq!(
        decode_file(">acgt\n>GATTACA\ncc\n  >tt\n", true),
        vec![Symbol::C, Symbol::C]
    );
}

#[test]
fn file_case_does_not_matter() {
    assert_eq!(decode_file("AtGc\n", true), decode_file("atgc\n", true));
}

#[test]
fn masked_prefix_is_skipped_across_lines() {
    assert_eq!(
        decode_file("NNNN\nnnAG\nNNN\n", true),
        vec![Symbol::A, Symbol::G, Symbol::N, Symbol::N, Symbol::N]
    );
    assert_eq!(decode_file("NNNN\nnnAG\nNNN\n", false).len(), 11);
}

#[test]
fn offset_skips_exactly_the_first_groups() {
    let sequence = ">chr\nacgtTGCAggatccta\nNNacgtac\n";
    let (full_summary, full) = play_file(sequence, Arrangement::SymbolChord, 0);
    let (late_summary, late) = play_file(sequence, Arrangement::SymbolChord, 2);

    assert_eq!(full_summary.groups_played, 6);
    assert_eq!(late_summary.groups_played, 4);
    assert_eq!(late_summary.groups_skipped, 2);

    // Each symbol-chord group is six note-ons and six note-offs.
    let full_notes = note_messages(&full);
    let late_notes = note_messages(&late);
    assert_eq!(late_notes.as_slice(), &full_notes[2 * 12..]);
}

#[test]
fn offset_past_the_end_plays_nothing() {
    let (summary, sink) = play_file("acgtacgt", Arrangement::SymbolChord, 10);
    assert_eq!(summary.groups_played, 0);
    assert_eq!(summary.groups_skipped, 2);
    assert!(note_messages(&sink).is_empty());
}

#[test]
fn trailing_partial_group_is_dropped() {
    for arrangement in [
        Arrangement::CodonChord,
        Arrangement::SymbolChord,
        Arrangement::CodonMelody,
        Arrangement::CodonChordNote,
    ] {
        let len = arrangement.group_len();
        let sequence = "acgt".repeat(len);
        let with_tail = format!("{sequence}g");
        let (summary, _) = play_file(&with_tail, arrangement, 0);
        assert_eq!(summary.groups_played, 4, "{arrangement}");
        assert_eq!(summary.stop, StopReason::EndOfSequence);
    }
}

#[test]
fn missing_file_fails_before_playback() {
    assert!(matches!(
        SequenceDecoder::open("/no/such/dir/genome.fa", true),
        Err(Error::FileAccess { .. })
    ));
}

#[test]
fn stop_during_a_hold_releases_everything() {
    let file = sequence_file(&"acgt".repeat(100));
    let decoder = SequenceDecoder::open(file.path(), true).unwrap();
    let (handle, signal) = stop_channel();
    let mut scheduler = Scheduler::new_with(
        decoder,
        RecordingSink::default(),
        signal,
        Arrangement::SymbolChord,
        0,
    )
    .with_hold(Duration::from_secs(30));

    let stopper = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(50));
        handle.stop();
    });
    let start = Instant::now();
    let summary = scheduler.run().unwrap();
    assert_lt!(start.elapsed(), Duration::from_secs(10));
    assert_eq!(summary.stop, StopReason::Interrupted);
    assert_eq!(summary.groups_played, 0);
    let _ = stopper.join();

    let (decoder, sink, signal) = scheduler.into_parts();
    assert!(signal.is_stopped());
    assert!(sink.sounding_keys().is_empty());
    assert!(!note_messages(&sink).is_empty());

    // The decoder still holds the file until it's dropped.
    assert!(decoder.is_open());
    drop(decoder);
}
