// Copyright (c) 2023 Mike Tsao. All rights reserved.

//! The CLI (command-line interface) tool plays a sequence file on a MIDI
//! output.

use anyhow::anyhow;
use clap::Parser;
use dna_music::{app_version, stop_channel, Arrangement, Scheduler, SequenceDecoder, StopReason};
use dna_music_core::midi::{MidiSink, PrintingSink};
use dna_music_midi::{output_ports, MidiOutputSink};

#[derive(Parser, Debug, Default)]
#[clap(author, about, long_about = None)]
struct Args {
    /// Sequence file to play. Lines starting with '>' are headers.
    #[clap(required_unless_present_any = ["list_ports", "version"])]
    path: Option<String>,

    /// Play masked (n) symbols at the start of the sequence instead of
    /// skipping them
    #[clap(short = 'p', long, alias = "play-heterochromatin", value_parser)]
    play_masked: bool,

    /// Number of groups to consume silently before playback becomes audible
    #[clap(short = 'o', long, default_value_t = 0)]
    offset: usize,

    /// How each group of symbols becomes music (codon-chord, symbol-chord,
    /// codon-melody, codon-chord-note)
    #[clap(short = 'a', long, default_value_t = Arrangement::default())]
    arrangement: Arrangement,

    /// Use the first MIDI output whose name contains this text
    #[clap(long)]
    port: Option<String>,

    /// List MIDI output ports and exit
    #[clap(short = 'l', long, value_parser)]
    list_ports: bool,

    /// Print MIDI events instead of sending them to a device
    #[clap(short = 'n', long, value_parser)]
    dry_run: bool,

    /// Suppress status updates while playing
    #[clap(short = 'q', long, value_parser)]
    quiet: bool,

    /// Enable debug mode
    #[clap(short = 'd', long, value_parser)]
    debug: bool,

    /// Print version and exit
    #[clap(short = 'v', long, value_parser)]
    version: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_filter = if args.debug {
        "debug"
    } else if args.quiet {
        "warn"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if args.version {
        println!("dna-music {}", app_version());
        return Ok(());
    }

    if args.list_ports {
        for port in output_ports()? {
            println!("{port}");
        }
        return Ok(());
    }

    let path = args
        .path
        .ok_or_else(|| anyhow!("no sequence file given"))?;

    // Startup order matters: a bad path fails before the device is opened,
    // and a missing device fails before anything is decoded.
    let decoder = SequenceDecoder::open(&path, !args.play_masked)?;
    let sink: Box<dyn MidiSink> = if args.dry_run {
        Box::new(PrintingSink::new_with(std::io::stdout()))
    } else {
        let output = MidiOutputSink::open(args.port.as_deref())?;
        log::info!("Opened MIDI output {}", output.port());
        Box::new(output)
    };

    let (stop_handle, stop_signal) = stop_channel();
    ctrlc::set_handler(move || stop_handle.stop())?;

    log::info!(
        "Playing {path} ({}, offset {})",
        args.arrangement,
        args.offset
    );
    let mut scheduler =
        Scheduler::new_with(decoder, sink, stop_signal, args.arrangement, args.offset);
    let summary = scheduler.run()?;
    if summary.stop == StopReason::Interrupted && !args.quiet {
        eprintln!("Interrupted after {} groups", summary.groups_played);
    }
    Ok(())
}
