// Copyright (c) 2023 Mike Tsao. All rights reserved.

use clap::{builder::PossibleValuesParser, CommandFactory, Parser};

// TODO: this is a pasted copy of the Args in src/bin/dna-music.rs. Move Args
// into the library so both can share it.

#[allow(dead_code)]
#[derive(Parser, Debug, Default)]
#[command(name = "dna-music", author, about, long_about = None)]
struct Args {
    /// Sequence file to play. Lines starting with '>' are headers.
    path: Option<String>,

    /// Play masked (n) symbols at the start of the sequence instead of
    /// skipping them
    #[clap(short = 'p', long, alias = "play-heterochromatin", value_parser)]
    play_masked: bool,

    /// Number of groups to consume silently before playback becomes audible
    #[clap(short = 'o', long, default_value_t = 0)]
    offset: usize,

    /// How each group of symbols becomes music
    #[clap(
        short = 'a',
        long,
        default_value = "symbol-chord",
        value_parser = PossibleValuesParser::new([
            "codon-chord",
            "symbol-chord",
            "codon-melody",
            "codon-chord-note",
        ])
    )]
    arrangement: String,

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

// https://unix.stackexchange.com/questions/3586/what-do-the-numbers-in-a-man-page-mean
// Picking category 1 as a "user command"
fn main() -> std::io::Result<()> {
    println!("cargo:rerun-if-changed=build.rs");
    let out_dir = std::path::PathBuf::from(
        std::env::var_os("OUT_DIR").ok_or(std::io::ErrorKind::NotFound)?,
    );
    let man = clap_mangen::Man::new(Args::command());
    let mut buffer: Vec<u8> = Default::default();
    man.render(&mut buffer)?;
    std::fs::write(out_dir.join("dna-music.1"), buffer)?;
    Ok(())
}
