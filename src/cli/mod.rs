//! CLI Module
//!
//! Command-line interface for driving Prophet 12 settings over MIDI.

pub mod commands;
pub mod shell;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::dispatch::{Target, ValueSource};
use crate::settings::LayerSelector;

/// Prophet 12 NRPN controller - set synthesizer parameters over MIDI
#[derive(Parser, Debug)]
#[command(name = "p12")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory of CSV bank files
    #[arg(long, global = true, env = "P12_BANKS_DIR", default_value = "lib")]
    pub banks_dir: PathBuf,

    /// MIDI channel (0-15)
    #[arg(
        short,
        long,
        global = true,
        env = "P12_CHANNEL",
        default_value_t = 0,
        value_parser = clap::value_parser!(u8).range(0..=15)
    )]
    pub channel: u8,

    /// MIDI output port index (see `p12 ports`)
    #[arg(short, long, global = true, env = "P12_MIDI_PORT")]
    pub port: Option<usize>,

    /// Print the encoded messages instead of sending them
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List MIDI output ports
    #[command(name = "ports")]
    Ports,

    /// List banks, or the settings of one bank
    #[command(name = "ls")]
    Ls {
        /// Bank to list (`all` for every setting)
        bank: Option<String>,

        /// Only list the first N settings
        #[arg(short, long)]
        limit: Option<usize>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the settings with an NRPN number
    #[command(name = "show")]
    Show {
        /// NRPN number
        nrpn: u16,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a value (or random values) to settings
    #[command(name = "out", allow_negative_numbers = true)]
    Out {
        /// NRPN number, bank name, or `all`
        target: Target,

        /// Value to write, or `random`
        #[arg(default_value = "random")]
        value: ValueSource,

        /// Layer: 0, 1 or both
        #[arg(default_value = "0")]
        layer: LayerSelector,
    },

    /// Name the current patch layers
    #[command(name = "name")]
    Name {
        /// Layer 0 name
        layer0: String,

        /// Layer 1 name
        layer1: Option<String>,
    },

    /// Start the interactive shell
    #[command(name = "shell")]
    Shell,
}
