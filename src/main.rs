//! Prophet12 CLI
//!
//! Command-line interface for setting Prophet 12 parameters over MIDI.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use env_logger::Env;
use log::{error, info, warn};

use prophet12::cli::commands::{list_ports, Session};
use prophet12::cli::{shell, Cli, Commands};
use prophet12::midi::MidiOutPort;
use prophet12::settings::load_dir;
use prophet12::Result;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logger
    let default_filter = if cli.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    info!("Prophet12 v{}", env!("CARGO_PKG_VERSION"));

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("[{}] {}", e.error_code(), e);
            eprintln!("Error: {}", e);
            if let Some(suggestion) = e.recovery_suggestion() {
                eprintln!("{}", suggestion);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    // Listing ports needs no banks
    if let Some(Commands::Ports) = cli.command {
        return list_ports(&mut out);
    }

    let loaded = load_dir(&cli.banks_dir)?;
    if !loaded.rejected.is_empty() {
        warn!("Skipped {} malformed bank records", loaded.rejected.len());
    }
    if loaded.registry.is_empty() {
        warn!("No settings loaded from {}", cli.banks_dir.display());
    }

    let mut session = Session::new(loaded.registry, cli.channel).with_dry_run(cli.dry_run);
    if let Some(port) = cli.port {
        if cli.dry_run {
            info!("Dry run: not opening MIDI port {}", port);
        } else {
            session = session.with_transport(Box::new(MidiOutPort::connect(port)?));
        }
    }

    match cli.command {
        Some(command) => session.run(command, &mut out),
        None => shell::run(&mut session, io::stdin().lock(), &mut out),
    }
}
