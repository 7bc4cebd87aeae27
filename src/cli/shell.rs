//! Interactive shell
//!
//! Line-oriented command loop. Every error is printed and the session carries
//! on; only `quit` or end of input leave the loop.

use std::io::{BufRead, Write};

use log::debug;

use super::commands::{list_ports, Session};
use crate::dispatch::{Target, ValueSource};
use crate::error::{P12Error, Result};
use crate::settings::LayerSelector;

const PROMPT: &str = "(p12) ";

const HELP: &str = "\
Commands:
  channel [n]                              show or change the MIDI channel (0-15)
  ls [bank|all] [count]                    list banks, or the settings in a bank
  show <nrpn>                              show the settings with an NRPN number
  out <nrpn|bank|all> [value|random] [0|1|both]
                                           write a value (random by default)
  name <layer0 name> [layer1 name]         name the current patch layers
  midi [port]                              list MIDI ports, or connect to one
  help                                     show this help
  quit                                     leave the shell";

/// One parsed shell line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Channel(Option<i64>),
    Ls {
        bank: Option<String>,
        limit: Option<usize>,
    },
    Show(u16),
    Out {
        target: Target,
        value: ValueSource,
        layer: LayerSelector,
    },
    Name {
        layer0: String,
        layer1: Option<String>,
    },
    Midi(Option<usize>),
    Help,
    Quit,
    Empty,
}

fn usage(text: &str) -> P12Error {
    P12Error::InvalidArgument {
        reason: format!("usage: {}", text),
    }
}

fn parse_number<T: std::str::FromStr>(arg: &str, what: &str) -> Result<T> {
    arg.parse().map_err(|_| P12Error::InvalidArgument {
        reason: format!("{} must be a number, got '{}'", what, arg),
    })
}

/// Parse one line of shell input
pub fn parse_line(line: &str) -> Result<ShellCommand> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(ShellCommand::Empty);
    };
    let args: Vec<&str> = words.collect();

    match command {
        "channel" => match args.as_slice() {
            [] => Ok(ShellCommand::Channel(None)),
            [n] => Ok(ShellCommand::Channel(Some(parse_number(n, "channel")?))),
            _ => Err(usage("channel [n]")),
        },
        "ls" => match args.as_slice() {
            [] => Ok(ShellCommand::Ls {
                bank: None,
                limit: None,
            }),
            [bank] => Ok(ShellCommand::Ls {
                bank: Some(bank.to_string()),
                limit: None,
            }),
            [bank, count] => Ok(ShellCommand::Ls {
                bank: Some(bank.to_string()),
                limit: Some(parse_number(count, "count")?),
            }),
            _ => Err(usage("ls [bank|all] [count]")),
        },
        "show" => match args.as_slice() {
            [n] => Ok(ShellCommand::Show(parse_number(n, "NRPN number")?)),
            _ => Err(usage("show <nrpn>")),
        },
        "out" => {
            if args.is_empty() || args.len() > 3 {
                return Err(usage("out <nrpn|bank|all> [value|random] [0|1|both]"));
            }
            Ok(ShellCommand::Out {
                target: args[0].parse()?,
                value: args
                    .get(1)
                    .map(|v| v.parse::<ValueSource>())
                    .transpose()?
                    .unwrap_or_default(),
                layer: args
                    .get(2)
                    .map(|l| l.parse::<LayerSelector>())
                    .transpose()?
                    .unwrap_or_default(),
            })
        }
        "name" => match args.as_slice() {
            [layer0] => Ok(ShellCommand::Name {
                layer0: layer0.to_string(),
                layer1: None,
            }),
            [layer0, layer1] => Ok(ShellCommand::Name {
                layer0: layer0.to_string(),
                layer1: Some(layer1.to_string()),
            }),
            _ => Err(usage("name <layer0 name> [layer1 name]")),
        },
        "midi" => match args.as_slice() {
            [] => Ok(ShellCommand::Midi(None)),
            [port] => Ok(ShellCommand::Midi(Some(parse_number(port, "port")?))),
            _ => Err(usage("midi [port]")),
        },
        "help" | "?" => Ok(ShellCommand::Help),
        "quit" | "exit" | "EOF" => Ok(ShellCommand::Quit),
        other => Err(P12Error::InvalidArgument {
            reason: format!("unknown command '{}', try 'help'", other),
        }),
    }
}

/// Run one parsed command. Returns false when the shell should exit.
pub fn execute(session: &mut Session, command: ShellCommand, out: &mut dyn Write) -> Result<bool> {
    match command {
        ShellCommand::Empty => {}
        ShellCommand::Channel(channel) => {
            if let Some(channel) = channel {
                session.set_channel(channel)?;
            }
            writeln!(out, "{}", session.channel())?;
        }
        ShellCommand::Ls { bank, limit } => session.list(out, bank.as_deref(), limit, false)?,
        ShellCommand::Show(number) => session.show(out, number, false)?,
        ShellCommand::Out {
            target,
            value,
            layer,
        } => {
            session.output(out, &target, value, layer)?;
        }
        ShellCommand::Name { layer0, layer1 } => session.name(out, &layer0, layer1.as_deref())?,
        ShellCommand::Midi(None) => list_ports(out)?,
        ShellCommand::Midi(Some(index)) => session.connect(out, index)?,
        ShellCommand::Help => writeln!(out, "{}", HELP)?,
        ShellCommand::Quit => return Ok(false),
    }
    Ok(true)
}

/// Read commands from `input` until `quit` or end of input
pub fn run<R: BufRead>(session: &mut Session, mut input: R, out: &mut dyn Write) -> Result<()> {
    let mut line = String::new();
    loop {
        write!(out, "{}", PROMPT)?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            return Ok(());
        }
        debug!("shell: {}", line.trim_end());

        match parse_line(&line).and_then(|command| execute(session, command, out)) {
            Ok(true) => {}
            Ok(false) => return Ok(()),
            Err(e) if e.is_recoverable() => {
                writeln!(out, "{}", e)?;
                if let Some(suggestion) = e.recovery_suggestion() {
                    writeln!(out, "{}", suggestion)?;
                }
            }
            Err(e) => return Err(e),
        }
    }
}
