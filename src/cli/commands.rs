//! CLI Command Implementations
//!
//! A [`Session`] holds the loaded registry, the current channel and the MIDI
//! output. Both the one-shot subcommands and the interactive shell run through it.

use std::io::Write;

use log::{info, warn};

use super::Commands;
use crate::dispatch::{send_groups, DispatchSummary, Dispatcher, Outcome, Target, ValueSource};
use crate::error::{P12Error, Result};
use crate::midi::{list_output_ports, MidiOutPort, MidiTransport, RecordingTransport};
use crate::nrpn::{
    encode_layer_name, format_messages, validate_channel, validate_name, NrpnMessages,
};
use crate::settings::{Layer, LayerSelector, Registry, Setting};

/// State shared by every command
pub struct Session {
    registry: Registry,
    channel: u8,
    transport: Option<Box<dyn MidiTransport>>,
    dry_run: bool,
}

impl Session {
    /// Create a session without a MIDI output
    pub fn new(registry: Registry, channel: u8) -> Self {
        Self {
            registry,
            channel,
            transport: None,
            dry_run: false,
        }
    }

    /// Print messages instead of sending them
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_transport(mut self, transport: Box<dyn MidiTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn set_transport(&mut self, transport: Box<dyn MidiTransport>) {
        self.transport = Some(transport);
    }

    pub fn channel(&self) -> u8 {
        self.channel
    }

    /// Change the MIDI channel used for every following write
    pub fn set_channel(&mut self, channel: i64) -> Result<u8> {
        self.channel = validate_channel(channel)?;
        Ok(self.channel)
    }

    /// Run one subcommand
    pub fn run(&mut self, command: Commands, out: &mut dyn Write) -> Result<()> {
        match command {
            Commands::Ports => list_ports(out),
            Commands::Ls { bank, limit, json } => self.list(out, bank.as_deref(), limit, json),
            Commands::Show { nrpn, json } => self.show(out, nrpn, json),
            Commands::Out {
                target,
                value,
                layer,
            } => {
                let summary = self.output(out, &target, value, layer)?;
                if summary.nothing_written() {
                    return Err(P12Error::NothingWritten {
                        target: target.to_string(),
                        failures: summary.failed + summary.not_found,
                    });
                }
                Ok(())
            }
            Commands::Name { layer0, layer1 } => self.name(out, &layer0, layer1.as_deref()),
            Commands::Shell => super::shell::run(self, std::io::stdin().lock(), out),
        }
    }

    /// With no bank, list bank names. With a bank, list its settings.
    pub fn list(
        &self,
        out: &mut dyn Write,
        bank: Option<&str>,
        limit: Option<usize>,
        json: bool,
    ) -> Result<()> {
        let Some(name) = bank else {
            let names = self.registry.bank_names();
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&names)?)?;
            } else {
                writeln!(out, "Available banks for the Prophet 12:")?;
                for name in names {
                    writeln!(out, "{}", name)?;
                }
            }
            return Ok(());
        };

        let settings: &[Setting] = if name == "all" {
            self.registry.all_settings()
        } else {
            self.registry
                .lookup_bank(name)
                .map(|bank| bank.settings())
                .ok_or_else(|| P12Error::NotFound {
                    target: Target::Bank(name.to_string()).to_string(),
                })?
        };
        let end = limit.unwrap_or(settings.len()).min(settings.len());

        if json {
            writeln!(out, "{}", serde_json::to_string_pretty(&settings[..end])?)?;
        } else {
            for setting in &settings[..end] {
                writeln!(out, "{}", setting)?;
            }
        }
        Ok(())
    }

    /// Print every setting with NRPN number `number`
    pub fn show(&self, out: &mut dyn Write, number: u16, json: bool) -> Result<()> {
        let settings = self.registry.lookup_by_number(number);
        if json {
            writeln!(out, "{}", serde_json::to_string_pretty(&settings)?)?;
            return Ok(());
        }
        if settings.is_empty() {
            writeln!(out, "No setting with NRPN number {}.", number)?;
            return Ok(());
        }
        for setting in &settings {
            writeln!(out, "====== {} ======", setting.name())?;
            writeln!(out, "NRPN:                {}", setting.number())?;
            writeln!(out, "Minimum value:       {}", setting.min())?;
            writeln!(out, "Maximum value:       {}", setting.max())?;
        }
        Ok(())
    }

    /// Write `value` to every setting `target` resolves to
    ///
    /// Failures are printed inline and do not stop the batch. The encoded
    /// messages are then sent (or printed, in dry-run mode).
    pub fn output(
        &mut self,
        out: &mut dyn Write,
        target: &Target,
        value: ValueSource,
        layers: LayerSelector,
    ) -> Result<DispatchSummary> {
        info!("out {} {} layer {}", target, value, layers);

        let outcomes = Dispatcher::new(&self.registry, self.channel)
            .dispatch_with_thread_rng(target, value, layers);
        for outcome in outcomes.iter().filter(|o| o.is_failure()) {
            writeln!(out, "{}", outcome)?;
        }

        let groups: Vec<NrpnMessages> = outcomes
            .iter()
            .filter_map(Outcome::messages)
            .copied()
            .collect();
        self.send(out, &groups)?;
        Ok(DispatchSummary::from_outcomes(&outcomes))
    }

    /// Write the layer names (layer 0 first)
    ///
    /// Both names are checked before anything is sent.
    pub fn name(&mut self, out: &mut dyn Write, layer0: &str, layer1: Option<&str>) -> Result<()> {
        let names: Vec<(Layer, &str)> = std::iter::once((Layer::Zero, layer0))
            .chain(layer1.map(|n| (Layer::One, n)))
            .collect();

        for (_, name) in &names {
            validate_name(name)?;
        }

        let mut groups = Vec::new();
        for (layer, name) in names {
            groups.extend(encode_layer_name(name, layer, self.channel)?);
        }
        self.send(out, &groups)
    }

    fn send(&mut self, out: &mut dyn Write, groups: &[NrpnMessages]) -> Result<()> {
        if self.dry_run {
            let mut recorder = RecordingTransport::new();
            send_groups(groups, &mut recorder)?;
            for group in recorder.messages().chunks(4) {
                writeln!(out, "{}", format_messages(group))?;
            }
            return Ok(());
        }

        if groups.is_empty() {
            return Ok(());
        }

        let transport = self
            .transport
            .as_mut()
            .ok_or_else(|| P12Error::TransportFailure {
                reason: "no MIDI output port is open".to_string(),
            })?;
        let sent = send_groups(groups, &mut **transport)?;
        info!("Sent {} MIDI messages", sent);
        Ok(())
    }

    /// Connect to the MIDI output port at `index`
    pub fn connect(&mut self, out: &mut dyn Write, index: usize) -> Result<()> {
        let port = MidiOutPort::connect(index)?;
        writeln!(out, "Connected to {}", port.name())?;
        self.set_transport(Box::new(port));
        Ok(())
    }
}

/// List the available MIDI output ports
pub fn list_ports(out: &mut dyn Write) -> Result<()> {
    let ports = list_output_ports();
    if ports.is_empty() {
        warn!("No MIDI output ports found");
        writeln!(
            out,
            "No available MIDI ports. Connect a MIDI device and restart."
        )?;
        return Ok(());
    }
    for port in ports {
        writeln!(out, "{}: {}", port.index, port.name)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Bank;
    use pretty_assertions::assert_eq;

    fn test_session() -> Session {
        let registry = Registry::new(vec![
            Bank::new(
                "osc",
                vec![
                    Setting::new("Osc1 Freq", 0, 0, 120).unwrap(),
                    Setting::new("Osc1 Shape", 2, 0, 4).unwrap(),
                ],
            ),
            Bank::new("lfo", vec![Setting::new("LFO1 Rate", 100, 0, 127).unwrap()]),
        ]);
        Session::new(registry, 0).with_dry_run(true)
    }

    fn run(
        session: &mut Session,
        f: impl FnOnce(&mut Session, &mut Vec<u8>) -> Result<()>,
    ) -> String {
        let mut out: Vec<u8> = Vec::new();
        f(session, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_list_banks() {
        let mut session = test_session();
        let text = run(&mut session, |s, out| s.list(out, None, None, false));
        assert_eq!(text, "Available banks for the Prophet 12:\nlfo\nosc\n");
    }

    #[test]
    fn test_list_bank_with_limit() {
        let mut session = test_session();
        let text = run(&mut session, |s, out| s.list(out, Some("osc"), Some(1), false));
        assert_eq!(text, "0. Osc1 Freq\n");
    }

    #[test]
    fn test_list_unknown_bank() {
        let session = test_session();
        let mut out: Vec<u8> = Vec::new();
        let result = session.list(&mut out, Some("filter"), None, false);
        assert!(matches!(result, Err(P12Error::NotFound { .. })));
    }

    #[test]
    fn test_list_json() {
        let mut session = test_session();
        let text = run(&mut session, |s, out| s.list(out, Some("lfo"), None, true));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value[0]["name"], "LFO1 Rate");
        assert_eq!(value[0]["number"], 100);
    }

    #[test]
    fn test_show() {
        let mut session = test_session();
        let text = run(&mut session, |s, out| s.show(out, 100, false));
        assert!(text.starts_with("====== LFO1 Rate ======\n"));
        assert!(text.contains("Maximum value:       127"));
    }

    #[test]
    fn test_show_missing() {
        let mut session = test_session();
        let text = run(&mut session, |s, out| s.show(out, 7, false));
        assert_eq!(text, "No setting with NRPN number 7.\n");
    }

    #[test]
    fn test_output_dry_run_prints_messages() {
        let mut session = test_session();
        let text = run(&mut session, |s, out| {
            s.output(out, &Target::Number(100), ValueSource::Explicit(64), LayerSelector::Layer0)
                .map(|_| ())
        });
        assert_eq!(text, "B0 63 00 | B0 62 64 | B0 06 00 | B0 26 40\n");
    }

    #[test]
    fn test_output_reports_failures_inline() {
        let mut session = test_session();
        let mut out: Vec<u8> = Vec::new();
        let summary = session
            .output(
                &mut out,
                &Target::Bank("osc".to_string()),
                ValueSource::Explicit(10),
                LayerSelector::Layer0,
            )
            .unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(summary.encoded, 1);
        assert_eq!(summary.failed, 1);
        assert!(text.contains("10 invalid value for Osc1 Shape (2)"));
    }

    #[test]
    fn test_output_without_port() {
        let mut session = test_session().with_dry_run(false);
        let mut out: Vec<u8> = Vec::new();
        let result = session.output(
            &mut out,
            &Target::Number(100),
            ValueSource::Explicit(1),
            LayerSelector::Layer0,
        );
        assert!(matches!(result, Err(P12Error::TransportFailure { .. })));
    }

    #[test]
    fn test_name_dry_run() {
        let mut session = test_session();
        let text = run(&mut session, |s, out| s.name(out, "Hi", Some("Yo")));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        // 'H' = 0x48 at NRPN 480, 'Y' = 0x59 at NRPN 992
        assert_eq!(lines[0], "B0 63 03 | B0 62 60 | B0 06 00 | B0 26 48");
        assert_eq!(lines[2], "B0 63 07 | B0 62 60 | B0 06 00 | B0 26 59");
    }

    #[test]
    fn test_name_checks_both_before_sending() {
        let mut session = test_session();
        let mut out: Vec<u8> = Vec::new();
        let result = session.name(&mut out, "Fine", Some("Not/Fine"));
        assert!(matches!(result, Err(P12Error::InvalidName { .. })));
        assert!(out.is_empty());
    }

    #[test]
    fn test_run_out_fails_when_nothing_written() {
        let mut session = test_session();
        let mut out: Vec<u8> = Vec::new();
        let command = Commands::Out {
            target: Target::Number(2),
            value: ValueSource::Explicit(50),
            layer: LayerSelector::Both,
        };

        let result = session.run(command, &mut out);
        assert!(matches!(
            result,
            Err(P12Error::NothingWritten { failures: 2, .. })
        ));
        assert!(String::from_utf8(out)
            .unwrap()
            .contains("50 invalid value for Osc1 Shape (2)"));
    }

    #[test]
    fn test_run_out_unknown_target() {
        let mut session = test_session();
        let mut out: Vec<u8> = Vec::new();
        let command = Commands::Out {
            target: Target::Bank("filter".to_string()),
            value: ValueSource::Random,
            layer: LayerSelector::Layer0,
        };
        assert!(matches!(
            session.run(command, &mut out),
            Err(P12Error::NothingWritten { failures: 1, .. })
        ));
    }

    #[test]
    fn test_run_out_partial_failure_succeeds() {
        let mut session = test_session();
        let mut out: Vec<u8> = Vec::new();
        let command = Commands::Out {
            target: Target::Bank("osc".to_string()),
            value: ValueSource::Explicit(10),
            layer: LayerSelector::Layer0,
        };
        assert!(session.run(command, &mut out).is_ok());
    }

    #[test]
    fn test_set_channel() {
        let mut session = test_session();
        assert_eq!(session.set_channel(9).unwrap(), 9);
        assert!(session.set_channel(16).is_err());
        assert_eq!(session.channel(), 9);
    }
}
