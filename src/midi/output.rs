//! midir-backed MIDI output port

use log::info;
use midir::{MidiOutput, MidiOutputConnection};

use super::MidiTransport;
use crate::error::{P12Error, Result};
use crate::nrpn::MidiMessage;

const CLIENT_NAME: &str = "prophet12";

/// Information about a MIDI output port
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MidiPortInfo {
    pub name: String,
    pub index: usize,
}

/// List available MIDI output ports
///
/// Returns an empty list if the MIDI backend cannot be opened.
pub fn list_output_ports() -> Vec<MidiPortInfo> {
    let midi_out = match MidiOutput::new("prophet12-list") {
        Ok(m) => m,
        Err(_) => return Vec::new(),
    };

    midi_out
        .ports()
        .iter()
        .enumerate()
        .filter_map(|(index, port)| {
            midi_out
                .port_name(port)
                .ok()
                .map(|name| MidiPortInfo { name, index })
        })
        .collect()
}

/// Open connection to one MIDI output port
pub struct MidiOutPort {
    connection: MidiOutputConnection,
    name: String,
}

impl MidiOutPort {
    /// Connect to the output port at `index` (as listed by [`list_output_ports`])
    pub fn connect(index: usize) -> Result<Self> {
        let midi_out = MidiOutput::new(CLIENT_NAME).map_err(|e| P12Error::TransportFailure {
            reason: format!("failed to create MIDI output: {}", e),
        })?;

        let ports = midi_out.ports();
        let port = ports.get(index).ok_or_else(|| P12Error::TransportFailure {
            reason: format!(
                "MIDI port {} not found ({} ports available)",
                index,
                ports.len()
            ),
        })?;
        let name = midi_out
            .port_name(port)
            .unwrap_or_else(|_| format!("port {}", index));

        let connection = midi_out
            .connect(port, "prophet12-out")
            .map_err(|e| P12Error::TransportFailure {
                reason: format!("failed to connect to MIDI port '{}': {}", name, e),
            })?;

        info!("Connected to MIDI output '{}'", name);
        Ok(Self { connection, name })
    }

    /// Name of the connected port
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl MidiTransport for MidiOutPort {
    fn send(&mut self, message: &MidiMessage) -> Result<()> {
        self.connection
            .send(message)
            .map_err(|e| P12Error::TransportFailure {
                reason: e.to_string(),
            })
    }
}
