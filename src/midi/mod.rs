//! MIDI Output Module
//!
//! Send-only transport for encoded messages. Messages go out one at a time,
//! in the order given; each send finishes before the next starts.

mod output;

pub use output::{list_output_ports, MidiOutPort, MidiPortInfo};

use crate::error::Result;
use crate::nrpn::MidiMessage;

/// Destination for raw MIDI messages
pub trait MidiTransport {
    /// Send one message, blocking until it is handed to the device
    fn send(&mut self, message: &MidiMessage) -> Result<()>;
}

impl<T: MidiTransport + ?Sized> MidiTransport for Box<T> {
    fn send(&mut self, message: &MidiMessage) -> Result<()> {
        (**self).send(message)
    }
}

/// Transport that keeps every message it is given
///
/// Backs `--dry-run` and the tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingTransport {
    messages: Vec<MidiMessage>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages sent so far, oldest first
    pub fn messages(&self) -> &[MidiMessage] {
        &self.messages
    }
}

impl MidiTransport for RecordingTransport {
    fn send(&mut self, message: &MidiMessage) -> Result<()> {
        self.messages.push(*message);
        Ok(())
    }
}
