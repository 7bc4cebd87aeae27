//! NRPN Module
//!
//! Wire-level encoding of setting writes as MIDI Control Change messages.

mod encoder;
pub mod name;

pub use encoder::{
    encode, format_messages, validate_channel, MidiMessage, NrpnMessages, CONTROL_CHANGE,
    DATA_ENTRY_LSB, DATA_ENTRY_MSB, MAX_CHANNEL, NRPN_LSB, NRPN_MSB,
};
pub use name::{encode_layer_name, validate_name, MAX_NAME_LEN, NAME_NRPN_START};
