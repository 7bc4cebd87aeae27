//! NRPN encoder
//!
//! Turns a (setting, value, channel) triple into the four Control Change
//! messages the device expects. The parameter number must be latched before the
//! data is written, so the order of the four messages is fixed.

use crate::error::{P12Error, Result};
use crate::settings::{Setting, MAX_14BIT};

// ============================================================================
// Constants
// ============================================================================

/// Control Change status nibble
pub const CONTROL_CHANGE: u8 = 0xB0;

/// NRPN parameter number MSB controller
pub const NRPN_MSB: u8 = 0x63;

/// NRPN parameter number LSB controller
pub const NRPN_LSB: u8 = 0x62;

/// Data entry MSB controller
pub const DATA_ENTRY_MSB: u8 = 0x06;

/// Data entry LSB controller
pub const DATA_ENTRY_LSB: u8 = 0x26;

/// Highest MIDI channel (channels are numbered from 0)
pub const MAX_CHANNEL: u8 = 15;

/// One raw three-byte MIDI message
pub type MidiMessage = [u8; 3];

/// The four messages of one NRPN write
pub type NrpnMessages = [MidiMessage; 4];

// ============================================================================
// Encoding
// ============================================================================

/// Check that `channel` is a MIDI channel number (0-15)
pub fn validate_channel(channel: i64) -> Result<u8> {
    u8::try_from(channel)
        .ok()
        .filter(|c| *c <= MAX_CHANNEL)
        .ok_or(P12Error::InvalidChannel { channel })
}

/// Encode a write of `value` to `setting` on `channel`
///
/// The range check here is the only value gate in the crate.
///
/// # Errors
/// - `InvalidChannel` if `channel` is above 15
/// - `OutOfRange` if `value` is outside `setting.min()..=setting.max()`
pub fn encode(setting: &Setting, value: i64, channel: u8) -> Result<NrpnMessages> {
    let channel = validate_channel(i64::from(channel))?;

    if !setting.accepts(value) {
        return Err(P12Error::OutOfRange {
            name: setting.name().to_string(),
            number: setting.number(),
            value,
            min: setting.min(),
            max: setting.max(),
        });
    }
    // Bounded by setting.max(), which fits in 14 bits
    let value = value as u16;

    // Setting::new keeps every layer 1 address within 14 bits
    let number = setting.number();
    debug_assert!(number <= MAX_14BIT);
    let n_lsb = (number & 0x7F) as u8;
    let n_msb = (number >> 7) as u8;
    let v_lsb = (value & 0x7F) as u8;
    let v_msb = (value >> 7) as u8;
    let status = CONTROL_CHANGE | channel;

    Ok([
        [status, NRPN_MSB, n_msb],
        [status, NRPN_LSB, n_lsb],
        [status, DATA_ENTRY_MSB, v_msb],
        [status, DATA_ENTRY_LSB, v_lsb],
    ])
}

/// Render messages as hex, one message per group
pub fn format_messages(messages: &[MidiMessage]) -> String {
    messages
        .iter()
        .map(|m| format!("{:02X} {:02X} {:02X}", m[0], m[1], m[2]))
        .collect::<Vec<_>>()
        .join(" | ")
}
