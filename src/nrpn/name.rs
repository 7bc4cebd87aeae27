//! Layer names
//!
//! Each layer carries a name of up to 20 characters, one NRPN per character.

use super::encoder::{encode, NrpnMessages};
use crate::error::{P12Error, Result};
use crate::settings::{Layer, Setting};

/// NRPN of the first character of the layer 0 name
pub const NAME_NRPN_START: u16 = 480;

/// Longest name the device stores
pub const MAX_NAME_LEN: usize = 20;

/// Lowest character code the device displays
const FIRST_NAME_CHAR: u16 = 32;

/// Highest character code the device displays
const LAST_NAME_CHAR: u16 = 125;

/// Check whether the device can display `c` in a layer name
pub fn is_allowed_name_char(c: char) -> bool {
    matches!(c, ' '..='}') && !matches!(c, '/' | ':' | '<' | '>' | '?' | '\\' | '|')
}

/// Check a layer name before anything is sent
pub fn validate_name(name: &str) -> Result<()> {
    let len = name.chars().count();
    if len > MAX_NAME_LEN {
        return Err(P12Error::InvalidName {
            reason: format!(
                "names must be {} characters or fewer, but '{}' is {} characters",
                MAX_NAME_LEN, name, len
            ),
        });
    }
    if let Some(bad) = name.chars().find(|c| !is_allowed_name_char(*c)) {
        return Err(P12Error::InvalidName {
            reason: format!("character '{}' is not allowed in layer names", bad),
        });
    }
    Ok(())
}

/// Setting holding character `index` of the name on `layer`
pub fn name_char_setting(index: usize, layer: Layer) -> Result<Setting> {
    if index >= MAX_NAME_LEN {
        return Err(P12Error::InvalidName {
            reason: format!("no name character at position {}", index),
        });
    }
    let number = NAME_NRPN_START + index as u16;
    let setting = Setting::new("Layer Name", number, FIRST_NAME_CHAR, LAST_NAME_CHAR)?;
    Ok(setting.on_layer(layer))
}

/// Encode `name` as the name of `layer`
///
/// Returns one message group per character. Nothing is produced if the name
/// fails validation.
pub fn encode_layer_name(name: &str, layer: Layer, channel: u8) -> Result<Vec<NrpnMessages>> {
    validate_name(name)?;

    name.chars()
        .enumerate()
        .map(|(index, c)| {
            let setting = name_char_setting(index, layer)?;
            encode(&setting, i64::from(u32::from(c)), channel)
        })
        .collect()
}
