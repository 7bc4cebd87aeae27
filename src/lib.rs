//! Prophet12 - NRPN control for the Prophet 12 synthesizer
//!
//! Translates a symbolic setting (looked up by NRPN number or bank) and a
//! target value into the Control Change messages the device expects.
//!
//! # Architecture
//!
//! - `settings`: settings, layers, and the registry of banks loaded from CSV
//! - `nrpn`: the four-message NRPN encoding and layer names
//! - `dispatch`: resolves targets and layers into per-setting outcomes
//! - `midi`: the send-only transport (midir output port)
//! - `cli`: subcommands and the interactive shell

pub mod cli;
pub mod dispatch;
pub mod error;
pub mod midi;
pub mod nrpn;
pub mod settings;

pub use error::{P12Error, Result};
