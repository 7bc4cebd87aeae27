//! Dispatch Module
//!
//! Resolves a target (one NRPN number, a bank, or every setting) to settings,
//! picks the value for each, and encodes one write per requested layer.
//! Failures are recorded per (setting, layer) and never stop the batch.

mod target;

pub use target::{Target, ValueSource};

use std::fmt;

use log::debug;
use rand::Rng;

use crate::error::{P12Error, Result};
use crate::midi::MidiTransport;
use crate::nrpn::{encode, format_messages, NrpnMessages};
use crate::settings::{Layer, LayerSelector, Registry, Setting};

/// Result of one (setting, layer) attempt
#[derive(Debug)]
pub enum Outcome {
    /// Messages ready for the transport; `setting` is the layer-resolved address
    Encoded {
        setting: Setting,
        layer: Layer,
        value: i64,
        messages: NrpnMessages,
    },
    /// Layer-global setting on a layer 1 write: nothing to send
    Skipped { setting: Setting, layer: Layer },
    /// Encoding failed (`OutOfRange` or `InvalidChannel`)
    Failed {
        setting: Setting,
        layer: Layer,
        error: P12Error,
    },
    /// The target resolved to no settings
    NotFound { target: Target },
}

impl Outcome {
    pub fn is_encoded(&self) -> bool {
        matches!(self, Outcome::Encoded { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Outcome::Skipped { .. })
    }

    /// True for outcomes a caller should report as a failure
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed { .. } | Outcome::NotFound { .. })
    }

    pub fn messages(&self) -> Option<&NrpnMessages> {
        match self {
            Outcome::Encoded { messages, .. } => Some(messages),
            _ => None,
        }
    }

    /// The error carried by a failed outcome
    pub fn error(&self) -> Option<&P12Error> {
        match self {
            Outcome::Failed { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Encoded {
                setting,
                layer,
                value,
                messages,
            } => write!(
                f,
                "{} [{}] = {}: {}",
                setting,
                layer,
                value,
                format_messages(messages)
            ),
            Outcome::Skipped { setting, layer } => {
                write!(f, "{} [{}] skipped: shared by both layers", setting, layer)
            }
            Outcome::Failed { layer, error, .. } => write!(f, "[{}] {}", layer, error),
            Outcome::NotFound { target } => write!(f, "Nothing found for {}", target),
        }
    }
}

/// Counts of each outcome kind in a batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    pub encoded: usize,
    pub skipped: usize,
    pub failed: usize,
    pub not_found: usize,
}

impl DispatchSummary {
    pub fn from_outcomes(outcomes: &[Outcome]) -> Self {
        Self {
            encoded: outcomes.iter().filter(|o| o.is_encoded()).count(),
            skipped: outcomes.iter().filter(|o| o.is_skipped()).count(),
            failed: outcomes.iter().filter_map(Outcome::error).count(),
            not_found: outcomes
                .iter()
                .filter(|o| matches!(o, Outcome::NotFound { .. }))
                .count(),
        }
    }

    /// True when a batch had failures and wrote nothing at all
    pub fn nothing_written(&self) -> bool {
        self.encoded == 0 && self.failed + self.not_found > 0
    }
}

/// Turns write requests into encoded outcomes against a registry
///
/// The MIDI channel is carried explicitly and used for every encode.
pub struct Dispatcher<'a> {
    registry: &'a Registry,
    channel: u8,
}

impl<'a> Dispatcher<'a> {
    pub fn new(registry: &'a Registry, channel: u8) -> Self {
        Self { registry, channel }
    }

    /// Settings a target refers to, in resolution order
    pub fn resolve(&self, target: &Target) -> Vec<Setting> {
        match target {
            Target::Number(number) => self.registry.lookup_by_number(*number),
            Target::Bank(name) => self
                .registry
                .lookup_bank(name)
                .map(|bank| bank.settings().to_vec())
                .unwrap_or_default(),
            Target::All => self.registry.all_settings().to_vec(),
        }
    }

    /// Encode a write to every setting `target` resolves to
    ///
    /// A random value is drawn once per setting and used for each of its
    /// layers. Outcomes come back in resolution order, layer 0 before layer 1.
    pub fn dispatch<R: Rng>(
        &self,
        target: &Target,
        value: ValueSource,
        layers: LayerSelector,
        rng: &mut R,
    ) -> Vec<Outcome> {
        let settings = self.resolve(target);
        if settings.is_empty() {
            debug!("{} resolved to no settings", target);
            return vec![Outcome::NotFound {
                target: target.clone(),
            }];
        }

        let mut outcomes = Vec::with_capacity(settings.len() * layers.layers().len());
        for setting in &settings {
            let value = match value {
                ValueSource::Explicit(v) => v,
                ValueSource::Random => i64::from(rng.gen_range(setting.min()..=setting.max())),
            };

            for &layer in layers.layers() {
                let outcome = self.encode_layer(setting, layer, value);
                debug!("{}", outcome);
                outcomes.push(outcome);
            }
        }
        outcomes
    }

    /// Same as [`Dispatcher::dispatch`], drawing random values from the thread RNG
    pub fn dispatch_with_thread_rng(
        &self,
        target: &Target,
        value: ValueSource,
        layers: LayerSelector,
    ) -> Vec<Outcome> {
        self.dispatch(target, value, layers, &mut rand::thread_rng())
    }

    fn encode_layer(&self, setting: &Setting, layer: Layer, value: i64) -> Outcome {
        if layer == Layer::One && setting.is_layer_global() {
            return Outcome::Skipped {
                setting: setting.clone(),
                layer,
            };
        }

        let addressed = setting.on_layer(layer);
        match encode(&addressed, value, self.channel) {
            Ok(messages) => Outcome::Encoded {
                setting: addressed,
                layer,
                value,
                messages,
            },
            Err(error) => Outcome::Failed {
                setting: addressed,
                layer,
                error,
            },
        }
    }
}

/// Send the messages of every encoded outcome, in order
///
/// Stops at the first transport error and returns it as `TransportFailure`.
/// Returns the number of messages sent.
pub fn forward<T: MidiTransport + ?Sized>(
    outcomes: &[Outcome],
    transport: &mut T,
) -> Result<usize> {
    send_groups(outcomes.iter().filter_map(Outcome::messages), transport)
}

/// Send message groups one message at a time, in order
///
/// No retries: the first failure ends the transmission.
pub fn send_groups<'m, T: MidiTransport + ?Sized>(
    groups: impl IntoIterator<Item = &'m NrpnMessages>,
    transport: &mut T,
) -> Result<usize> {
    let mut sent = 0;
    for messages in groups {
        for message in messages {
            transport.send(message).map_err(|e| match e {
                P12Error::TransportFailure { .. } => e,
                other => P12Error::TransportFailure {
                    reason: other.to_string(),
                },
            })?;
            sent += 1;
        }
    }
    Ok(sent)
}
