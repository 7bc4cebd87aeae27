//! Setting - One controllable device parameter
//!
//! A setting is addressed by its NRPN number. The device holds two parallel
//! parameter sets (layers). Layer 1 addresses sit a fixed 512 above layer 0.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{P12Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// Offset between a layer 0 NRPN number and its layer 1 counterpart
pub const LAYER1_OFFSET: u16 = 512;

/// Largest value a 14-bit NRPN field can carry
pub const MAX_14BIT: u16 = 0x3FFF;

/// "Split point" setting, shared by both layers
pub const SPLIT_POINT: u16 = 287;

/// "A/B mode" setting, shared by both layers
pub const AB_MODE: u16 = 288;

/// Settings that exist once on the device rather than once per layer
pub const LAYER_GLOBAL_NUMBERS: [u16; 2] = [SPLIT_POINT, AB_MODE];

/// Highest layer 0 number whose layer 1 address still fits in 14 bits
pub const MAX_SETTING_NUMBER: u16 = MAX_14BIT - LAYER1_OFFSET;

// ============================================================================
// Setting
// ============================================================================

/// Immutable record describing one device parameter
///
/// `min` and `max` are inclusive bounds, and `min <= max` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Setting {
    name: String,
    number: u16,
    min: u16,
    max: u16,
}

impl Setting {
    /// Create a new setting
    ///
    /// # Errors
    /// Returns `InvalidArgument` if `min > max` or if the number or a bound
    /// does not fit in 14 bits.
    pub fn new(name: impl Into<String>, number: u16, min: u16, max: u16) -> Result<Self> {
        let name = name.into();
        if min > max {
            return Err(P12Error::InvalidArgument {
                reason: format!("{} ({}): min {} is above max {}", name, number, min, max),
            });
        }
        if number > MAX_SETTING_NUMBER {
            return Err(P12Error::InvalidArgument {
                reason: format!(
                    "{} ({}): number above {} has no layer 1 address",
                    name, number, MAX_SETTING_NUMBER
                ),
            });
        }
        if max > MAX_14BIT {
            return Err(P12Error::InvalidArgument {
                reason: format!("{} ({}): max {} does not fit in 14 bits", name, number, max),
            });
        }
        Ok(Self {
            name,
            number,
            min,
            max,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn number(&self) -> u16 {
        self.number
    }

    pub fn min(&self) -> u16 {
        self.min
    }

    pub fn max(&self) -> u16 {
        self.max
    }

    /// Check whether `value` lies within the inclusive bounds
    pub fn accepts(&self, value: i64) -> bool {
        (i64::from(self.min)..=i64::from(self.max)).contains(&value)
    }

    /// True for the settings the device does not replicate per layer
    pub fn is_layer_global(&self) -> bool {
        LAYER_GLOBAL_NUMBERS.contains(&self.number)
    }

    /// Layer 1 counterpart of this (layer 0) setting
    ///
    /// Same name and bounds, number raised by [`LAYER1_OFFSET`]. Layer-global
    /// settings come back unchanged since they have no layer 1 address.
    pub fn to_layer1(&self) -> Setting {
        if self.is_layer_global() {
            return self.clone();
        }
        Setting {
            name: self.name.clone(),
            number: self.number + LAYER1_OFFSET,
            min: self.min,
            max: self.max,
        }
    }

    /// This setting as addressed on `layer`
    pub fn on_layer(&self, layer: Layer) -> Setting {
        match layer {
            Layer::Zero => self.clone(),
            Layer::One => self.to_layer1(),
        }
    }
}

impl fmt::Display for Setting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}", self.number, self.name)
    }
}

// ============================================================================
// Layers
// ============================================================================

/// One of the two parallel parameter sets on the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    Zero,
    One,
}

impl Layer {
    pub fn index(self) -> u8 {
        match self {
            Layer::Zero => 0,
            Layer::One => 1,
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "layer {}", self.index())
    }
}

/// Which layers a write goes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayerSelector {
    #[default]
    Layer0,
    Layer1,
    Both,
}

impl LayerSelector {
    /// Layers covered by this selector, layer 0 first
    pub fn layers(self) -> &'static [Layer] {
        match self {
            LayerSelector::Layer0 => &[Layer::Zero],
            LayerSelector::Layer1 => &[Layer::One],
            LayerSelector::Both => &[Layer::Zero, Layer::One],
        }
    }
}

impl FromStr for LayerSelector {
    type Err = P12Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "0" => Ok(LayerSelector::Layer0),
            "1" => Ok(LayerSelector::Layer1),
            "both" => Ok(LayerSelector::Both),
            other => Err(P12Error::InvalidArgument {
                reason: format!("layer must be 0, 1 or both, got '{}'", other),
            }),
        }
    }
}

impl fmt::Display for LayerSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerSelector::Layer0 => write!(f, "0"),
            LayerSelector::Layer1 => write!(f, "1"),
            LayerSelector::Both => write!(f, "both"),
        }
    }
}
