//! Settings Module
//!
//! Device settings, their layer views, and the registry that groups them
//! into named banks.

pub mod loader;
mod registry;
mod setting;

pub use loader::{load_dir, LoadedBanks};
pub use registry::{Bank, Registry};
pub use setting::{
    Layer, LayerSelector, Setting, AB_MODE, LAYER1_OFFSET, LAYER_GLOBAL_NUMBERS, MAX_14BIT,
    MAX_SETTING_NUMBER, SPLIT_POINT,
};
