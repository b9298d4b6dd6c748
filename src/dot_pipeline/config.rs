//! Configuration module
//!
//! Immutable per-call processing configuration, grid size, and named presets.

pub mod presets;
pub mod types;

pub use presets::{
    builtin_presets, custom_preset_id, find_preset, resolve_preset, slugify, CustomPreset, Preset,
    PresetSnapshot,
};
pub use types::{GridConfig, ProcessConfig, ProcessConfigBuilder};
