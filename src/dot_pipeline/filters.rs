//! Preprocessing filter chain
//!
//! Runs on the captured raster in a fixed order: blur, sharpen, saturation,
//! noise. Every filter reads the previous filter's output and writes a new
//! raster; neighbour lookups clamp to the raster edge.

mod color;
mod noise;
mod spatial;

pub use color::saturate;
pub use noise::{add_noise, NoiseSource, SeededNoise, SilentNoise};
pub use spatial::{box_blur, sharpen};

use tracing::debug;

use crate::dot_pipeline::common::Raster;

/// Filter parameters, taken from a `ProcessConfig`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterSettings {
    pub blur_radius: u32,
    pub sharpen: f64,
    pub saturation: f64,
    pub noise: f64,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            blur_radius: 0,
            sharpen: 0.0,
            saturation: 1.0,
            noise: 0.0,
        }
    }
}

/// Applies the whole chain. Filters whose parameter is neutral are skipped.
pub fn apply_chain(input: &Raster, settings: &FilterSettings, rng: &mut dyn NoiseSource) -> Raster {
    let mut out = input.clone();

    if settings.blur_radius > 0 {
        debug!(radius = settings.blur_radius, "Applying box blur");
        out = box_blur(&out, settings.blur_radius);
    }
    if settings.sharpen > 0.0 {
        debug!(strength = settings.sharpen, "Applying sharpen");
        out = sharpen(&out, settings.sharpen);
    }
    if settings.saturation != 1.0 {
        debug!(factor = settings.saturation, "Applying saturation");
        out = saturate(&out, settings.saturation);
    }
    if settings.noise > 0.0 {
        debug!(amplitude = settings.noise, "Adding noise");
        out = add_noise(&out, settings.noise, rng);
    }

    out
}
