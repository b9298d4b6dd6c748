use crate::dot_pipeline::common::Raster;
use crate::dot_pipeline::common::raster::to_channel;

/// Source of uniform random numbers for the noise filter.
pub trait NoiseSource {
    /// Returns a value in [0, 1).
    fn next_unit(&mut self) -> f64;
}

/// `fastrand`-backed noise, reproducible when built from a seed.
#[derive(Debug, Clone)]
pub struct SeededNoise {
    rng: fastrand::Rng,
}

impl SeededNoise {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: fastrand::Rng::new(),
        }
    }
}

impl NoiseSource for SeededNoise {
    fn next_unit(&mut self) -> f64 {
        self.rng.f64()
    }
}

/// Always returns the midpoint, so added noise is exactly zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentNoise;

impl NoiseSource for SilentNoise {
    fn next_unit(&mut self) -> f64 {
        0.5
    }
}

/// Adds uniform noise in `[-amplitude * 255, +amplitude * 255]` to each RGB channel.
pub fn add_noise(input: &Raster, amplitude: f64, rng: &mut dyn NoiseSource) -> Raster {
    let span = amplitude * 255.0;
    let mut out = input.clone();
    for px in out.pixels_mut() {
        for channel in px.iter_mut().take(3) {
            let offset = (rng.next_unit() - 0.5) * 2.0 * span;
            *channel = to_channel(f64::from(*channel) + offset);
        }
        px[3] = 255;
    }
    out
}
