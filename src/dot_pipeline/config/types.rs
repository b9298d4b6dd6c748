use serde::{Deserialize, Serialize};

use crate::dot_pipeline::filters::FilterSettings;
use crate::dot_pipeline::postprocess::PostSettings;
use crate::dot_pipeline::quantize::OutputMode;
use crate::dot_pipeline::tone::ToneCurve;

pub const MIN_GRID_SIZE: usize = 8;
pub const DEFAULT_COLS: usize = 40;
pub const DEFAULT_ROWS: usize = 30;
/// Largest box blur radius, in pixels of the captured grid.
pub const MAX_BLUR_RADIUS: u32 = 100;

/// Output grid size. Both dimensions are at least [`MIN_GRID_SIZE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    cols: usize,
    rows: usize,
}

impl GridConfig {
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols: cols.max(MIN_GRID_SIZE),
            rows: rows.max(MIN_GRID_SIZE),
        }
    }

    /// Like [`new`](Self::new), with zero (unset) dimensions replaced by 40×30 first.
    pub fn or_default(cols: Option<usize>, rows: Option<usize>) -> Self {
        let pick = |value: Option<usize>, default| value.filter(|&v| v > 0).unwrap_or(default);
        Self::new(pick(cols, DEFAULT_COLS), pick(rows, DEFAULT_ROWS))
    }

    /// Applies explicit dimension overrides. `None` keeps the current value;
    /// a zero override is malformed and falls back like [`or_default`](Self::or_default).
    pub fn with_overrides(self, cols: Option<usize>, rows: Option<usize>) -> Self {
        Self::or_default(Some(cols.unwrap_or(self.cols)), Some(rows.unwrap_or(self.rows)))
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cells(&self) -> usize {
        self.cols * self.rows
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self::new(DEFAULT_COLS, DEFAULT_ROWS)
    }
}

/// Snapshot of every processing parameter for one pipeline call.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessConfig {
    pub grid: GridConfig,
    pub output_mode: OutputMode,
    pub threshold: u8,
    pub brightness: i32,
    pub contrast: f64,
    pub gamma: f64,
    pub saturation: f64,
    pub blur_radius: u32,
    pub sharpen: f64,
    /// Noise amplitude in [0, 1].
    pub noise: f64,
    /// Zoom in percent; 100 is a plain stretch.
    pub zoom: f64,
    pub dither: bool,
    pub invert: bool,
    pub color_mode: bool,
    pub flip_h: bool,
    pub flip_v: bool,
    pub smooth_passes: u32,
    pub post_contrast: f64,
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            output_mode: OutputMode::default(),
            threshold: 128,
            brightness: 0,
            contrast: 1.0,
            gamma: 1.0,
            saturation: 1.0,
            blur_radius: 0,
            sharpen: 0.0,
            noise: 0.0,
            zoom: 100.0,
            dither: false,
            invert: false,
            color_mode: false,
            flip_h: false,
            flip_v: false,
            smooth_passes: 0,
            post_contrast: 1.0,
        }
    }
}

impl ProcessConfig {
    pub fn builder() -> ProcessConfigBuilder {
        ProcessConfigBuilder::default()
    }

    pub fn tone_curve(&self) -> ToneCurve {
        ToneCurve::new(self.brightness, self.contrast, self.gamma)
    }

    pub fn filter_settings(&self) -> FilterSettings {
        FilterSettings {
            blur_radius: self.blur_radius,
            sharpen: self.sharpen,
            saturation: self.saturation,
            noise: self.noise,
        }
    }

    pub fn post_settings(&self) -> PostSettings {
        PostSettings {
            flip_h: self.flip_h,
            flip_v: self.flip_v,
            smooth_passes: self.smooth_passes,
            post_contrast: self.post_contrast,
        }
    }

    /// Replaces non-finite or out-of-range values with defaults or their nearest valid value.
    pub fn sanitized(mut self) -> Self {
        let default = Self::default();
        let finite_or = |value: f64, fallback: f64| if value.is_finite() { value } else { fallback };

        self.contrast = finite_or(self.contrast, default.contrast);
        self.gamma = finite_or(self.gamma, default.gamma).max(0.0);
        self.saturation = finite_or(self.saturation, default.saturation).max(0.0);
        self.sharpen = finite_or(self.sharpen, default.sharpen).max(0.0);
        self.noise = finite_or(self.noise, default.noise).clamp(0.0, 1.0);
        self.post_contrast = finite_or(self.post_contrast, default.post_contrast);
        self.blur_radius = self.blur_radius.min(MAX_BLUR_RADIUS);
        if !(self.zoom.is_finite() && self.zoom > 0.0) {
            self.zoom = default.zoom;
        }
        self
    }
}

#[derive(Default)]
pub struct ProcessConfigBuilder {
    grid: Option<GridConfig>,
    output_mode: Option<OutputMode>,
    threshold: Option<u8>,
    brightness: Option<i32>,
    contrast: Option<f64>,
    gamma: Option<f64>,
    saturation: Option<f64>,
    blur_radius: Option<u32>,
    sharpen: Option<f64>,
    noise: Option<f64>,
    zoom: Option<f64>,
    dither: Option<bool>,
    invert: Option<bool>,
    color_mode: Option<bool>,
    flip_h: Option<bool>,
    flip_v: Option<bool>,
    smooth_passes: Option<u32>,
    post_contrast: Option<f64>,
}

impl ProcessConfigBuilder {
    pub fn grid(mut self, grid: GridConfig) -> Self {
        self.grid = Some(grid);
        self
    }

    pub fn output_mode(mut self, mode: OutputMode) -> Self {
        self.output_mode = Some(mode);
        self
    }

    pub fn threshold(mut self, threshold: u8) -> Self {
        self.threshold = Some(threshold);
        self
    }

    pub fn brightness(mut self, brightness: i32) -> Self {
        self.brightness = Some(brightness);
        self
    }

    pub fn contrast(mut self, contrast: f64) -> Self {
        self.contrast = Some(contrast);
        self
    }

    pub fn gamma(mut self, gamma: f64) -> Self {
        self.gamma = Some(gamma);
        self
    }

    pub fn saturation(mut self, saturation: f64) -> Self {
        self.saturation = Some(saturation);
        self
    }

    pub fn blur_radius(mut self, radius: u32) -> Self {
        self.blur_radius = Some(radius);
        self
    }

    pub fn sharpen(mut self, strength: f64) -> Self {
        self.sharpen = Some(strength);
        self
    }

    pub fn noise(mut self, amplitude: f64) -> Self {
        self.noise = Some(amplitude);
        self
    }

    pub fn zoom(mut self, percent: f64) -> Self {
        self.zoom = Some(percent);
        self
    }

    pub fn dither(mut self, dither: bool) -> Self {
        self.dither = Some(dither);
        self
    }

    pub fn invert(mut self, invert: bool) -> Self {
        self.invert = Some(invert);
        self
    }

    pub fn color_mode(mut self, color: bool) -> Self {
        self.color_mode = Some(color);
        self
    }

    pub fn flip_h(mut self, flip: bool) -> Self {
        self.flip_h = Some(flip);
        self
    }

    pub fn flip_v(mut self, flip: bool) -> Self {
        self.flip_v = Some(flip);
        self
    }

    pub fn smooth_passes(mut self, passes: u32) -> Self {
        self.smooth_passes = Some(passes);
        self
    }

    pub fn post_contrast(mut self, contrast: f64) -> Self {
        self.post_contrast = Some(contrast);
        self
    }

    pub fn build(self) -> ProcessConfig {
        let default = ProcessConfig::default();
        ProcessConfig {
            grid: self.grid.unwrap_or(default.grid),
            output_mode: self.output_mode.unwrap_or(default.output_mode),
            threshold: self.threshold.unwrap_or(default.threshold),
            brightness: self.brightness.unwrap_or(default.brightness),
            contrast: self.contrast.unwrap_or(default.contrast),
            gamma: self.gamma.unwrap_or(default.gamma),
            saturation: self.saturation.unwrap_or(default.saturation),
            blur_radius: self.blur_radius.unwrap_or(default.blur_radius),
            sharpen: self.sharpen.unwrap_or(default.sharpen),
            noise: self.noise.unwrap_or(default.noise),
            zoom: self.zoom.unwrap_or(default.zoom),
            dither: self.dither.unwrap_or(default.dither),
            invert: self.invert.unwrap_or(default.invert),
            color_mode: self.color_mode.unwrap_or(default.color_mode),
            flip_h: self.flip_h.unwrap_or(default.flip_h),
            flip_v: self.flip_v.unwrap_or(default.flip_v),
            smooth_passes: self.smooth_passes.unwrap_or(default.smooth_passes),
            post_contrast: self.post_contrast.unwrap_or(default.post_contrast),
        }
        .sanitized()
    }
}
