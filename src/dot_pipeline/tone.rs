//! Tone mapping
//!
//! Brightness, contrast, and gamma applied to a single 0–255 channel. The
//! same curve runs on grayscale luma and on each RGB channel in color mode.

/// Rec. 601 luma weights, shared with the saturation filter.
pub const LUMA_WEIGHTS: [f64; 3] = [0.299, 0.587, 0.114];

pub fn luma(r: u8, g: u8, b: u8) -> f64 {
    LUMA_WEIGHTS[0] * f64::from(r) + LUMA_WEIGHTS[1] * f64::from(g) + LUMA_WEIGHTS[2] * f64::from(b)
}

/// Integer gray level of a pixel, truncated like a byte store.
pub fn gray_level(pixel: [u8; 4]) -> u8 {
    luma(pixel[0], pixel[1], pixel[2]) as u8
}

/// Midpoint contrast on a normalized value: `(v - 0.5) * contrast + 0.5`, unclamped.
pub fn midpoint_contrast(value: f64, contrast: f64) -> f64 {
    (value - 0.5) * contrast + 0.5
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneCurve {
    pub brightness: i32,
    pub contrast: f64,
    pub gamma: f64,
}

impl Default for ToneCurve {
    fn default() -> Self {
        Self {
            brightness: 0,
            contrast: 1.0,
            gamma: 1.0,
        }
    }
}

impl ToneCurve {
    pub fn new(brightness: i32, contrast: f64, gamma: f64) -> Self {
        Self {
            brightness,
            contrast,
            gamma,
        }
    }

    /// Maps a channel value in [0, 255] to a tone-mapped value in [0, 255].
    pub fn apply(&self, value: f64) -> f64 {
        let v = value + f64::from(self.brightness);
        let v = (midpoint_contrast(v / 255.0, self.contrast) * 255.0).clamp(0.0, 255.0);
        ((v / 255.0).powf(self.gamma) * 255.0).clamp(0.0, 255.0)
    }

    /// Tone maps a channel and normalizes the result to [0, 1].
    pub fn apply_normalized(&self, value: u8) -> f64 {
        self.apply(f64::from(value)) / 255.0
    }

    /// Tone maps a row-major gray buffer.
    pub fn apply_gray(&self, gray: &[u8]) -> Vec<f64> {
        gray.iter().map(|&g| self.apply(f64::from(g))).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_curve_keeps_values() {
        let curve = ToneCurve::default();
        for v in [0.0, 1.0, 64.0, 128.0, 254.0, 255.0] {
            assert!((curve.apply(v) - v).abs() < 1e-9);
        }
    }

    #[test]
    fn test_brightness_offsets_then_clamps() {
        let curve = ToneCurve::new(40, 1.0, 1.0);
        assert!((curve.apply(100.0) - 140.0).abs() < 1e-9);
        assert_eq!(curve.apply(250.0), 255.0);
        assert_eq!(ToneCurve::new(-300, 1.0, 1.0).apply(200.0), 0.0);
    }

    #[test]
    fn test_contrast_pivots_around_midpoint() {
        let curve = ToneCurve::new(0, 2.0, 1.0);
        assert!((curve.apply(127.5) - 127.5).abs() < 1e-9);
        assert_eq!(curve.apply(0.0), 0.0);
        assert_eq!(curve.apply(255.0), 255.0);
        assert!(curve.apply(100.0) < 100.0);
        assert!(curve.apply(160.0) > 160.0);
    }

    #[test]
    fn test_gamma_darkens_midtones() {
        let curve = ToneCurve::new(0, 1.0, 2.0);
        let expected = (0.5f64).powf(2.0) * 255.0;
        assert!((curve.apply(127.5) - expected).abs() < 1e-9);
        assert_eq!(curve.apply(255.0), 255.0);
    }

    #[test]
    fn test_gray_level_truncates() {
        assert_eq!(gray_level([255, 255, 255, 255]), 255);
        assert_eq!(gray_level([0, 0, 0, 255]), 0);
        // 0.299 * 100 = 29.9 -> 29
        assert_eq!(gray_level([100, 0, 0, 255]), 29);
    }
}
