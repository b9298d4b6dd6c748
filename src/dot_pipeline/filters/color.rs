use crate::dot_pipeline::common::Raster;
use crate::dot_pipeline::common::raster::to_channel;
use crate::dot_pipeline::tone::luma;

/// Scales each channel's deviation from luma by `factor`.
///
/// 1.0 leaves the pixel unchanged, 0.0 gives grayscale, above 1.0 oversaturates.
pub fn saturate(input: &Raster, factor: f64) -> Raster {
    let mut out = input.clone();
    for px in out.pixels_mut() {
        let gray = luma(px[0], px[1], px[2]);
        for channel in px.iter_mut().take(3) {
            *channel = to_channel(gray + (f64::from(*channel) - gray) * factor);
        }
        px[3] = 255;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(rgb: [u8; 3]) -> Raster {
        Raster::filled(1, 1, [rgb[0], rgb[1], rgb[2], 255]).unwrap()
    }

    #[test]
    fn test_zero_saturation_is_gray() {
        let out = saturate(&pixel([200, 100, 50]), 0.0);
        let gray = to_channel(luma(200, 100, 50));
        assert_eq!(out.pixel(0, 0), [gray, gray, gray, 255]);
    }

    #[test]
    fn test_unit_saturation_is_identity() {
        let input = pixel([12, 250, 77]);
        assert_eq!(saturate(&input, 1.0), input);
    }

    #[test]
    fn test_oversaturation_pushes_away_from_gray_and_clamps() {
        let out = saturate(&pixel([200, 100, 50]), 3.0);
        let [r, g, b, _] = out.pixel(0, 0);
        assert_eq!(r, 255);
        assert!(g < 100);
        assert_eq!(b, 0);
    }
}
