use crate::dot_pipeline::common::Raster;
use crate::dot_pipeline::common::raster::to_channel;

/// Unweighted box average over a `(2 * radius + 1)²` window, per RGB channel.
pub fn box_blur(input: &Raster, radius: u32) -> Raster {
    if radius == 0 {
        return input.clone();
    }
    let r = radius as isize;
    let count = ((2 * r + 1) * (2 * r + 1)) as f64;
    map_pixels(input, |x, y| {
        let mut out = [0u8, 0, 0, 255];
        for (c, slot) in out.iter_mut().take(3).enumerate() {
            let mut sum = 0u64;
            for dy in -r..=r {
                for dx in -r..=r {
                    sum += u64::from(input.channel_clamped(x + dx, y + dy, c));
                }
            }
            *slot = to_channel(sum as f64 / count);
        }
        out
    })
}

/// Unsharp mask with a 4-neighbour Laplacian: `center + (4c - n - s - e - w) * strength`.
pub fn sharpen(input: &Raster, strength: f64) -> Raster {
    map_pixels(input, |x, y| {
        let mut out = [0u8, 0, 0, 255];
        for (c, slot) in out.iter_mut().take(3).enumerate() {
            let at = |dx: isize, dy: isize| f64::from(input.channel_clamped(x + dx, y + dy, c));
            let center = at(0, 0);
            let laplacian = 4.0 * center - at(-1, 0) - at(1, 0) - at(0, -1) - at(0, 1);
            *slot = to_channel(center + laplacian * strength);
        }
        out
    })
}

fn map_pixels(input: &Raster, f: impl Fn(isize, isize) -> [u8; 4]) -> Raster {
    let mut out = input.clone();
    for y in 0..input.height() {
        for x in 0..input.width() {
            out.set_pixel(x, y, f(x as isize, y as isize));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_bright(width: usize, height: usize, x: usize, y: usize) -> Raster {
        let mut raster = Raster::new(width, height).unwrap();
        raster.set_pixel(x, y, [255, 255, 255, 255]);
        raster
    }

    #[test]
    fn test_blur_spreads_evenly() {
        let out = box_blur(&single_bright(5, 5, 2, 2), 1);
        // 255 / 9 = 28.33
        for y in 1..=3 {
            for x in 1..=3 {
                assert_eq!(out.pixel(x, y), [28, 28, 28, 255]);
            }
        }
        assert_eq!(out.pixel(0, 0), [0, 0, 0, 255]);
    }

    #[test]
    fn test_blur_clamps_at_edges() {
        // The corner pixel is counted four times in its own 3x3 window.
        let out = box_blur(&single_bright(4, 4, 0, 0), 1);
        assert_eq!(out.pixel(0, 0)[0], to_channel(255.0 * 4.0 / 9.0));
    }

    #[test]
    fn test_blur_of_uniform_is_uniform() {
        let input = Raster::filled(7, 3, [90, 120, 30, 255]).unwrap();
        assert_eq!(box_blur(&input, 2), input);
    }

    #[test]
    fn test_wide_blur_of_white_stays_white() {
        // 4201² samples of 255 overflow a 32-bit sum.
        let input = Raster::filled(1, 1, [255, 255, 255, 255]).unwrap();
        assert_eq!(box_blur(&input, 2100), input);
    }

    #[test]
    fn test_sharpen_boosts_isolated_peak() {
        let mut input = Raster::filled(3, 3, [100, 100, 100, 255]).unwrap();
        input.set_pixel(1, 1, [120, 120, 120, 255]);
        let out = sharpen(&input, 0.5);
        // laplacian = 4*120 - 4*100 = 80, 120 + 40
        assert_eq!(out.pixel(1, 1), [160, 160, 160, 255]);
        // edge neighbour: 4*100 - 120 - 3*100 = -20 -> 90
        assert_eq!(out.pixel(1, 0)[0], 90);
    }

    #[test]
    fn test_sharpen_rounds_ties_to_even() {
        let mut input = Raster::new(3, 1).unwrap();
        input.set_pixel(1, 0, [1, 1, 1, 255]);
        // laplacian = 4 - 0 - 0 - 1 - 1 = 2, 1 + 2 * 0.75 = 2.5
        assert_eq!(sharpen(&input, 0.75).pixel(1, 0)[0], 2);
    }

    #[test]
    fn test_sharpen_clamps() {
        let out = sharpen(&single_bright(3, 3, 1, 1), 2.0);
        assert_eq!(out.pixel(1, 1)[0], 255);
        assert_eq!(out.pixel(0, 1)[0], 0);
    }
}
