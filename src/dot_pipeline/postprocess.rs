//! Post-processing on the quantized grid
//!
//! Runs in a fixed order: horizontal flip, vertical flip, smoothing, then
//! post-contrast. Works on scalar and RGB cells through [`DotValue`].

use tracing::debug;

use crate::dot_pipeline::common::DotValue;
use crate::dot_pipeline::tone::midpoint_contrast;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PostSettings {
    pub flip_h: bool,
    pub flip_v: bool,
    pub smooth_passes: u32,
    pub post_contrast: f64,
}

impl Default for PostSettings {
    fn default() -> Self {
        Self {
            flip_h: false,
            flip_v: false,
            smooth_passes: 0,
            post_contrast: 1.0,
        }
    }
}

/// Mirrors every row in place.
pub fn flip_h<T: DotValue>(cells: &mut [T], cols: usize, rows: usize) {
    for row in cells.chunks_exact_mut(cols).take(rows) {
        row.reverse();
    }
}

/// Mirrors the row order in place.
pub fn flip_v<T: DotValue>(cells: &mut [T], cols: usize, rows: usize) {
    for row in 0..rows / 2 {
        let mirror = rows - 1 - row;
        for col in 0..cols {
            cells.swap(row * cols + col, mirror * cols + col);
        }
    }
}

/// `passes` rounds of averaging each cell with its in-bounds N/S/E/W neighbours.
///
/// Each round reads only the previous round's buffer. Missing neighbours are
/// left out of both the sum and the divisor.
pub fn smooth<T: DotValue>(cells: &[T], cols: usize, rows: usize, passes: u32) -> Vec<T> {
    let mut current = cells.to_vec();
    let mut next = current.clone();

    for _ in 0..passes {
        for row in 0..rows {
            for col in 0..cols {
                let mut sum = current[row * cols + col];
                let mut count = 1.0;
                let neighbours = [
                    (row > 0).then(|| (row - 1, col)),
                    (row + 1 < rows).then(|| (row + 1, col)),
                    (col > 0).then(|| (row, col - 1)),
                    (col + 1 < cols).then(|| (row, col + 1)),
                ];
                for (r, c) in neighbours.into_iter().flatten() {
                    sum = sum.add(current[r * cols + c]);
                    count += 1.0;
                }
                next[row * cols + col] = sum.map(|v| v / count);
            }
        }
        std::mem::swap(&mut current, &mut next);
    }

    current
}

/// Midpoint contrast on every channel, clamped to [0, 1].
pub fn post_contrast<T: DotValue>(cells: &mut [T], contrast: f64) {
    for cell in cells.iter_mut() {
        *cell = cell.map(|v| midpoint_contrast(v, contrast).clamp(0.0, 1.0));
    }
}

pub fn invert<T: DotValue>(cells: &mut [T]) {
    for cell in cells.iter_mut() {
        *cell = cell.map(|v| 1.0 - v);
    }
}

/// Applies the enabled post-processing steps in order.
pub fn apply<T: DotValue>(mut cells: Vec<T>, cols: usize, rows: usize, settings: &PostSettings) -> Vec<T> {
    if settings.flip_h {
        flip_h(&mut cells, cols, rows);
    }
    if settings.flip_v {
        flip_v(&mut cells, cols, rows);
    }
    if settings.smooth_passes > 0 {
        debug!(passes = settings.smooth_passes, "Smoothing grid");
        cells = smooth(&cells, cols, rows, settings.smooth_passes);
    }
    if settings.post_contrast != 1.0 {
        post_contrast(&mut cells, settings.post_contrast);
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variance(values: &[f64]) -> f64 {
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64
    }

    fn ramp(cols: usize, rows: usize) -> Vec<f64> {
        (0..cols * rows).map(|i| i as f64 / (cols * rows) as f64).collect()
    }

    #[test]
    fn test_flips_are_involutions() {
        for (cols, rows) in [(4, 4), (5, 3), (8, 9)] {
            let original = ramp(cols, rows);
            let mut cells = original.clone();
            flip_h(&mut cells, cols, rows);
            assert_ne!(cells, original);
            flip_h(&mut cells, cols, rows);
            assert_eq!(cells, original);

            flip_v(&mut cells, cols, rows);
            assert_ne!(cells, original);
            flip_v(&mut cells, cols, rows);
            assert_eq!(cells, original);
        }
    }

    #[test]
    fn test_flip_h_mirrors_columns() {
        let mut cells = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        flip_h(&mut cells, 3, 2);
        assert_eq!(cells, vec![3.0, 2.0, 1.0, 6.0, 5.0, 4.0]);
        flip_v(&mut cells, 3, 2);
        assert_eq!(cells, vec![6.0, 5.0, 4.0, 3.0, 2.0, 1.0]);
    }

    #[test]
    fn test_smooth_excludes_out_of_bounds_neighbours() {
        let mut cells = vec![0.0; 16];
        cells[0] = 255.0;
        let out = smooth(&cells, 4, 4, 1);
        assert_eq!(out[0], 85.0);
        assert_eq!(out[1], 63.75);
        assert_eq!(out[4], 63.75);
        assert_eq!(out[5], 0.0);
        assert_eq!(out[15], 0.0);
    }

    #[test]
    fn test_smooth_reads_previous_pass_only() {
        // An in-place pass would leak the updated left cell into the right one.
        let out = smooth(&[1.0, 0.0], 2, 1, 1);
        assert_eq!(out, vec![0.5, 0.5]);
    }

    #[test]
    fn test_smooth_variance_is_non_increasing() {
        let mut state = 17u32;
        let cells: Vec<f64> = (0..12 * 9)
            .map(|_| {
                state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
                f64::from(state >> 16 & 0xff) / 255.0
            })
            .collect();
        let mut last = variance(&cells);
        for passes in 1..6 {
            let v = variance(&smooth(&cells, 12, 9, passes));
            assert!(v <= last + 1e-12, "pass {passes}: {v} > {last}");
            last = v;
        }
        assert_eq!(smooth(&[0.4; 9], 3, 3, 4), vec![0.4; 9]);
    }

    #[test]
    fn test_rgb_channels_share_neighbourhood() {
        let cells = vec![[1.0, 0.0, 0.5], [0.0, 1.0, 0.5]];
        let out = smooth(&cells, 2, 1, 1);
        assert_eq!(out, vec![[0.5, 0.5, 0.5], [0.5, 0.5, 0.5]]);
    }

    #[test]
    fn test_post_contrast_and_invert_clamp() {
        let mut cells = vec![0.0, 0.25, 0.5, 1.0];
        post_contrast(&mut cells, 2.0);
        assert_eq!(cells, vec![0.0, 0.0, 0.5, 1.0]);
        invert(&mut cells);
        assert_eq!(cells, vec![1.0, 1.0, 0.5, 0.0]);

        let mut rgb = vec![[0.2, 0.6, 1.0]];
        invert(&mut rgb);
        assert!((rgb[0][0] - 0.8).abs() < 1e-12);
        assert!((rgb[0][1] - 0.4).abs() < 1e-12);
        assert_eq!(rgb[0][2], 0.0);
    }

    #[test]
    fn test_apply_runs_flip_before_smooth() {
        let settings = PostSettings {
            flip_h: true,
            smooth_passes: 1,
            ..PostSettings::default()
        };
        let out = apply(vec![3.0, 0.0, 0.0], 3, 1, &settings);
        assert_eq!(out, vec![0.0, 1.0, 1.5]);
    }
}
