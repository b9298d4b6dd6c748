use tracing::debug;

use crate::dot_pipeline::quantize::types::OutputMode;

/// Binary dithering rounds at this midpoint; a cell lights up when its final value is above zero.
const BINARY_MIDPOINT: f64 = 128.0;

/// Floyd–Steinberg error diffusion over a row-major buffer of 0–255 values.
///
/// Cells are visited in strict row-major order and each cell's error is pushed
/// into neighbours that have not been quantized yet:
///
/// ```text
///        X   7
///    3   5   1
/// ```
///
/// A neighbour is clamped to [0, 255] as soon as it receives its share, and
/// the value it finally gets quantized from includes every contribution from
/// earlier cells. The whole buffer is one pass: error carries across row
/// boundaries through the lower neighbours, it is never reset per row.
/// Contributions past the right or bottom edge are dropped.
pub fn diffuse_errors(buf: &mut [f64], cols: usize, rows: usize, quantize: impl Fn(f64) -> f64) {
    debug_assert_eq!(buf.len(), cols * rows);

    let spread = |buf: &mut [f64], i: usize, share: f64| {
        buf[i] = (buf[i] + share).clamp(0.0, 255.0);
    };

    for i in 0..buf.len() {
        let old = buf[i];
        let new = quantize(old);
        buf[i] = new;
        let err = old - new;

        let x = i % cols;
        let y = i / cols;
        if x + 1 < cols {
            spread(buf, i + 1, err * 7.0 / 16.0);
        }
        if y + 1 < rows {
            if x > 0 {
                spread(buf, i + cols - 1, err * 3.0 / 16.0);
            }
            spread(buf, i + cols, err * 5.0 / 16.0);
            if x + 1 < cols {
                spread(buf, i + cols + 1, err / 16.0);
            }
        }
    }
}

fn level_step(levels: u32) -> f64 {
    255.0 / (levels.max(2) - 1) as f64
}

fn nearest_level(value: f64, step: f64) -> f64 {
    (value / step).round() * step
}

/// Reduces a tone-mapped buffer (0–255 per cell) to output values in [0, 1].
pub fn quantize(
    buf: &[f64],
    cols: usize,
    rows: usize,
    mode: OutputMode,
    threshold: u8,
    dither: bool,
) -> Vec<f64> {
    debug!(%mode, dither, cells = buf.len(), "Quantizing grid");

    match (mode, dither) {
        (OutputMode::Full, _) => buf.iter().map(|v| v / 255.0).collect(),
        (OutputMode::Binary, false) => {
            let threshold = f64::from(threshold);
            buf.iter()
                .map(|&v| if v > threshold { 1.0 } else { 0.0 })
                .collect()
        }
        (OutputMode::Binary, true) => {
            let mut work = buf.to_vec();
            diffuse_errors(&mut work, cols, rows, |v| {
                if v < BINARY_MIDPOINT { 0.0 } else { 255.0 }
            });
            work.into_iter()
                .map(|v| if v > 0.0 { 1.0 } else { 0.0 })
                .collect()
        }
        (OutputMode::Levels(levels), false) => {
            let step = level_step(levels);
            buf.iter()
                .map(|&v| (nearest_level(v, step) / 255.0).clamp(0.0, 1.0))
                .collect()
        }
        (OutputMode::Levels(levels), true) => {
            let step = level_step(levels);
            let mut work = buf.to_vec();
            diffuse_errors(&mut work, cols, rows, |v| nearest_level(v, step));
            work.into_iter().map(|v| v / 255.0).collect()
        }
    }
}
