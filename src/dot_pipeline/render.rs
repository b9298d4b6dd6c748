//! Preview rendering
//!
//! Draws a dot grid as filled circles on a black canvas, the way a display
//! would show it.

use image::{Rgba, RgbaImage};
use tracing::{debug, instrument};

use crate::dot_pipeline::common::raster::to_channel;
use crate::dot_pipeline::common::{DotCells, DotGrid};

pub const DEFAULT_CELL_PX: u32 = 10;

/// Renders `grid` with `cell_px` pixels per cell and circles of diameter
/// `dot_size * cell_px`.
///
/// Scalar cells are white at opacity `value` over black; color cells use
/// their RGB value. Zero-valued scalar cells are not drawn.
#[instrument(skip(grid), fields(cols = grid.cols, rows = grid.rows))]
pub fn render_preview(grid: &DotGrid, cell_px: u32, dot_size: f64) -> RgbaImage {
    let cell_px = cell_px.max(1);
    let width = grid.cols as u32 * cell_px;
    let height = grid.rows as u32 * cell_px;
    let mut canvas = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 255]));

    let cell = f64::from(cell_px);
    let radius = cell / 2.0 * dot_size.clamp(0.0, 1.0);

    for row in 0..grid.rows {
        for col in 0..grid.cols {
            let idx = row * grid.cols + col;
            let color = match &grid.cells {
                DotCells::Scalar(values) => {
                    let v = values[idx].clamp(0.0, 1.0);
                    if v <= 0.0 {
                        continue;
                    }
                    let c = to_channel(v * 255.0);
                    [c, c, c]
                }
                DotCells::Rgb(values) => values[idx].map(|v| to_channel(v * 255.0)),
            };
            fill_circle(&mut canvas, col as u32 * cell_px, row as u32 * cell_px, cell_px, radius, color);
        }
    }

    debug!(width, height, "Preview rendered");
    canvas
}

fn fill_circle(canvas: &mut RgbaImage, x0: u32, y0: u32, cell_px: u32, radius: f64, [r, g, b]: [u8; 3]) {
    let center = f64::from(cell_px) / 2.0;
    for dy in 0..cell_px {
        for dx in 0..cell_px {
            let px = f64::from(dx) + 0.5 - center;
            let py = f64::from(dy) + 0.5 - center;
            if px * px + py * py <= radius * radius {
                canvas.put_pixel(x0 + dx, y0 + dy, Rgba([r, g, b, 255]));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canvas_size_and_background() {
        let grid = DotGrid::scalar(3, 2, vec![0.0; 6]);
        let img = render_preview(&grid, 10, 0.45);
        assert_eq!(img.dimensions(), (30, 20));
        assert!(img.pixels().all(|p| p.0 == [0, 0, 0, 255]));
    }

    #[test]
    fn test_scalar_dot_brightness_follows_value() {
        let grid = DotGrid::scalar(2, 1, vec![1.0, 0.5]);
        let img = render_preview(&grid, 10, 0.8);
        assert_eq!(img.get_pixel(5, 5).0, [255, 255, 255, 255]);
        assert_eq!(img.get_pixel(15, 5).0, [128, 128, 128, 255]);
        // Corners stay outside the circle.
        assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0, 255]);
    }

    #[test]
    fn test_color_dots_and_radius() {
        let grid = DotGrid::rgb(1, 1, vec![[1.0, 0.0, 0.5]]);
        let small = render_preview(&grid, 20, 0.2);
        assert_eq!(small.get_pixel(10, 10).0, [255, 0, 128, 255]);
        assert_eq!(small.get_pixel(10, 4).0, [0, 0, 0, 255]);

        let large = render_preview(&grid, 20, 1.0);
        assert_eq!(large.get_pixel(10, 1).0, [255, 0, 128, 255]);
    }
}
