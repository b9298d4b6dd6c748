use tracing::debug;

use crate::dot_pipeline::capture::source::PixelSource;
use crate::dot_pipeline::common::error::Result;
use crate::dot_pipeline::common::raster::{to_channel, BLACK};
use crate::dot_pipeline::common::Raster;

/// Axis-aligned rectangle in pixel units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

/// Source and destination rectangles for one capture.
///
/// * zoom = 100%: whole source stretched over the whole destination
/// * zoom > 100%: centered source crop of `source / factor`, stretched over the destination
/// * zoom < 100%: whole source letterboxed into a centered `target * factor` area, rest black
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomLayout {
    pub src: Rect,
    pub dst: Rect,
}

impl ZoomLayout {
    pub fn new(src_w: usize, src_h: usize, cols: usize, rows: usize, zoom_percent: f64) -> Self {
        let (sw, sh) = (src_w as f64, src_h as f64);
        let (cw, ch) = (cols as f64, rows as f64);
        let full_src = Rect { x: 0.0, y: 0.0, w: sw, h: sh };
        let full_dst = Rect { x: 0.0, y: 0.0, w: cw, h: ch };

        let factor = if zoom_percent.is_finite() && zoom_percent > 0.0 {
            zoom_percent / 100.0
        } else {
            1.0
        };

        if factor > 1.0 {
            let (w, h) = (sw / factor, sh / factor);
            Self {
                src: Rect { x: (sw - w) / 2.0, y: (sh - h) / 2.0, w, h },
                dst: full_dst,
            }
        } else if factor < 1.0 {
            let (w, h) = (cw * factor, ch * factor);
            Self {
                src: full_src,
                dst: Rect { x: (cw - w) / 2.0, y: (ch - h) / 2.0, w, h },
            }
        } else {
            Self { src: full_src, dst: full_dst }
        }
    }
}

/// Resamples `source` into a `cols × rows` raster with bilinear filtering.
///
/// Returns `Ok(None)` when the source is not ready. Output alpha is always 255.
pub fn capture<S: PixelSource + ?Sized>(
    source: &S,
    cols: usize,
    rows: usize,
    zoom_percent: f64,
) -> Result<Option<Raster>> {
    let Some((src_w, src_h)) = source.dimensions().filter(|&(w, h)| w > 0 && h > 0) else {
        debug!("Pixel source not ready, skipping capture");
        return Ok(None);
    };

    let layout = ZoomLayout::new(src_w, src_h, cols, rows, zoom_percent);
    let mut out = Raster::new(cols, rows)?;
    let (src, dst) = (layout.src, layout.dst);

    for y in 0..rows {
        let cy = y as f64 + 0.5;
        if cy < dst.y || cy >= dst.y + dst.h {
            continue;
        }
        let sy = src.y + (cy - dst.y) / dst.h * src.h - 0.5;
        for x in 0..cols {
            let cx = x as f64 + 0.5;
            if cx < dst.x || cx >= dst.x + dst.w {
                continue;
            }
            let sx = src.x + (cx - dst.x) / dst.w * src.w - 0.5;
            out.set_pixel(x, y, bilinear(source, src_w, src_h, sx, sy));
        }
    }

    Ok(Some(out))
}

fn bilinear<S: PixelSource + ?Sized>(source: &S, w: usize, h: usize, sx: f64, sy: f64) -> [u8; 4] {
    let sx = sx.clamp(0.0, (w - 1) as f64);
    let sy = sy.clamp(0.0, (h - 1) as f64);
    let x0 = sx.floor() as usize;
    let y0 = sy.floor() as usize;
    let x1 = (x0 + 1).min(w - 1);
    let y1 = (y0 + 1).min(h - 1);
    let fx = sx - x0 as f64;
    let fy = sy - y0 as f64;

    let p00 = source.read_pixel(x0, y0);
    let p10 = source.read_pixel(x1, y0);
    let p01 = source.read_pixel(x0, y1);
    let p11 = source.read_pixel(x1, y1);

    let mut out = BLACK;
    for c in 0..3 {
        let top = f64::from(p00[c]) * (1.0 - fx) + f64::from(p10[c]) * fx;
        let bottom = f64::from(p01[c]) * (1.0 - fx) + f64::from(p11[c]) * fx;
        out[c] = to_channel(top * (1.0 - fy) + bottom * fy);
    }
    out
}
