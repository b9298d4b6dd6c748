//! RGBA raster type

use crate::dot_pipeline::common::error::{PipelineError, Result};

/// Opaque black, the fill used for letterboxed capture areas.
pub const BLACK: [u8; 4] = [0, 0, 0, 255];

/// A W×H grid of RGBA bytes, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: usize,
    height: usize,
    /// Interleaved pixel data [R, G, B, A, R, G, B, A, ...]
    data: Vec<u8>,
}

impl Raster {
    /// Creates an opaque black raster.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        Self::filled(width, height, BLACK)
    }

    pub fn filled(width: usize, height: usize, pixel: [u8; 4]) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(PipelineError::InvalidDimensions(width, height));
        }
        let data = pixel.repeat(width * height);
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Wraps an existing RGBA buffer. The buffer length must be `width * height * 4`.
    pub fn from_rgba(width: usize, height: usize, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 || data.len() != width * height * 4 {
            return Err(PipelineError::InvalidDimensions(width, height));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    fn offset(&self, x: usize, y: usize) -> usize {
        (y * self.width + x) * 4
    }

    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        let i = self.offset(x, y);
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, pixel: [u8; 4]) {
        let i = self.offset(x, y);
        self.data[i..i + 4].copy_from_slice(&pixel);
    }

    /// Reads one channel with coordinates clamped to the raster bounds.
    pub fn channel_clamped(&self, x: isize, y: isize, channel: usize) -> u8 {
        let cx = x.clamp(0, self.width as isize - 1) as usize;
        let cy = y.clamp(0, self.height as isize - 1) as usize;
        self.data[self.offset(cx, cy) + channel]
    }

    /// Iterates pixels in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = [u8; 4]> + '_ {
        self.data.chunks_exact(4).map(|p| [p[0], p[1], p[2], p[3]])
    }

    pub fn pixels_mut(&mut self) -> impl Iterator<Item = &mut [u8]> {
        self.data.chunks_exact_mut(4)
    }
}

/// Rounds (halves to even) and clamps a channel value into the byte range.
pub fn to_channel(value: f64) -> u8 {
    value.round_ties_even().clamp(0.0, 255.0) as u8
}
