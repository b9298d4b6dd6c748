//! Frame reader backed by the `image` crate.
//!
//! Decodes still frames (PNG, JPEG), e.g. frames extracted from a video with
//! ffmpeg, into RGBA rasters.

use tracing::debug;

use crate::dot_pipeline::capture::reader::FrameReader;
use crate::dot_pipeline::common::error::{PipelineError, Result};
use crate::dot_pipeline::common::Raster;

pub struct ImageFrameReader;

impl FrameReader for ImageFrameReader {
    /// Decodes an encoded image and converts it to 8-bit RGBA.
    ///
    /// # Errors
    ///
    /// * `DecodeError` - the bytes are not a supported image
    /// * `InvalidDimensions` - the image has a zero dimension
    fn read_frame(&self, data: &[u8]) -> Result<Raster> {
        debug!("Decoding frame, {} bytes", data.len());

        let decoded = image::load_from_memory(data)
            .map_err(|e| PipelineError::DecodeError(e.to_string()))?
            .into_rgba8();
        let (width, height) = decoded.dimensions();

        debug!("Decoded frame: {}x{}", width, height);

        Raster::from_rgba(width as usize, height as usize, decoded.into_raw())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn encode_png(width: u32, height: u32, pixel: [u8; 4]) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba(pixel));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_decodes_png() {
        let bytes = encode_png(5, 3, [10, 20, 30, 255]);
        let raster = ImageFrameReader.read_frame(&bytes).unwrap();
        assert_eq!((raster.width(), raster.height()), (5, 3));
        assert_eq!(raster.pixel(4, 2), [10, 20, 30, 255]);
    }

    #[test]
    fn test_garbage_is_decode_error() {
        let result = ImageFrameReader.read_frame(b"definitely not an image");
        assert!(matches!(result, Err(PipelineError::DecodeError(_))));
    }
}
