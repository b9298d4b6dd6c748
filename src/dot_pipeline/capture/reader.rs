use crate::dot_pipeline::common::error::Result;
use crate::dot_pipeline::common::Raster;

pub trait FrameReader {
    fn read_frame(&self, data: &[u8]) -> Result<Raster>;
}
