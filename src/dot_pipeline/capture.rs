//! Raster capture module
//!
//! Resamples any pixel source into the grid-sized raster, applying digital
//! zoom, and decodes frame files and videos into rasters.

mod image_reader;
mod reader;
mod resample;
mod source;
mod timeline;
mod video;

pub use image_reader::ImageFrameReader;
pub use reader::FrameReader;
pub use resample::{capture, ZoomLayout};
pub use source::PixelSource;
pub use timeline::{FrameSequence, TimedSource};
pub use video::{parse_frame_rate, probe_video, VideoInfo, VideoSource};
