//! Seekable sources for exporting a time range.

use tracing::debug;

use crate::dot_pipeline::capture::source::PixelSource;
use crate::dot_pipeline::common::error::{PipelineError, Result};
use crate::dot_pipeline::common::Raster;

/// A pixel source with a playhead, such as a decoded video.
pub trait TimedSource: PixelSource {
    /// Total length in seconds, `None` while unknown.
    fn duration(&self) -> Option<f64>;

    fn position(&self) -> f64;

    /// Moves the playhead. Times outside `[0, duration]` are clamped.
    fn seek(&mut self, time: f64) -> Result<()>;
}

/// Decoded frames played back at a fixed rate.
#[derive(Debug, Clone)]
pub struct FrameSequence {
    frames: Vec<Raster>,
    fps: f64,
    position: f64,
}

impl FrameSequence {
    pub fn new(frames: Vec<Raster>, fps: f64) -> Result<Self> {
        if !(fps.is_finite() && fps > 0.0) {
            return Err(PipelineError::SourceUnavailable(format!(
                "invalid frame rate {fps}"
            )));
        }
        Ok(Self {
            frames,
            fps,
            position: 0.0,
        })
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    fn current(&self) -> Option<&Raster> {
        let last = self.frames.len().checked_sub(1)?;
        let index = ((self.position * self.fps).floor() as usize).min(last);
        self.frames.get(index)
    }
}

impl PixelSource for FrameSequence {
    fn dimensions(&self) -> Option<(usize, usize)> {
        self.current().and_then(|frame| frame.dimensions())
    }

    fn read_pixel(&self, x: usize, y: usize) -> [u8; 4] {
        self.current()
            .map_or([0, 0, 0, 255], |frame| frame.pixel(x, y))
    }
}

impl TimedSource for FrameSequence {
    fn duration(&self) -> Option<f64> {
        (!self.frames.is_empty()).then(|| self.frames.len() as f64 / self.fps)
    }

    fn position(&self) -> f64 {
        self.position
    }

    fn seek(&mut self, time: f64) -> Result<()> {
        let end = self.duration().unwrap_or(0.0);
        self.position = if time.is_finite() { time.clamp(0.0, end) } else { 0.0 };
        debug!(position = self.position, "Seeked frame sequence");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sequence() -> FrameSequence {
        let frames = (0..4)
            .map(|i| Raster::filled(2, 2, [i * 50, 0, 0, 255]).unwrap())
            .collect();
        FrameSequence::new(frames, 2.0).unwrap()
    }

    #[test]
    fn test_seek_selects_frame_by_time() {
        let mut seq = sequence();
        assert_eq!(seq.duration(), Some(2.0));
        assert_eq!(seq.read_pixel(0, 0)[0], 0);
        seq.seek(0.6).unwrap();
        assert_eq!(seq.read_pixel(0, 0)[0], 50);
        seq.seek(1.99).unwrap();
        assert_eq!(seq.read_pixel(0, 0)[0], 150);
        seq.seek(99.0).unwrap();
        assert_eq!(seq.position(), 2.0);
        assert_eq!(seq.read_pixel(1, 1)[0], 150);
    }

    #[test]
    fn test_empty_sequence_is_not_ready() {
        let seq = FrameSequence::new(Vec::new(), 24.0).unwrap();
        assert!(seq.dimensions().is_none());
        assert!(seq.duration().is_none());
    }

    #[test]
    fn test_rejects_bad_frame_rate() {
        assert!(FrameSequence::new(Vec::new(), 0.0).is_err());
    }
}
