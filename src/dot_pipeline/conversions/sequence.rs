//! Frame sequence capture for export.
//!
//! Every sequence runs the same single-frame pipeline once per frame,
//! synchronously and in order. With a seeded noise source the output is
//! reproducible.

use tracing::{debug, info, instrument};

use crate::dot_pipeline::{
    capture::{FrameReader, PixelSource, TimedSource},
    common::{
        error::{PipelineError, Result},
        DotGrid,
    },
    conversions::{clock::clamp_fps, frame_to_dots::DotPipeline},
    export::{DotExport, ExportWriter},
    filters::NoiseSource,
    generators::Generator,
};

pub const DEFAULT_EXPORT_SECONDS: f64 = 2.0;
pub const MIN_EXPORT_SECONDS: f64 = 0.5;
/// Longest sequence a single export records, whatever its source.
pub const MAX_EXPORT_SECONDS: f64 = 600.0;
/// Shortest time range a range export covers.
pub const MIN_RANGE_SECONDS: f64 = 0.05;

/// Frames needed to cover `seconds` at `fps`. Missing or invalid durations
/// use two seconds; the result stays within
/// [`MIN_EXPORT_SECONDS`, `MAX_EXPORT_SECONDS`].
pub fn frame_count_for_duration(seconds: f64, fps: u32) -> usize {
    let seconds = if seconds.is_finite() && seconds > 0.0 {
        seconds.clamp(MIN_EXPORT_SECONDS, MAX_EXPORT_SECONDS)
    } else {
        DEFAULT_EXPORT_SECONDS
    };
    ((seconds * f64::from(clamp_fps(fps))).ceil() as usize).max(1)
}

/// Frames needed to cover `[start, end]` at `fps`, at least one. Spans
/// longer than [`MAX_EXPORT_SECONDS`] are cut to it.
pub fn frame_count_for_range(start: f64, end: f64, fps: u32) -> usize {
    let span = end - start;
    if !(span.is_finite() && span > 0.0) {
        return 1;
    }
    ((span.min(MAX_EXPORT_SECONDS) * f64::from(clamp_fps(fps))).ceil() as usize).max(1)
}

/// Fits a requested range into a source of `duration` seconds.
///
/// A missing or invalid end means the end of the source. The start stays
/// at least [`MIN_RANGE_SECONDS`] before the end, and the range never
/// starts before zero.
pub fn clamp_range(start: f64, end: f64, duration: f64) -> (f64, f64) {
    let duration = if duration.is_finite() { duration.max(0.0) } else { 0.0 };
    let end = if end.is_finite() && end > 0.0 { end.min(duration) } else { duration };
    let start = if start.is_finite() { start } else { 0.0 };
    let start = start.min(end - MIN_RANGE_SECONDS).max(0.0);
    (start, end.max(start + MIN_RANGE_SECONDS))
}

impl<R: FrameReader, W: ExportWriter, N: NoiseSource> DotPipeline<R, W, N> {
    /// Renders `generator` at `start_time + i / fps` for each frame. The
    /// caller's clock is not touched.
    #[instrument(skip(self, generator), fields(kind = %generator.kind()))]
    pub fn record_generator(
        &mut self,
        generator: &Generator<'_>,
        start_time: f64,
        seconds: f64,
        fps: u32,
    ) -> Result<Vec<DotGrid>> {
        let fps = clamp_fps(fps);
        let count = frame_count_for_duration(seconds, fps);
        let (cols, rows) = (self.config().grid.cols(), self.config().grid.rows());
        info!(frames = count, fps, "Recording generator sequence");

        let mut frames = Vec::new();
        for i in 0..count {
            let time = start_time + i as f64 / f64::from(fps);
            let raster = generator.render(cols, rows, time)?;
            if let Some(grid) = self.process(&raster)? {
                frames.push(grid);
            }
        }
        Ok(frames)
    }

    /// Seeks through `[start, end]` one frame interval at a time, then
    /// restores the source's playhead, also when a frame fails.
    ///
    /// The range is first fitted into the source's duration with
    /// [`clamp_range`].
    #[instrument(skip(self, source))]
    pub fn record_range<S: TimedSource>(
        &mut self,
        source: &mut S,
        start: f64,
        end: f64,
        fps: u32,
    ) -> Result<Vec<DotGrid>> {
        let Some(duration) = source.duration() else {
            return Err(PipelineError::SourceUnavailable(
                "source has no duration yet".to_string(),
            ));
        };

        let fps = clamp_fps(fps);
        let (start, end) = clamp_range(start, end, duration);
        let count = frame_count_for_range(start, end, fps);
        let saved = source.position();
        info!(frames = count, fps, start, end, "Recording time range");

        let recorded = self.seek_frames(source, start, count, fps);
        let restored = source.seek(saved);
        let frames = recorded?;
        restored?;
        Ok(frames)
    }

    fn seek_frames<S: TimedSource>(
        &mut self,
        source: &mut S,
        start: f64,
        count: usize,
        fps: u32,
    ) -> Result<Vec<DotGrid>> {
        let mut frames = Vec::new();
        for i in 0..count {
            source.seek(start + i as f64 / f64::from(fps))?;
            match self.process(&*source)? {
                Some(grid) => frames.push(grid),
                None => debug!(frame = i, "Frame not ready, skipped"),
            }
        }
        Ok(frames)
    }

    /// One frame per source, in order. Sources that are not ready are skipped.
    pub fn record_frames<I>(&mut self, sources: I) -> Result<Vec<DotGrid>>
    where
        I: IntoIterator,
        I::Item: PixelSource,
    {
        let mut frames = Vec::new();
        for (i, source) in sources.into_iter().enumerate() {
            match self.process(&source)? {
                Some(grid) => frames.push(grid),
                None => debug!(frame = i, "Frame not ready, skipped"),
            }
        }
        info!(frames = frames.len(), "Recorded frame sequence");
        Ok(frames)
    }

    /// Processes a still source once and repeats it for the whole duration.
    pub fn record_still<S: PixelSource + ?Sized>(
        &mut self,
        source: &S,
        seconds: f64,
        fps: u32,
    ) -> Result<Vec<DotGrid>> {
        let count = frame_count_for_duration(seconds, fps);
        Ok(match self.process(source)? {
            Some(grid) => vec![grid; count],
            None => Vec::new(),
        })
    }

    /// Wraps recorded frames in an export document for the current grid.
    pub fn build_export(&self, frames: Vec<DotGrid>, fps: u32, name: &str) -> DotExport {
        let config = self.config();
        let mut export = DotExport::new(config.grid.cols(), config.grid.rows(), clamp_fps(fps), frames)
            .with_name(name);
        if config.color_mode {
            export.color_mode = Some(true);
        }
        export
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_frame_counts() {
        assert_eq!(frame_count_for_duration(2.0, 15), 30);
        assert_eq!(frame_count_for_duration(0.1, 10), 5);
        assert_eq!(frame_count_for_duration(f64::NAN, 10), 20);
        assert_eq!(frame_count_for_duration(1.01, 24), 25);
        assert_eq!(frame_count_for_duration(1.0, 0), 15);
    }

    #[test]
    fn test_huge_durations_are_capped() {
        let cap = (MAX_EXPORT_SECONDS * 60.0) as usize;
        assert_eq!(frame_count_for_duration(1e18, 60), cap);
        assert_eq!(frame_count_for_duration(f64::INFINITY, 10), 20);
        assert_eq!(frame_count_for_range(0.0, 1e17, 60), cap);
    }

    #[test]
    fn test_range_frame_counts() {
        assert_eq!(frame_count_for_range(0.0, 1.0, 12), 12);
        assert_eq!(frame_count_for_range(2.0, 2.0, 12), 1);
        assert_eq!(frame_count_for_range(0.0, 0.05, 60), 3);
    }

    #[test]
    fn test_clamp_range_fits_source() {
        assert_eq!(clamp_range(0.5, 1.5, 2.0), (0.5, 1.5));
        assert_eq!(clamp_range(0.0, 1e17, 2.0), (0.0, 2.0));
        assert_eq!(clamp_range(-3.0, f64::NAN, 4.0), (0.0, 4.0));
        assert_eq!(clamp_range(0.0, 0.0, 3.0), (0.0, 3.0));

        let (start, end) = clamp_range(10.0, 20.0, 2.0);
        assert!((start - 1.95).abs() < 1e-12);
        assert_eq!(end, 2.0);
    }
}
