use std::io::Write;
use std::path::Path;

use tracing::{debug, info, info_span, instrument};

use crate::dot_pipeline::{
    capture::{capture, FrameReader, ImageFrameReader, PixelSource},
    common::{
        error::{PipelineError, Result},
        DotGrid, PipelineTimings, Raster, Timer,
    },
    config::ProcessConfig,
    export::{DotExport, ExportWriter, JsonExportWriter},
    filters::{apply_chain, NoiseSource, SeededNoise},
    postprocess,
    quantize::quantize,
    tone::gray_level,
};

/// Converts pixel sources into dot grids with a fixed configuration.
///
/// The reader decodes frame files, the writer persists exports, and the
/// noise source feeds the noise filter.
pub struct DotPipeline<R: FrameReader, W: ExportWriter, N: NoiseSource> {
    reader: R,
    writer: W,
    noise: N,
    config: ProcessConfig,
    timings: PipelineTimings,
}

impl DotPipeline<ImageFrameReader, JsonExportWriter, SeededNoise> {
    pub fn new(config: ProcessConfig) -> Self {
        Self::with_custom(ImageFrameReader, JsonExportWriter::default(), SeededNoise::from_entropy(), config)
    }

    /// Like [`new`](Self::new), with reproducible noise.
    pub fn seeded(config: ProcessConfig, seed: u64) -> Self {
        Self::with_custom(ImageFrameReader, JsonExportWriter::default(), SeededNoise::new(seed), config)
    }
}

fn record(timings: &mut PipelineTimings, timer: Timer) {
    let (name, duration) = timer.stop();
    timings.add_step(name, duration);
}

impl<R: FrameReader, W: ExportWriter, N: NoiseSource> DotPipeline<R, W, N> {
    pub fn with_custom(reader: R, writer: W, noise: N, config: ProcessConfig) -> Self {
        Self {
            reader,
            writer,
            noise,
            config: config.sanitized(),
            timings: PipelineTimings::new(),
        }
    }

    /// Runs one frame through the pipeline.
    ///
    /// Returns `Ok(None)` when the source is not ready yet; the caller should
    /// try again on its next tick.
    #[instrument(skip(self, source), fields(cols = self.config.grid.cols(), rows = self.config.grid.rows()))]
    pub fn process<S: PixelSource + ?Sized>(&mut self, source: &S) -> Result<Option<DotGrid>> {
        let mut timings = PipelineTimings::new();
        let grid = self.run(source, &mut timings)?;
        self.timings.merge(&timings);
        Ok(grid)
    }

    pub fn process_with_timings<S: PixelSource + ?Sized>(
        &mut self,
        source: &S,
    ) -> Result<Option<(DotGrid, PipelineTimings)>> {
        let mut timings = PipelineTimings::new();
        let grid = self.run(source, &mut timings)?;
        self.timings.merge(&timings);
        if grid.is_some() {
            debug!(
                "Frame processed in {:.3}ms",
                timings.total_duration().as_secs_f64() * 1000.0
            );
        }
        Ok(grid.map(|grid| (grid, timings)))
    }

    fn run<S: PixelSource + ?Sized>(
        &mut self,
        source: &S,
        timings: &mut PipelineTimings,
    ) -> Result<Option<DotGrid>> {
        let config = &self.config;
        let (cols, rows) = (config.grid.cols(), config.grid.rows());

        let timer = Timer::start("capture");
        let captured = {
            let _span = info_span!("capture", zoom = config.zoom).entered();
            capture(source, cols, rows, config.zoom)?
        };
        let Some(captured) = captured else {
            debug!("Source not ready, skipping frame");
            return Ok(None);
        };
        record(timings, timer);

        let timer = Timer::start("preprocess");
        let filtered = {
            let _span = info_span!("preprocess").entered();
            apply_chain(&captured, &config.filter_settings(), &mut self.noise)
        };
        record(timings, timer);

        let curve = config.tone_curve();
        let post = config.post_settings();

        let grid = if config.color_mode {
            let timer = Timer::start("tone");
            let cells: Vec<[f64; 3]> = {
                let _span = info_span!("tone", color = true).entered();
                filtered
                    .pixels()
                    .map(|[r, g, b, _]| {
                        [
                            curve.apply_normalized(r),
                            curve.apply_normalized(g),
                            curve.apply_normalized(b),
                        ]
                    })
                    .collect()
            };
            record(timings, timer);

            let timer = Timer::start("postprocess");
            let cells = {
                let _span = info_span!("postprocess").entered();
                let mut cells = postprocess::apply(cells, cols, rows, &post);
                if config.invert {
                    postprocess::invert(&mut cells);
                }
                cells
            };
            record(timings, timer);

            DotGrid::rgb(cols, rows, cells)
        } else {
            let timer = Timer::start("tone");
            let toned = {
                let _span = info_span!("tone", color = false).entered();
                let gray: Vec<u8> = filtered.pixels().map(gray_level).collect();
                curve.apply_gray(&gray)
            };
            record(timings, timer);

            let timer = Timer::start("quantize");
            let levels = {
                let _span = info_span!("quantize", mode = %config.output_mode, dither = config.dither).entered();
                quantize(&toned, cols, rows, config.output_mode, config.threshold, config.dither)
            };
            record(timings, timer);

            let timer = Timer::start("postprocess");
            let cells = {
                let _span = info_span!("postprocess").entered();
                let mut cells = postprocess::apply(levels, cols, rows, &post);
                if config.invert {
                    postprocess::invert(&mut cells);
                }
                cells
            };
            record(timings, timer);

            DotGrid::scalar(cols, rows, cells)
        };

        debug!(cols, rows, color = grid.is_color(), "Frame converted");
        Ok(Some(grid))
    }

    /// Decodes an encoded frame (PNG, JPEG) and runs it through the pipeline.
    #[instrument(skip(self, data), fields(input_size = data.len()))]
    pub fn convert_frame(&mut self, data: &[u8]) -> Result<Option<DotGrid>> {
        let raster = {
            let _span = info_span!("decode_frame").entered();
            self.reader.read_frame(data)?
        };
        self.process(&raster)
    }

    /// Reads and decodes a frame file without processing it.
    pub fn read_frame_file<P: AsRef<Path>>(&self, path: P) -> Result<Raster> {
        let path = path.as_ref();
        let data = {
            let _span = info_span!("read_input_file").entered();
            std::fs::read(path)
                .map_err(|e| PipelineError::InputReadError(format!("{}: {}", path.display(), e)))?
        };
        self.reader.read_frame(&data)
    }

    #[instrument(skip(self, path))]
    pub fn convert_file<P: AsRef<Path>>(&mut self, path: P) -> Result<Option<DotGrid>> {
        let path = path.as_ref();
        info!(input = %path.display(), "Converting frame file");
        let raster = self.read_frame_file(path)?;
        self.process(&raster)
    }

    pub fn write_export(&self, export: &DotExport, output: &mut dyn Write) -> Result<()> {
        let _span = info_span!("encode_export", frames = export.frame_count).entered();
        self.writer.write_export(export, output)
    }

    /// Encodes the export completely before creating `path`, so a failed
    /// encode never leaves a partial file behind.
    #[instrument(skip(self, export, path))]
    pub fn write_export_file<P: AsRef<Path>>(&self, export: &DotExport, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut buffer = Vec::new();
        self.write_export(export, &mut buffer)?;

        {
            let _span = info_span!("write_output_file").entered();
            std::fs::write(path, &buffer)
                .map_err(|e| PipelineError::OutputWriteError(format!("{}: {}", path.display(), e)))?;
        }

        info!(
            output = %path.display(),
            frames = export.frame_count,
            bytes = buffer.len(),
            "Export written"
        );
        Ok(())
    }

    /// Stage timings accumulated over every processed frame since the last reset.
    pub fn timings(&self) -> &PipelineTimings {
        &self.timings
    }

    pub fn reset_timings(&mut self) {
        self.timings.clear();
    }

    pub fn config(&self) -> &ProcessConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: ProcessConfig) {
        self.config = config.sanitized();
    }
}
