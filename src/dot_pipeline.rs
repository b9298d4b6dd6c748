//! Dot matrix pipeline module
//!
//! Turns a pixel source (decoded video frame, camera frame, or procedural
//! generator output) into a small grid of quantized intensities or colors.
//! Stages run in a fixed order: capture, preprocess filters, tone mapping,
//! quantization, post-processing.

pub mod capture;
pub mod common;
pub mod config;
pub mod conversions;
pub mod export;
pub mod filters;
pub mod generators;
pub mod postprocess;
pub mod quantize;
pub mod render;
pub mod tone;

pub use common::{
    DotCells,
    DotGrid,
    PipelineError,
    PipelineTimings,
    Raster,
    Result,
};

pub use capture::{
    FrameReader,
    FrameSequence,
    ImageFrameReader,
    PixelSource,
    TimedSource,
    VideoSource,
};

pub use config::{
    GridConfig,
    ProcessConfig,
    ProcessConfigBuilder,
    PresetSnapshot,
};

pub use conversions::{
    DotPipeline,
    FrameClock,
};

pub use export::{
    DotExport,
    ExportWriter,
    JsonExportWriter,
};

pub use filters::{
    NoiseSource,
    SeededNoise,
    SilentNoise,
};

pub use generators::{
    Generator,
    GeneratorKind,
    GeneratorParams,
    Palette,
    PermutationTable,
};

pub use quantize::OutputMode;
pub use render::render_preview;
