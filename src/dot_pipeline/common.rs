//! Common utilities module
//!
//! This module contains the error type, the RGBA raster, the output dot grid,
//! and stage timing helpers shared across the dot pipeline.

pub mod error;
pub mod grid;
pub mod raster;
pub mod timing;

pub use error::{PipelineError, Result};
pub use grid::{DotCells, DotGrid, DotValue};
pub use raster::Raster;
pub use timing::{PipelineTimings, StepTiming, Timer};
