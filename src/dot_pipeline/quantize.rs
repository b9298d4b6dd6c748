//! Quantization and dithering module
//!
//! Reduces tone-mapped grayscale values (0–255 per cell) to the grid's output
//! levels, optionally with Floyd–Steinberg error diffusion.

mod dither;
pub mod types;

pub use dither::{diffuse_errors, quantize};
pub use types::OutputMode;
