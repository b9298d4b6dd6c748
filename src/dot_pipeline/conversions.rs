//! Pipeline conversions module
//!
//! Orchestrates capture, filtering, tone mapping, quantization, and
//! post-processing for single frames and for exported frame sequences.

mod clock;
mod frame_to_dots;
mod sequence;


pub use clock::{clamp_fps, FrameClock, DEFAULT_FPS, MAX_FPS, MIN_FPS};
pub use frame_to_dots::DotPipeline;
pub use sequence::{
    clamp_range, frame_count_for_duration, frame_count_for_range, DEFAULT_EXPORT_SECONDS,
    MAX_EXPORT_SECONDS, MIN_EXPORT_SECONDS, MIN_RANGE_SECONDS,
};
