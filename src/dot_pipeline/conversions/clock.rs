use std::time::{Duration, Instant};

use tracing::trace;

pub const MIN_FPS: u32 = 1;
pub const MAX_FPS: u32 = 60;
pub const DEFAULT_FPS: u32 = 15;

/// Clamps a target frame rate to [1, 60]; zero means the default.
pub fn clamp_fps(fps: u32) -> u32 {
    if fps == 0 { DEFAULT_FPS } else { fps.clamp(MIN_FPS, MAX_FPS) }
}

/// Rate limiter for a render loop.
///
/// A tick renders only when a full frame interval has passed since the last
/// rendered frame. Late ticks are dropped, never queued.
#[derive(Debug, Clone)]
pub struct FrameClock {
    fps: u32,
    interval: Duration,
    origin: Instant,
    last: Option<Instant>,
}

impl FrameClock {
    pub fn new(fps: u32, origin: Instant) -> Self {
        let fps = clamp_fps(fps);
        Self {
            fps,
            interval: Duration::from_secs_f64(1.0 / f64::from(fps)),
            origin,
            last: None,
        }
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns whether a frame should be rendered at `now`, and marks it rendered if so.
    pub fn should_render(&mut self, now: Instant) -> bool {
        let due = match self.last {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.interval,
        };
        if due {
            self.last = Some(now);
        } else {
            trace!("Dropping tick inside frame interval");
        }
        due
    }

    /// Seconds since the clock started, as fed to the generators.
    pub fn generator_time(&self, now: Instant) -> f64 {
        now.saturating_duration_since(self.origin).as_secs_f64()
    }
}
