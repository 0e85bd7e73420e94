//! # Frame Timing
//!
//! Two small trackers used by the application shell:
//!
//! - [`FrameCounter`] - counts frames, hands out the per-frame delta and
//!   logs the frame rate once per second
//! - [`FrameHistory`] - fixed ring of recent FPS and frame-time samples for
//!   plotting
//!
//! ## Usage
//!
//! ```rust
//! use sandbox3d::performance::FrameCounter;
//!
//! let mut counter = FrameCounter::new("Window 'demo'");
//!
//! // In your main loop
//! let dt = counter.tick();
//! // ... update with dt, render ...
//! ```

use std::time::{Duration, Instant};

/// Interval between frame-rate reports.
const REPORT_INTERVAL: Duration = Duration::from_secs(1);

/// Number of samples kept by [`FrameHistory`].
pub const HISTORY_LEN: usize = 100;

/// Frame-rate counter reporting through `log::debug!`.
#[derive(Debug)]
pub struct FrameCounter {
    name: String,
    frames_in_window: u32,
    window_start: Instant,
    last_tick: Option<Instant>,
    fps: f32,
    total_frames: u64,
}

impl FrameCounter {
    /// `name` prefixes every report, e.g. `Window 'viewer'`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            frames_in_window: 0,
            window_start: Instant::now(),
            last_tick: None,
            fps: 0.0,
            total_frames: 0,
        }
    }

    /// Marks the start of a frame and returns the time since the previous
    /// one (zero on the first frame).
    pub fn tick(&mut self) -> Duration {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> Duration {
        let delta = self
            .last_tick
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or_default();
        self.last_tick = Some(now);
        self.total_frames += 1;
        self.frames_in_window += 1;

        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed >= REPORT_INTERVAL {
            self.fps = self.frames_in_window as f32 / elapsed.as_secs_f32();
            log::debug!("{}: {:.1} FPS", self.name, self.fps);
            self.frames_in_window = 0;
            self.window_start = now;
        }
        delta
    }

    /// Frame rate over the last completed report interval.
    pub fn fps(&self) -> f32 {
        self.fps
    }

    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }
}

/// Ring buffer of the last [`HISTORY_LEN`] frame-rate samples.
#[derive(Debug, Clone)]
pub struct FrameHistory {
    fps: [f32; HISTORY_LEN],
    frame_ms: [f32; HISTORY_LEN],
    offset: usize,
}

impl Default for FrameHistory {
    fn default() -> Self {
        Self {
            fps: [0.0; HISTORY_LEN],
            frame_ms: [0.0; HISTORY_LEN],
            offset: 0,
        }
    }
}

impl FrameHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one sample. Frame time is derived from `fps`, treating a
    /// non-positive rate as 1 FPS.
    pub fn push(&mut self, fps: f32) {
        let frame_ms = 1000.0 / if fps > 0.0 { fps } else { 1.0 };
        self.fps[self.offset] = fps;
        self.frame_ms[self.offset] = frame_ms;
        self.offset = (self.offset + 1) % HISTORY_LEN;
    }

    pub fn fps(&self) -> &[f32] {
        &self.fps
    }

    pub fn frame_ms(&self) -> &[f32] {
        &self.frame_ms
    }

    /// Index of the oldest sample, where plotting starts.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Most recently pushed `(fps, ms)` pair.
    pub fn latest(&self) -> (f32, f32) {
        let last = (self.offset + HISTORY_LEN - 1) % HISTORY_LEN;
        (self.fps[last], self.frame_ms[last])
    }
}
