//! Performance metrics for debug overlay
//!
//! Tracks FPS, frame time, particle counts and filter recoveries.

/// Per-frame metrics, smoothed for display
#[derive(Clone, Debug, Default)]
pub struct FrameStats {
    /// Frame timing (exponential moving averages)
    fps: f32,
    frame_time_ms: f32,

    /// Particle counts from the last frame
    spawned: usize,
    live: usize,
    drawn: usize,
    overwritten_live: u64,

    /// Filter state
    recoveries: u32,
    wand: (f32, f32),
}

impl FrameStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record frame timing from `dt` in seconds
    pub fn record_timing(&mut self, dt: f32) {
        let frame_time_ms = dt * 1000.0;
        // Sanity check: ignore invalid times (tab backgrounded or first frame)
        if !(1.0..=200.0).contains(&frame_time_ms) {
            return;
        }
        if self.frame_time_ms == 0.0 {
            self.frame_time_ms = frame_time_ms;
            self.fps = 1.0 / dt;
            return;
        }
        self.fps = self.fps * 0.9 + (1.0 / dt) * 0.1;
        self.frame_time_ms = self.frame_time_ms * 0.9 + frame_time_ms * 0.1;
    }

    pub fn record_particles(&mut self, spawned: usize, live: usize, drawn: usize, overwritten_live: u64) {
        self.spawned = spawned;
        self.live = live;
        self.drawn = drawn;
        self.overwritten_live = overwritten_live;
    }

    pub fn record_wand(&mut self, wand: (f32, f32), recoveries: u32) {
        self.wand = wand;
        self.recoveries = recoveries;
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }

    pub fn live(&self) -> usize {
        self.live
    }

    pub fn recoveries(&self) -> u32 {
        self.recoveries
    }

    /// Formatted overlay text (shown by the host in HTML)
    pub fn overlay_text(&self) -> String {
        format!(
            "FPS: {:.0} | Frame: {:.1}ms\n\
             Wand: ({:.0}, {:.0}) | Recoveries: {}\n\
             Particles: {} live, {} drawn, +{} | Overwritten: {}",
            self.fps, self.frame_time_ms,
            self.wand.0, self.wand.1, self.recoveries,
            self.live, self.drawn, self.spawned, self.overwritten_live,
        )
    }
}
