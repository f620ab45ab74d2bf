//! Wand session - owns tracker, particle pool and RNG for one host
//!
//! Per frame: track observation → age particles → spawn along the path →
//! composite onto the host's frame.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::Result;
use crate::particles::{ParticleConfig, ParticlePool};
use crate::physics::{nearest_point, Bounds, FilterParameters, MotionState, WandTracker};
use crate::renderer::{draw_particles, Frame, FrameStats};

/// Seed used when the host does not supply one
pub const DEFAULT_SEED: u64 = 0x5eed_d057;

pub struct WandSession {
    tracker: WandTracker,
    pool: ParticlePool,
    rng: StdRng,
    stats: FrameStats,
}

impl WandSession {
    pub fn new(params: FilterParameters, config: ParticleConfig, seed: u64) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            tracker: WandTracker::new(params, Bounds::default()),
            pool: ParticlePool::new(config)?,
            rng: StdRng::seed_from_u64(seed),
            stats: FrameStats::new(),
        })
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            tracker: WandTracker::default(),
            pool: ParticlePool::default(),
            rng: StdRng::seed_from_u64(seed),
            stats: FrameStats::new(),
        }
    }

    /// Run one frame for an observed wand position; returns the wand position
    pub fn tick(&mut self, observed: (f32, f32), dt: f32, frame: &mut Frame) -> (f32, f32) {
        self.tracker
            .set_bounds(Bounds::new(frame.width() as f32, frame.height() as f32));
        let outcome = self.tracker.track(observed);

        // Update the particles, generate new ones between the previous and
        // current position and draw all of them
        self.pool.time_update(dt);
        let spawned = self.pool.generate_particles(&outcome.state, dt, &mut self.rng);
        let drawn = draw_particles(&self.pool, frame);

        self.stats.record_timing(dt);
        self.stats.record_particles(
            spawned,
            self.pool.live_count(),
            drawn,
            self.pool.overwritten_live(),
        );
        self.stats.record_wand(outcome.wand, self.tracker.recoveries());

        outcome.wand
    }

    /// Run one frame from a raw depth map the same size as `frame`.
    ///
    /// With no valid depth sample the whole tick is suppressed.
    pub fn tick_depth(
        &mut self,
        depth: &[u16],
        dt: f32,
        frame: &mut Frame,
        mirrored: bool,
    ) -> Result<Option<(f32, f32)>> {
        let nearest = nearest_point(depth, frame.width(), frame.height(), mirrored)?;
        match nearest {
            Some(observed) => Ok(Some(self.tick(observed, dt, frame))),
            None => {
                log::debug!("no valid depth sample; frame skipped");
                Ok(None)
            }
        }
    }

    pub fn configure_filter(&mut self, params: FilterParameters) -> Result<()> {
        self.tracker.set_params(params)
    }

    /// Replace the pool; existing particles are dropped
    pub fn configure_particles(&mut self, config: ParticleConfig) -> Result<()> {
        self.pool = ParticlePool::new(config)?;
        Ok(())
    }

    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Forget the track and clear all particles
    pub fn reset(&mut self) {
        self.tracker.reset();
        self.pool.clear();
    }

    pub fn is_initialized(&self) -> bool {
        self.tracker.is_initialized()
    }

    pub fn corrected_state(&self) -> &MotionState {
        self.tracker.filter().corrected_state()
    }

    pub fn tracker(&self) -> &WandTracker {
        &self.tracker
    }

    pub fn pool(&self) -> &ParticlePool {
        &self.pool
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }
}

impl Default for WandSession {
    fn default() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_tick_spawns_nothing() {
        let mut session = WandSession::default();
        let mut buf = vec![0u8; 64 * 48 * 4];
        let mut frame = Frame::from_rgba(&mut buf, 64, 48).unwrap();
        let wand = session.tick((32.0, 24.0), 0.05, &mut frame);
        assert_eq!(wand, (32.0, 24.0));
        assert_eq!(session.pool().live_count(), 0);
        assert!(session.is_initialized());
    }

    #[test]
    fn test_moving_wand_leaves_trail() {
        let mut session = WandSession::default();
        let mut buf = vec![0u8; 64 * 48 * 4];
        let mut frame = Frame::from_rgba(&mut buf, 64, 48).unwrap();
        for i in 0..10 {
            session.tick((10.0 + i as f32 * 3.0, 24.0), 0.05, &mut frame);
        }
        // 9 frames × round(750 × 0.05)
        assert!(session.pool().live_count() > 0);
        assert!(session.pool().live_count() <= 9 * 38);
        assert!(buf.iter().any(|&b| b != 0));
    }

    #[test]
    fn test_depth_tick_without_valid_sample_is_skipped() {
        let mut session = WandSession::default();
        let depth = vec![0u16; 8 * 6];
        let mut buf = vec![0u8; 8 * 6 * 4];
        let mut frame = Frame::from_rgba(&mut buf, 8, 6).unwrap();
        let wand = session.tick_depth(&depth, 0.05, &mut frame, false).unwrap();
        assert_eq!(wand, None);
        assert!(!session.is_initialized());
    }

    #[test]
    fn test_depth_tick_tracks_nearest() {
        let mut session = WandSession::default();
        let mut depth = vec![2000u16; 8 * 6];
        depth[3 * 8 + 5] = 600;
        let mut buf = vec![0u8; 8 * 6 * 4];
        let mut frame = Frame::from_rgba(&mut buf, 8, 6).unwrap();
        let wand = session.tick_depth(&depth, 0.05, &mut frame, false).unwrap();
        assert_eq!(wand, Some((5.0, 3.0)));
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut session = WandSession::default();
        let mut buf = vec![0u8; 64 * 48 * 4];
        let mut frame = Frame::from_rgba(&mut buf, 64, 48).unwrap();
        session.tick((10.0, 10.0), 0.05, &mut frame);
        session.tick((20.0, 10.0), 0.05, &mut frame);
        session.reset();
        assert!(!session.is_initialized());
        assert_eq!(session.pool().live_count(), 0);
    }

    #[test]
    fn test_same_seed_same_particles() {
        let run = || {
            let mut session = WandSession::with_seed(99);
            let mut buf = vec![0u8; 64 * 48 * 4];
            let mut frame = Frame::from_rgba(&mut buf, 64, 48).unwrap();
            session.tick((10.0, 10.0), 0.05, &mut frame);
            session.tick((30.0, 20.0), 0.05, &mut frame);
            let trail: Vec<_> = session.pool().live().map(|p| (p.x(), p.y(), p.color())).collect();
            trail
        };
        assert_eq!(run(), run());
    }
}
