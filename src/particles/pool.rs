//! Fixed-capacity particle pool
//!
//! Ring buffer with a write cursor. There is no free-list: a slot is reclaimed
//! when the cursor wraps back to it, normally long after its particle faded.
//! Overwriting a still-visible particle is accepted and only counted.

use rand::Rng;

use super::config::ParticleConfig;
use super::particle::{transition_matrix, Particle};
use crate::error::Result;
use crate::physics::{Matrix6, MotionState};

pub struct ParticlePool {
    config: ParticleConfig,
    /// Arena of `capacity` slots
    particles: Vec<Particle>,
    /// Next slot to write
    next: usize,
    /// Tracked state from the previous `generate_particles` call
    prev_state: Option<MotionState>,
    /// Rebuilt once per `time_update`
    transition: Matrix6,
    /// Live particles discarded early by a wrapping cursor
    overwritten_live: u64,
}

impl ParticlePool {
    pub fn new(config: ParticleConfig) -> Result<Self> {
        config.validate()?;
        log::debug!("particle pool capacity {}", config.capacity());
        Ok(Self::with_valid_config(config))
    }

    fn with_valid_config(config: ParticleConfig) -> Self {
        Self {
            particles: vec![Particle::placeholder(); config.capacity()],
            next: 0,
            prev_state: None,
            transition: transition_matrix(0.0, config.air_resistance),
            overwritten_live: 0,
            config,
        }
    }

    /// Initialize a new particle in the slot under the cursor
    pub fn create<R: Rng + ?Sized>(&mut self, seed: &MotionState, rng: &mut R) -> &Particle {
        let slot = self.next;
        if self.particles[slot].is_live() {
            self.overwritten_live += 1;
        }
        self.particles[slot] = Particle::spawn(seed, &self.config, rng);
        self.next = (self.next + 1) % self.particles.len();
        &self.particles[slot]
    }

    /// Advance every visible particle by `dt` seconds
    pub fn time_update(&mut self, dt: f32) {
        self.transition = transition_matrix(dt, self.config.air_resistance);
        let max_ttl = self.config.max_ttl;

        for p in self.particles.iter_mut().filter(|p| p.is_live()) {
            p.advance(&self.transition, dt, max_ttl);
        }
    }

    /// Spawn particles along the path from the previous tracked state to `current`.
    ///
    /// Returns `round(spawn_rate * dt)`; the first call only records `current`.
    /// At most `capacity()` of those are created since older ones would be
    /// overwritten within the same call.
    pub fn generate_particles<R: Rng + ?Sized>(
        &mut self,
        current: &MotionState,
        dt: f32,
        rng: &mut R,
    ) -> usize {
        let count = match self.prev_state {
            Some(_) if dt.is_finite() && dt > 0.0 => (self.config.spawn_rate * dt).round() as usize,
            _ => 0,
        };

        if let Some(prev) = self.prev_state {
            for _ in 0..count.min(self.capacity()) {
                let r: f32 = rng.gen_range(0.0..1.0);
                let interp = prev.lerp(current, r);
                self.create(&interp, rng);
            }
        }

        self.prev_state = Some(*current);
        count
    }

    /// Kill every particle and forget the previous tracked state
    pub fn clear(&mut self) {
        self.particles.fill(Particle::placeholder());
        self.next = 0;
        self.prev_state = None;
    }

    pub fn capacity(&self) -> usize {
        self.particles.len()
    }

    pub fn live_count(&self) -> usize {
        self.live().count()
    }

    pub fn live(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter().filter(|p| p.is_live())
    }

    /// All slots, live or not, in slot order
    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn get(&self, slot: usize) -> Option<&Particle> {
        self.particles.get(slot)
    }

    pub fn cursor(&self) -> usize {
        self.next
    }

    pub fn overwritten_live(&self) -> u64 {
        self.overwritten_live
    }

    pub fn previous_state(&self) -> Option<&MotionState> {
        self.prev_state.as_ref()
    }

    pub fn config(&self) -> &ParticleConfig {
        &self.config
    }
}

impl Default for ParticlePool {
    fn default() -> Self {
        Self::with_valid_config(ParticleConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::STATE_X_VEL;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn small_pool(capacity: usize) -> ParticlePool {
        ParticlePool::new(ParticleConfig {
            spawn_rate: capacity as f32,
            max_ttl: 1.0,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_first_generate_spawns_nothing() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut pool = ParticlePool::default();
        let n = pool.generate_particles(&MotionState::at(10.0, 10.0), 0.1, &mut rng);
        assert_eq!(n, 0);
        assert_eq!(pool.live_count(), 0);
        assert!(pool.previous_state().is_some());
    }

    #[test]
    fn test_zero_dt_spawns_nothing() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut pool = ParticlePool::default();
        pool.generate_particles(&MotionState::at(0.0, 0.0), 0.1, &mut rng);
        let n = pool.generate_particles(&MotionState::at(50.0, 0.0), 0.0, &mut rng);
        assert_eq!(n, 0);
        assert_eq!(pool.live_count(), 0);
    }

    #[test]
    fn test_spawn_count_and_segment() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut pool = ParticlePool::default();
        let start = MotionState::at(100.0, 200.0);
        let end = MotionState::at(180.0, 160.0);
        pool.generate_particles(&start, 0.05, &mut rng);

        let dt = 0.0333;
        let n = pool.generate_particles(&end, dt, &mut rng);
        assert_eq!(n, (750.0f32 * dt).round() as usize);
        assert_eq!(pool.live_count(), n);

        let tol = pool.config().position_jitter;
        for p in pool.live() {
            assert!(p.x() >= 100.0 - tol && p.x() <= 180.0 + tol);
            assert!(p.y() >= 160.0 - tol && p.y() <= 200.0 + tol);
        }
    }

    #[test]
    fn test_huge_dt_is_bounded_by_capacity() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut pool = small_pool(32);
        pool.generate_particles(&MotionState::at(0.0, 0.0), 0.05, &mut rng);

        let n = pool.generate_particles(&MotionState::at(10.0, 10.0), 1e12, &mut rng);
        assert!(n > pool.capacity());
        assert_eq!(pool.live_count(), pool.capacity());
        assert_eq!(pool.overwritten_live(), 0);
    }

    #[test]
    fn test_cursor_wraps_and_overwrites() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut pool = small_pool(4);
        for _ in 0..4 {
            pool.create(&MotionState::at(1.0, 1.0), &mut rng);
        }
        assert_eq!(pool.cursor(), 0);
        assert_eq!(pool.live_count(), 4);
        assert_eq!(pool.overwritten_live(), 0);

        pool.create(&MotionState::at(2.0, 2.0), &mut rng);
        assert_eq!(pool.cursor(), 1);
        assert_eq!(pool.live_count(), 4);
        assert_eq!(pool.overwritten_live(), 1);
    }

    #[test]
    fn test_never_exceeds_capacity() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut pool = small_pool(16);
        for i in 0..100 {
            pool.create(&MotionState::at(i as f32, 0.0), &mut rng);
            assert!(pool.live_count() <= pool.capacity());
        }
    }

    #[test]
    fn test_latest_survives_next_create() {
        let mut rng = StdRng::seed_from_u64(2);
        let config = ParticleConfig {
            position_jitter: 0.0,
            velocity_jitter: (0.0, 0.0),
            spawn_rate: 8.0,
            ..Default::default()
        };
        let mut pool = ParticlePool::new(config).unwrap();
        let slot = pool.cursor();
        pool.create(&MotionState::at(42.0, 0.0), &mut rng);
        pool.create(&MotionState::at(7.0, 0.0), &mut rng);
        assert_eq!(pool.get(slot).map(|p| p.x()), Some(42.0));
    }

    #[test]
    fn test_time_update_moves_and_fades() {
        let mut rng = StdRng::seed_from_u64(4);
        let config = ParticleConfig {
            position_jitter: 0.0,
            velocity_jitter: (0.0, 0.0),
            ..Default::default()
        };
        let mut pool = ParticlePool::new(config).unwrap();
        let mut seed = MotionState::at(0.0, 0.0);
        seed.0[STATE_X_VEL] = 20.0;
        pool.create(&seed, &mut rng);

        pool.time_update(0.5);
        let p = pool.get(0).unwrap();
        assert!((p.x() - 10.0).abs() < 1e-4);
        // ½ g dt² downward
        assert!((p.y() - 3.75).abs() < 1e-4);
        assert!((p.alpha() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_dead_particles_stay_dead() {
        let mut pool = ParticlePool::default();
        pool.time_update(0.1);
        pool.time_update(5.0);
        for p in pool.iter() {
            assert_eq!(p.alpha(), 0.0);
            assert!(p.ttl() >= 0.0);
        }

        let mut rng = StdRng::seed_from_u64(8);
        pool.create(&MotionState::at(0.0, 0.0), &mut rng);
        pool.time_update(2.0);
        pool.time_update(2.0);
        let p = pool.get(0).unwrap();
        assert_eq!(p.ttl(), 0.0);
        assert_eq!(p.alpha(), 0.0);
    }

    #[test]
    fn test_clear_forgets_previous_state() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut pool = ParticlePool::default();
        pool.generate_particles(&MotionState::at(0.0, 0.0), 0.1, &mut rng);
        pool.generate_particles(&MotionState::at(5.0, 0.0), 0.1, &mut rng);
        assert!(pool.live_count() > 0);
        pool.clear();
        assert_eq!(pool.live_count(), 0);
        assert!(pool.previous_state().is_none());
        assert_eq!(pool.generate_particles(&MotionState::at(9.0, 0.0), 0.1, &mut rng), 0);
    }
}
