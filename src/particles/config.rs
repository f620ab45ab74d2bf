//! Particle tuning constants and validated configuration
//!
//! Generate 750 particles per second living 1s each for a steady state of
//! 750 active particles; the pool holds exactly that many.

use std::ops::Range;

use crate::error::{Result, WandError};

/// Particles generated per second
pub const PARTICLE_RATE: f32 = 750.0;
/// Initial time to live (seconds)
pub const PARTICLE_TTL_MAX: f32 = 1.0;
/// Downward pull (pixels/s²)
pub const PARTICLE_GRAVITY_ACCEL: f32 = 30.0;
/// 1 - resistive force, proportional to velocity
pub const PARTICLE_AIR_RESISTANCE: f32 = 0.75;
/// Positional jitter (± pixels per axis)
pub const PARTICLE_POSITION_JITTER: f32 = 5.0;
/// Velocity jitter (± pixels/s) along x, the tracking axis
pub const PARTICLE_X_VEL_JITTER: f32 = 10.0;
/// Velocity jitter (± pixels/s) along y
pub const PARTICLE_Y_VEL_JITTER: f32 = 5.0;

/// Per-channel random colour ranges (half-open)
#[derive(Clone, Debug, PartialEq)]
pub struct ColorBand {
    pub red: Range<u8>,
    pub green: Range<u8>,
    pub blue: Range<u8>,
}

impl Default for ColorBand {
    /// Blue-violet sparkle
    fn default() -> Self {
        Self {
            red: 20..255,
            green: 20..255,
            blue: 200..255,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ParticleConfig {
    pub spawn_rate: f32,
    pub max_ttl: f32,
    pub gravity: f32,
    pub air_resistance: f32,
    pub position_jitter: f32,
    pub velocity_jitter: (f32, f32),
    pub colors: ColorBand,
}

impl ParticleConfig {
    /// Pool size that steady-state occupancy never exceeds
    pub fn capacity(&self) -> usize {
        (self.spawn_rate * self.max_ttl).round() as usize
    }

    pub fn validate(&self) -> Result<()> {
        let fail = |description: &str| {
            Err(WandError::InvalidParticleConfig {
                description: description.to_string(),
            })
        };

        if !(self.spawn_rate.is_finite() && self.spawn_rate > 0.0) {
            return fail("spawn_rate must be finite and > 0");
        }
        if !(self.max_ttl.is_finite() && self.max_ttl > 0.0) {
            return fail("max_ttl must be finite and > 0");
        }
        if !(self.air_resistance > 0.0 && self.air_resistance <= 1.0) {
            return fail("air_resistance must be in (0, 1]");
        }
        if !self.gravity.is_finite() {
            return fail("gravity must be finite");
        }
        let (jx, jy) = self.velocity_jitter;
        let jitter_ok = |j: f32| j.is_finite() && j >= 0.0;
        if !(jitter_ok(self.position_jitter) && jitter_ok(jx) && jitter_ok(jy)) {
            return fail("jitter must be finite and >= 0");
        }
        if self.colors.red.is_empty() || self.colors.green.is_empty() || self.colors.blue.is_empty() {
            return fail("colour ranges must be non-empty");
        }
        if self.capacity() == 0 {
            return fail("spawn_rate * max_ttl must round to at least 1");
        }
        Ok(())
    }
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            spawn_rate: PARTICLE_RATE,
            max_ttl: PARTICLE_TTL_MAX,
            gravity: PARTICLE_GRAVITY_ACCEL,
            air_resistance: PARTICLE_AIR_RESISTANCE,
            position_jitter: PARTICLE_POSITION_JITTER,
            velocity_jitter: (PARTICLE_X_VEL_JITTER, PARTICLE_Y_VEL_JITTER),
            colors: ColorBand::default(),
        }
    }
}
