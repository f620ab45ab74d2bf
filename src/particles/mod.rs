//! Particles module - pixie-dust trail following the wand
//!
//! Re-exports only. All logic in submodules.

mod config;
mod particle;
mod pool;

pub use config::{
    ParticleConfig, ColorBand,
    PARTICLE_RATE, PARTICLE_TTL_MAX, PARTICLE_GRAVITY_ACCEL, PARTICLE_AIR_RESISTANCE,
    PARTICLE_POSITION_JITTER, PARTICLE_X_VEL_JITTER, PARTICLE_Y_VEL_JITTER,
};
pub use particle::{Particle, Color, transition_matrix};
pub use pool::ParticlePool;
