//! A single pixie-dust particle and its equations of motion

use crate::physics::{
    Matrix6, MotionState, STATE_X, STATE_X_VEL, STATE_Y, STATE_Y_ACCEL, STATE_Y_VEL,
};
use rand::Rng;

use super::config::ParticleConfig;

/// RGB colour
pub type Color = [u8; 3];

/// Ballistic particle with a fading alpha
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    /// Position, velocity, acceleration
    pub(crate) state: MotionState,
    /// 1.0 opaque, 0.0 transparent
    pub(crate) alpha: f32,
    /// Seconds remaining
    pub(crate) ttl: f32,
    pub(crate) color: Color,
}

impl Particle {
    /// Faded placeholder occupying an unused pool slot
    pub fn placeholder() -> Self {
        Self {
            state: MotionState::new(),
            alpha: 0.0,
            ttl: 0.0,
            color: [0, 0, 0],
        }
    }

    /// Fresh particle seeded from `seed` with a bit of random magic
    pub(crate) fn spawn<R: Rng + ?Sized>(seed: &MotionState, config: &ParticleConfig, rng: &mut R) -> Self {
        let mut state = *seed;
        let pj = config.position_jitter;
        let (vjx, vjy) = config.velocity_jitter;

        state.0[STATE_X] += uniform(rng, pj);
        state.0[STATE_Y] += uniform(rng, pj);
        state.0[STATE_X_VEL] += uniform(rng, vjx);
        state.0[STATE_Y_VEL] += uniform(rng, vjy);

        // Constant pull along y
        state.0[STATE_Y_ACCEL] = config.gravity;

        let colors = &config.colors;
        Self {
            state,
            alpha: 1.0,
            ttl: config.max_ttl,
            color: [
                rng.gen_range(colors.red.clone()),
                rng.gen_range(colors.green.clone()),
                rng.gen_range(colors.blue.clone()),
            ],
        }
    }

    pub fn is_live(&self) -> bool {
        self.alpha > 0.0
    }

    /// Apply the shared transition and age by `dt`
    pub(crate) fn advance(&mut self, transition: &Matrix6, dt: f32, max_ttl: f32) {
        self.state = MotionState(transition * self.state.0);
        self.ttl = (self.ttl - dt).max(0.0);
        self.alpha = self.ttl / max_ttl;
    }

    pub fn state(&self) -> &MotionState { &self.state }
    pub fn alpha(&self) -> f32 { self.alpha }
    pub fn ttl(&self) -> f32 { self.ttl }
    pub fn color(&self) -> Color { self.color }

    pub fn x(&self) -> f32 { self.state.x() }
    pub fn y(&self) -> f32 { self.state.y() }
    pub fn x_vel(&self) -> f32 { self.state.x_vel() }
    pub fn y_vel(&self) -> f32 { self.state.y_vel() }
    pub fn x_accel(&self) -> f32 { self.state.x_accel() }
    pub fn y_accel(&self) -> f32 { self.state.y_accel() }
}

impl Default for Particle {
    fn default() -> Self {
        Self::placeholder()
    }
}

/// Uniform sample in `[-half_width, half_width)`; zero width gives zero
fn uniform<R: Rng + ?Sized>(rng: &mut R, half_width: f32) -> f32 {
    if half_width > 0.0 {
        rng.gen_range(-half_width..half_width)
    } else {
        0.0
    }
}

/// Kinematic transition for one step of `dt` seconds
///
/// ```text
/// x(t)       = x + x_vel*dt + ½ x_accel*dt²
/// y(t)       = y + y_vel*dt + ½ y_accel*dt²
/// x_vel(t)   = k*x_vel + x_accel*dt        (k: air resistance)
/// y_vel(t)   = y_vel + y_accel*dt
/// x_accel(t) = 0                           (no sustained thrust)
/// y_accel(t) = y_accel                     (gravity)
/// ```
pub fn transition_matrix(dt: f32, k: f32) -> Matrix6 {
    let dt2 = 0.5 * dt * dt;
    Matrix6::new(
        1.0, 0.0, dt,  0.0, dt2, 0.0,
        0.0, 1.0, 0.0, dt,  0.0, dt2,
        0.0, 0.0, k,   0.0, dt,  0.0,
        0.0, 0.0, 0.0, 1.0, 0.0, dt,
        0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
        0.0, 0.0, 0.0, 0.0, 0.0, 1.0,
    )
}
