//! Motion state - shared kinematic vector for the filter and particles
//!
//! Layout: [x, y, x_vel, y_vel, x_accel, y_accel]ᵀ

use nalgebra::SVector;

/// 6-element state vector type
pub type StateVector = SVector<f32, 6>;

pub const STATE_X: usize = 0;
pub const STATE_Y: usize = 1;
pub const STATE_X_VEL: usize = 2;
pub const STATE_Y_VEL: usize = 3;
pub const STATE_X_ACCEL: usize = 4;
pub const STATE_Y_ACCEL: usize = 5;
pub const NUM_STATES: usize = 6;

/// Position, velocity and acceleration of a point in two axes
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionState(pub StateVector);

impl MotionState {
    pub fn new() -> Self {
        Self(StateVector::zeros())
    }

    /// At rest at the given position
    pub fn at(x: f32, y: f32) -> Self {
        let mut state = StateVector::zeros();
        state[STATE_X] = x;
        state[STATE_Y] = y;
        Self(state)
    }

    pub fn x(&self) -> f32 { self.0[STATE_X] }
    pub fn y(&self) -> f32 { self.0[STATE_Y] }
    pub fn x_vel(&self) -> f32 { self.0[STATE_X_VEL] }
    pub fn y_vel(&self) -> f32 { self.0[STATE_Y_VEL] }
    pub fn x_accel(&self) -> f32 { self.0[STATE_X_ACCEL] }
    pub fn y_accel(&self) -> f32 { self.0[STATE_Y_ACCEL] }

    pub fn position(&self) -> (f32, f32) {
        (self.x(), self.y())
    }

    pub fn velocity(&self) -> (f32, f32) {
        (self.x_vel(), self.y_vel())
    }

    pub fn acceleration(&self) -> (f32, f32) {
        (self.x_accel(), self.y_accel())
    }

    /// Speed magnitude
    pub fn speed(&self) -> f32 {
        let (vx, vy) = self.velocity();
        (vx * vx + vy * vy).sqrt()
    }

    /// Linear interpolation: `self + t * (other - self)`
    pub fn lerp(&self, other: &MotionState, t: f32) -> MotionState {
        MotionState(self.0 + (other.0 - self.0) * t)
    }

    /// True when no component is NaN or infinite
    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|v| v.is_finite())
    }

    /// Flat copy for handing across the JS boundary
    pub fn to_array(&self) -> [f32; NUM_STATES] {
        self.0.into()
    }
}

impl Default for MotionState {
    fn default() -> Self {
        Self::new()
    }
}

impl From<StateVector> for MotionState {
    fn from(v: StateVector) -> Self {
        Self(v)
    }
}
