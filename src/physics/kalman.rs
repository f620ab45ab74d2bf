//! Kalman Filter for wand position estimation
//!
//! State vector: [x, y, vx, vy, ax, ay]ᵀ (6 elements), unit time step
//! (velocity in pixels/frame). Only x, y are observed.
//!
//! `init`, `correct` and `propagate` all finish with a predict, so the
//! a-priori state is never stale when the next observation arrives.

use nalgebra::{SMatrix, SVector};

#[cfg(test)]
use super::state::StateVector;
use super::state::{
    MotionState, STATE_X, STATE_X_ACCEL, STATE_X_VEL, STATE_Y, STATE_Y_ACCEL, STATE_Y_VEL,
};
use crate::error::{Result, WandError};

/// 6x6 matrix type
pub type Matrix6 = SMatrix<f32, 6, 6>;
/// 2x6 matrix type (observation)
type Matrix2x6 = SMatrix<f32, 2, 6>;
/// 6x2 matrix type (Kalman gain)
type Matrix6x2 = SMatrix<f32, 6, 2>;
/// 2x2 matrix type
type Matrix2 = SMatrix<f32, 2, 2>;
/// 2-element vector type
type Vector2 = SVector<f32, 2>;

/// Filter time step: 1 frame
const DT: f32 = 1.0;

/// Constant acceleration is a poor model, so acceleration noise is inflated
pub const ACCEL_NOISE_GAIN: f32 = 100.0;

/// Error covariance for the first cycle, before any information accumulates
pub const INITIAL_ERROR_COV: f32 = 0.1;

/// Tuned empirically (i.e. looked OK on screen)
pub const DEFAULT_PROCESS_NOISE: f32 = 1e-5;
pub const DEFAULT_MEASUREMENT_NOISE: f32 = 1e-1;

/// Noise variances fixed at (re-)initialization
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FilterParameters {
    pub process_noise: f32,
    pub measurement_noise: f32,
}

impl FilterParameters {
    pub fn new(process_noise: f32, measurement_noise: f32) -> Result<Self> {
        let params = Self { process_noise, measurement_noise };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        let ok = |v: f32| v.is_finite() && v >= 0.0;
        if ok(self.process_noise) && ok(self.measurement_noise) {
            Ok(())
        } else {
            Err(WandError::InvalidFilterParameters {
                process_noise: self.process_noise,
                measurement_noise: self.measurement_noise,
            })
        }
    }
}

impl Default for FilterParameters {
    fn default() -> Self {
        Self {
            process_noise: DEFAULT_PROCESS_NOISE,
            measurement_noise: DEFAULT_MEASUREMENT_NOISE,
        }
    }
}

/// Lifecycle of the filter; only `init` leaves `Uninitialized`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterPhase {
    Uninitialized,
    Tracking,
}

/// Constant-acceleration Kalman filter over a single tracked point
pub struct KalmanFilter {
    phase: FilterPhase,
    params: FilterParameters,

    /// A-priori (predicted) state
    state_pre: MotionState,
    /// A-posteriori (corrected) state
    state_post: MotionState,

    /// Predicted error covariance
    error_cov_pre: Matrix6,
    /// Corrected error covariance
    error_cov_post: Matrix6,

    transition: Matrix6,
    process_noise: Matrix6,
    measurement_noise: Matrix2,
}

impl KalmanFilter {
    pub fn new() -> Self {
        Self {
            phase: FilterPhase::Uninitialized,
            params: FilterParameters::default(),
            state_pre: MotionState::new(),
            state_post: MotionState::new(),
            error_cov_pre: Matrix6::zeros(),
            error_cov_post: Matrix6::zeros(),
            transition: Self::transition_matrix(),
            process_noise: Matrix6::zeros(),
            measurement_noise: Matrix2::zeros(),
        }
    }

    /// Constant-acceleration step over a single camera frame (`DT` = 1)
    fn transition_matrix() -> Matrix6 {
        let half = 0.5 * DT * DT;
        let mut f = Matrix6::identity();
        f[(STATE_X, STATE_X_VEL)] = DT;
        f[(STATE_Y, STATE_Y_VEL)] = DT;
        f[(STATE_X_VEL, STATE_X_ACCEL)] = DT;
        f[(STATE_Y_VEL, STATE_Y_ACCEL)] = DT;
        f[(STATE_X, STATE_X_ACCEL)] = half;
        f[(STATE_Y, STATE_Y_ACCEL)] = half;
        f
    }

    /// The camera sees the tip's pixel position only
    fn observation_matrix() -> Matrix2x6 {
        Matrix2x6::identity()
    }

    /// (Re-)initialize from a measured point. Safe to call at any time as a hard reset.
    pub fn init(&mut self, initial: (f32, f32), params: FilterParameters) {
        self.params = params;
        self.transition = Self::transition_matrix();

        self.process_noise = Matrix6::identity() * params.process_noise;
        self.process_noise[(STATE_X_ACCEL, STATE_X_ACCEL)] *= ACCEL_NOISE_GAIN;
        self.process_noise[(STATE_Y_ACCEL, STATE_Y_ACCEL)] *= ACCEL_NOISE_GAIN;

        self.measurement_noise = Matrix2::identity() * params.measurement_noise;

        // Needed for the first iteration only
        self.error_cov_post = Matrix6::identity() * INITIAL_ERROR_COV;

        self.state_post = MotionState::at(initial.0, initial.1);
        self.phase = FilterPhase::Tracking;

        log::debug!(
            "kalman init at ({:.1}, {:.1}) q={:e} r={:e}",
            initial.0, initial.1, params.process_noise, params.measurement_noise
        );

        self.predict();
    }

    /// Project the corrected state forward one step; returns predicted position.
    ///
    /// Recomputes the prior from the posterior, so repeated calls agree.
    pub fn predict(&mut self) -> (f32, f32) {
        if self.phase == FilterPhase::Uninitialized {
            log::debug!("kalman predict before init ignored");
            return self.state_pre.position();
        }

        let f = self.transition;

        // State prediction: x⁻ = F * x⁺
        self.state_pre = MotionState(f * self.state_post.0);

        // Covariance prediction: P⁻ = F * P⁺ * Fᵀ + Q
        self.error_cov_pre = f * self.error_cov_post * f.transpose() + self.process_noise;

        self.state_pre.position()
    }

    /// Fuse an observed position; returns corrected position
    pub fn correct(&mut self, observed: (f32, f32)) -> (f32, f32) {
        if self.phase == FilterPhase::Uninitialized {
            log::debug!("kalman correct before init ignored");
            return self.state_post.position();
        }

        let h = Self::observation_matrix();
        let z = Vector2::new(observed.0, observed.1);

        // Innovation: y = z - H * x⁻
        let innovation = z - h * self.state_pre.0;

        // Innovation covariance: S = H * P⁻ * Hᵀ + R
        let s = h * self.error_cov_pre * h.transpose() + self.measurement_noise;

        let s_inv = match s.try_inverse() {
            Some(inv) => inv,
            None => {
                log::warn!("singular innovation covariance; propagating without measurement");
                self.propagate();
                return self.state_post.position();
            }
        };

        // Kalman gain: K = P⁻ * Hᵀ * S⁻¹
        let k: Matrix6x2 = self.error_cov_pre * h.transpose() * s_inv;

        // State update: x⁺ = x⁻ + K * y
        self.state_post = MotionState(self.state_pre.0 + k * innovation);

        // Covariance update: P⁺ = (I - K * H) * P⁻
        self.error_cov_post = (Matrix6::identity() - k * h) * self.error_cov_pre;

        let corrected = self.state_post.position();
        self.predict();
        corrected
    }

    /// Advance the state with no new measurement
    pub fn propagate(&mut self) {
        if self.phase == FilterPhase::Uninitialized {
            return;
        }
        self.state_post = self.state_pre;
        self.error_cov_post = self.error_cov_pre;
        self.predict();
    }

    pub fn is_initialized(&self) -> bool {
        self.phase == FilterPhase::Tracking
    }

    pub fn phase(&self) -> FilterPhase {
        self.phase
    }

    pub fn params(&self) -> FilterParameters {
        self.params
    }

    pub fn predicted_position(&self) -> (f32, f32) {
        self.state_pre.position()
    }

    pub fn corrected_position(&self) -> (f32, f32) {
        self.state_post.position()
    }

    pub fn predicted_velocity(&self) -> (f32, f32) {
        self.state_pre.velocity()
    }

    pub fn corrected_velocity(&self) -> (f32, f32) {
        self.state_post.velocity()
    }

    /// Heading of the predicted velocity, measured from the +y axis
    pub fn predicted_velocity_angle(&self) -> f32 {
        self.state_pre.x_vel().atan2(self.state_pre.y_vel())
    }

    pub fn predicted_acceleration(&self) -> (f32, f32) {
        self.state_pre.acceleration()
    }

    pub fn corrected_acceleration(&self) -> (f32, f32) {
        self.state_post.acceleration()
    }

    pub fn predicted_state(&self) -> &MotionState {
        &self.state_pre
    }

    pub fn corrected_state(&self) -> &MotionState {
        &self.state_post
    }

    /// Trace of the corrected error covariance (diagnostics)
    pub fn uncertainty(&self) -> f32 {
        self.error_cov_post.trace()
    }

    #[cfg(test)]
    fn state_vector(&self) -> StateVector {
        self.state_post.0
    }

    /// Pretend the prior is exact, so `S` collapses to `R`
    #[cfg(test)]
    fn forget_prior_uncertainty(&mut self) {
        self.error_cov_pre = Matrix6::zeros();
    }
}

impl Default for KalmanFilter {
    fn default() -> Self {
        Self::new()
    }
}
