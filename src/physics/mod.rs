//! Physics module - Kalman filter estimation and wand tracking
//!
//! Re-exports only. All logic in submodules.

mod state;
mod kalman;
mod tracker;
mod nearest;

pub use state::{
    MotionState, StateVector, NUM_STATES,
    STATE_X, STATE_Y, STATE_X_VEL, STATE_Y_VEL, STATE_X_ACCEL, STATE_Y_ACCEL,
};
pub use kalman::{
    KalmanFilter, FilterParameters, FilterPhase,
    ACCEL_NOISE_GAIN, INITIAL_ERROR_COV, DEFAULT_PROCESS_NOISE, DEFAULT_MEASUREMENT_NOISE,
};
pub use kalman::Matrix6;
pub use tracker::{WandTracker, Bounds, TrackOutcome};
pub use nearest::nearest_point;
