//! Error types for configuration and host-supplied buffers
//!
//! The per-frame core never fails; these only guard the bridge boundary.

use std::fmt;
use wasm_bindgen::JsValue;

/// Errors raised when the host hands us bad parameters or mismatched buffers
#[derive(Debug, Clone, PartialEq)]
pub enum WandError {
    /// Noise variances must be finite and non-negative
    InvalidFilterParameters {
        process_noise: f32,
        measurement_noise: f32,
    },

    /// Particle configuration rejected
    InvalidParticleConfig {
        /// Which field failed validation
        description: String,
    },

    /// RGBA buffer length does not match width × height × 4
    FrameSizeMismatch {
        expected: usize,
        actual: usize,
    },

    /// Depth map length does not match width × height
    DepthSizeMismatch {
        expected: usize,
        actual: usize,
    },
}

impl fmt::Display for WandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WandError::InvalidFilterParameters {
                process_noise,
                measurement_noise,
            } => write!(
                f,
                "Invalid filter noise (process: {}, measurement: {}); both must be finite and >= 0",
                process_noise, measurement_noise
            ),
            WandError::InvalidParticleConfig { description } => {
                write!(f, "Invalid particle configuration: {}", description)
            }
            WandError::FrameSizeMismatch { expected, actual } => write!(
                f,
                "Frame buffer size mismatch: expected {} bytes, got {}",
                expected, actual
            ),
            WandError::DepthSizeMismatch { expected, actual } => write!(
                f,
                "Depth map size mismatch: expected {} samples, got {}",
                expected, actual
            ),
        }
    }
}

impl std::error::Error for WandError {}

impl From<WandError> for JsValue {
    fn from(err: WandError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, WandError>;
