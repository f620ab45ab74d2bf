//! Wand tracker - per-frame filter protocol with divergence recovery
//!
//! The filter sometimes becomes unstable after a sudden large jump in the
//! observed point. When the corrected estimate leaves the valid observation
//! bounds (or stops being finite) the filter is re-seeded from the raw
//! observation instead of integrating from a diverged state.

use super::kalman::{FilterParameters, KalmanFilter};
use super::state::MotionState;
use crate::error::Result;

/// Valid observation area: `0 <= x < width`, `0 <= y < height`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, point: (f32, f32)) -> bool {
        point.0 >= 0.0 && point.0 < self.width && point.1 >= 0.0 && point.1 < self.height
    }
}

impl Default for Bounds {
    /// Kinect depth frame
    fn default() -> Self {
        Self::new(640.0, 480.0)
    }
}

/// Result of one tracking step
#[derive(Clone, Copy, Debug)]
pub struct TrackOutcome {
    /// Corrected filter position after this step
    pub wand: (f32, f32),
    /// Last stable state; seeds particle generation. It lags a recovery by
    /// at least one step, so the trail jumps to the new spot late rather than
    /// never.
    pub state: MotionState,
    /// Filter was re-seeded this step
    pub recovered: bool,
}

pub struct WandTracker {
    filter: KalmanFilter,
    params: FilterParameters,
    bounds: Bounds,
    /// Corrected state from the most recent in-bounds step
    stable_state: MotionState,
    recoveries: u32,
}

impl WandTracker {
    pub fn new(params: FilterParameters, bounds: Bounds) -> Self {
        Self {
            filter: KalmanFilter::new(),
            params,
            bounds,
            stable_state: MotionState::new(),
            recoveries: 0,
        }
    }

    /// Feed one observation through init/correct/recover/predict
    pub fn track(&mut self, observed: (f32, f32)) -> TrackOutcome {
        if !self.filter.is_initialized() {
            self.filter.init(observed, self.params);
            self.stable_state = *self.filter.corrected_state();
        }

        let corrected = self.filter.correct(observed);
        let diverged =
            !self.bounds.contains(corrected) || !self.filter.corrected_state().is_finite();

        if diverged {
            log::warn!(
                "wand estimate ({:.1}, {:.1}) left bounds; re-seeding at ({:.1}, {:.1})",
                corrected.0, corrected.1, observed.0, observed.1
            );
            self.filter.init(observed, self.params);
            self.recoveries += 1;
        } else {
            self.stable_state = *self.filter.corrected_state();
        }

        log::trace!("wand observed {:?} corrected {:?}", observed, corrected);

        TrackOutcome {
            wand: self.filter.corrected_position(),
            state: self.stable_state,
            recovered: diverged,
        }
    }

    /// Force re-initialization on the next observation
    pub fn reset(&mut self) {
        self.filter = KalmanFilter::new();
        self.stable_state = MotionState::new();
    }

    /// Replace noise parameters; takes effect at the forced re-init
    pub fn set_params(&mut self, params: FilterParameters) -> Result<()> {
        params.validate()?;
        log::debug!("wand filter params {:?}", params);
        self.params = params;
        self.reset();
        Ok(())
    }

    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn params(&self) -> FilterParameters {
        self.params
    }

    pub fn is_initialized(&self) -> bool {
        self.filter.is_initialized()
    }

    /// Number of divergence recoveries since creation
    pub fn recoveries(&self) -> u32 {
        self.recoveries
    }

    pub fn filter(&self) -> &KalmanFilter {
        &self.filter
    }
}

impl Default for WandTracker {
    fn default() -> Self {
        Self::new(FilterParameters::default(), Bounds::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_observation_initializes() {
        let mut tracker = WandTracker::default();
        assert!(!tracker.is_initialized());
        let outcome = tracker.track((320.0, 240.0));
        assert!(tracker.is_initialized());
        assert!(!outcome.recovered);
        assert_eq!(outcome.wand, (320.0, 240.0));
        assert_eq!(outcome.state.position(), (320.0, 240.0));
    }

    #[test]
    fn test_bounds_are_half_open() {
        let bounds = Bounds::new(640.0, 480.0);
        assert!(bounds.contains((0.0, 0.0)));
        assert!(bounds.contains((639.9, 479.9)));
        assert!(!bounds.contains((640.0, 10.0)));
        assert!(!bounds.contains((10.0, -0.1)));
    }

    #[test]
    fn test_jump_out_of_bounds_reseeds() {
        let mut tracker = WandTracker::default();
        tracker.track((320.0, 240.0));
        let outcome = tracker.track((1500.0, 900.0));
        assert!(outcome.recovered);
        assert_eq!(tracker.recoveries(), 1);
        assert_eq!(outcome.wand, (1500.0, 900.0));
        assert_eq!(tracker.filter().corrected_velocity(), (0.0, 0.0));
        // Particles keep following the last trustworthy state
        assert_eq!(outcome.state.position(), (320.0, 240.0));
    }

    #[test]
    fn test_stable_state_catches_up_after_recovery() {
        let mut tracker = WandTracker::default();
        tracker.track((320.0, 240.0));
        assert!(tracker.track((1500.0, 900.0)).recovered);

        // Still pulled out of bounds by the far-away seed
        let back = tracker.track((630.0, 470.0));
        assert!(back.recovered);
        assert_eq!(back.state.position(), (320.0, 240.0));

        let settled = tracker.track((630.0, 470.0));
        assert!(!settled.recovered);
        assert_eq!(settled.state.position(), (630.0, 470.0));
        assert_eq!(tracker.recoveries(), 2);
    }

    #[test]
    fn test_reset_forces_reinit() {
        let mut tracker = WandTracker::default();
        tracker.track((100.0, 100.0));
        tracker.track((110.0, 100.0));
        tracker.reset();
        assert!(!tracker.is_initialized());
        let outcome = tracker.track((50.0, 60.0));
        assert_eq!(outcome.wand, (50.0, 60.0));
    }

    #[test]
    fn test_set_params_validates() {
        let mut tracker = WandTracker::default();
        let bad = FilterParameters { process_noise: -1.0, measurement_noise: 0.1 };
        assert!(tracker.set_params(bad).is_err());
        let good = FilterParameters { process_noise: 1e-4, measurement_noise: 1e-2 };
        assert!(tracker.set_params(good).is_ok());
        assert_eq!(tracker.params(), good);
    }
}
