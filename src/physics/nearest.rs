//! Nearest-point search over a depth map
//!
//! A zero sample means "outside the sensor's range" and is never a candidate.

use crate::error::{Result, WandError};

/// Location `(x, y)` of the smallest non-zero depth sample.
///
/// Ties resolve to the first sample in row-major order. With `mirrored` the
/// x coordinate is flipped to match a horizontally mirrored colour frame.
/// Returns `Ok(None)` when the map holds no valid sample.
pub fn nearest_point(
    depth: &[u16],
    width: usize,
    height: usize,
    mirrored: bool,
) -> Result<Option<(f32, f32)>> {
    let expected = width.checked_mul(height);
    if expected != Some(depth.len()) {
        return Err(WandError::DepthSizeMismatch {
            expected: expected.unwrap_or(usize::MAX),
            actual: depth.len(),
        });
    }

    let nearest = depth
        .iter()
        .enumerate()
        .filter(|&(_, &d)| d != 0)
        .fold(None, |best: Option<(usize, u16)>, (i, &d)| match best {
            Some((_, best_d)) if best_d <= d => best,
            _ => Some((i, d)),
        });

    Ok(nearest.map(|(i, _)| {
        let x = i % width;
        let y = i / width;
        let x = if mirrored { width - 1 - x } else { x };
        (x as f32, y as f32)
    }))
}
