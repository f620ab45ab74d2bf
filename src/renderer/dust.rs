//! Particle compositing - alpha-blends live particles onto the frame

use super::frame::Frame;
use crate::particles::ParticlePool;

/// Draw every visible particle as a 2-pixel-tall dot; returns how many were drawn.
///
/// Particles whose rounded position (or the pixel below it) falls off the
/// frame are skipped.
pub fn draw_particles(pool: &ParticlePool, frame: &mut Frame) -> usize {
    let width = frame.width() as f32;
    let height = frame.height() as f32;
    let mut drawn = 0;

    for p in pool.live() {
        let x = p.x().round();
        let y = p.y().round();
        if !(x >= 0.0 && x < width && y >= 0.0 && y < height - 1.0) {
            continue;
        }
        let (x, y) = (x as usize, y as usize);
        frame.blend(x, y, p.color(), p.alpha());
        frame.blend(x, y + 1, p.color(), p.alpha());
        drawn += 1;
    }

    drawn
}
