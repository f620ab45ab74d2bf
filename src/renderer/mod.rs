//! Renderer module - composites the particle trail into host frames
//!
//! Re-exports only. All logic in submodules.

mod frame;
mod dust;
mod debug_ui;

pub use frame::{Frame, Pixel};
pub use dust::draw_particles;
pub use debug_ui::FrameStats;
