//! Pixie Wand - depth-camera wand with a pixie-dust trail
//!
//! Entry point for WASM module. Only contains:
//! - Module declarations
//! - wasm_bindgen entry points that delegate to submodules

mod bridge;
mod error;
pub mod particles;
pub mod physics;
pub mod renderer;

use wasm_bindgen::prelude::*;

pub use error::{Result, WandError};
pub use bridge::{WandSession, DEFAULT_SEED};

// Re-export wasm_bindgen functions for JS access
pub use bridge::{
    wand_tick, wand_tick_depth, mirror_frame,
    configure_filter, configure_particles, seed_particles,
    reset_wand, is_wand_initialized, get_wand_state,
    get_debug_overlay_text, set_log_level,
};

// ============================================================================
// WASM ENTRY POINTS
// ============================================================================

/// Called automatically when WASM module loads
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
    bridge::install_console_logger(log::LevelFilter::Info);
    log::info!("✨ Pixie wand ready");
}
