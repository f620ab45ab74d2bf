//! Bridge module - JS ↔ Rust communication
//!
//! All #[wasm_bindgen] entry points live here.
//! Re-exports only in mod.rs, logic in submodules.

mod console;
mod session;
mod wand;

pub use console::install_console_logger;

pub use session::{WandSession, DEFAULT_SEED};

pub use wand::{
    // WASM entry points
    wand_tick,
    wand_tick_depth,
    mirror_frame,
    configure_filter,
    configure_particles,
    seed_particles,
    reset_wand,
    is_wand_initialized,
    get_wand_state,
    get_debug_overlay_text,
    set_log_level,
};
