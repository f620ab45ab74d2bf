//! Wand session storage and JS bridge
//!
//! The host (camera capture + canvas) calls `wand_tick` once per frame with
//! the observed point, the elapsed time and the frame's RGBA pixels.
//! wasm-bindgen copies the mutated pixels back into the host's array.

use wasm_bindgen::prelude::*;
use std::cell::RefCell;

use super::console::install_console_logger;
use super::session::{WandSession, DEFAULT_SEED};
use crate::particles::ParticleConfig;
use crate::physics::FilterParameters;
use crate::renderer::Frame;

// Thread-local storage (WASM is single-threaded)
thread_local! {
    static SESSION: RefCell<WandSession> = RefCell::new(WandSession::with_seed(clock_seed()));
}

/// Different sparkle on every page load
fn clock_seed() -> u64 {
    if cfg!(target_arch = "wasm32") {
        js_sys::Date::now() as u64
    } else {
        DEFAULT_SEED
    }
}

// ============================================================================
// WASM-BINDGEN ENTRY POINTS
// ============================================================================

/// Track one observed point and composite the trail onto `pixels`.
///
/// Returns `[wand_x, wand_y]`.
#[wasm_bindgen]
pub fn wand_tick(
    x: f32,
    y: f32,
    dt: f32,
    pixels: &mut [u8],
    width: u32,
    height: u32,
) -> Result<Vec<f32>, JsValue> {
    let mut frame = Frame::from_rgba(pixels, width as usize, height as usize)?;
    let wand = SESSION.with(|cell| cell.borrow_mut().tick((x, y), dt, &mut frame));
    Ok(vec![wand.0, wand.1])
}

/// Like `wand_tick`, but finds the nearest point in a depth map of the same size.
///
/// Returns `undefined` (and leaves the frame alone) when no depth sample is valid.
#[wasm_bindgen]
pub fn wand_tick_depth(
    depth: &[u16],
    dt: f32,
    pixels: &mut [u8],
    width: u32,
    height: u32,
    mirrored: bool,
) -> Result<Option<Vec<f32>>, JsValue> {
    let mut frame = Frame::from_rgba(pixels, width as usize, height as usize)?;
    let wand = SESSION.with(|cell| cell.borrow_mut().tick_depth(depth, dt, &mut frame, mirrored))?;
    Ok(wand.map(|(x, y)| vec![x, y]))
}

/// Flip the host frame horizontally, for facing the camera
#[wasm_bindgen]
pub fn mirror_frame(pixels: &mut [u8], width: u32, height: u32) -> Result<(), JsValue> {
    let mut frame = Frame::from_rgba(pixels, width as usize, height as usize)?;
    frame.mirror();
    Ok(())
}

/// Set filter noise; the filter re-seeds on the next observation
#[wasm_bindgen]
pub fn configure_filter(process_noise: f32, measurement_noise: f32) -> Result<(), JsValue> {
    let params = FilterParameters::new(process_noise, measurement_noise)?;
    SESSION.with(|cell| cell.borrow_mut().configure_filter(params))?;
    Ok(())
}

/// Rebuild the particle pool with new dynamics (drops current particles)
#[wasm_bindgen]
pub fn configure_particles(
    spawn_rate: f32,
    max_ttl: f32,
    gravity: f32,
    air_resistance: f32,
) -> Result<(), JsValue> {
    let config = ParticleConfig {
        spawn_rate,
        max_ttl,
        gravity,
        air_resistance,
        ..Default::default()
    };
    SESSION.with(|cell| cell.borrow_mut().configure_particles(config))?;
    Ok(())
}

/// Make the sparkle reproducible
#[wasm_bindgen]
pub fn seed_particles(seed: u32) {
    SESSION.with(|cell| cell.borrow_mut().reseed(seed as u64));
}

#[wasm_bindgen]
pub fn reset_wand() {
    SESSION.with(|cell| cell.borrow_mut().reset());
    log::info!("wand reset");
}

#[wasm_bindgen]
pub fn is_wand_initialized() -> bool {
    SESSION.with(|cell| cell.borrow().is_initialized())
}

/// Corrected `[x, y, x_vel, y_vel, x_accel, y_accel]`
#[wasm_bindgen]
pub fn get_wand_state() -> Vec<f32> {
    SESSION.with(|cell| cell.borrow().corrected_state().to_array().to_vec())
}

/// Overlay text for the host's debug panel
#[wasm_bindgen]
pub fn get_debug_overlay_text() -> String {
    SESSION.with(|cell| cell.borrow().stats().overlay_text())
}

/// Console verbosity: "off", "error", "warn", "info", "debug" or "trace"
#[wasm_bindgen]
pub fn set_log_level(level: &str) -> Result<(), JsValue> {
    let filter = level
        .parse::<log::LevelFilter>()
        .map_err(|_| JsValue::from_str(&format!("Unknown log level: {}", level)))?;
    install_console_logger(filter);
    Ok(())
}
