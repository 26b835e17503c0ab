//! Tunable playground parameters
//!
//! Persisted in LocalStorage so tweaks survive a reload.

use serde::{Deserialize, Serialize};

use crate::consts;

/// Physics and HUD tuning knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tuning {
    // === Physics ===
    /// Downward acceleration per frame (px/frame^2)
    pub gravity: f32,
    /// Fraction of vertical speed kept after a floor or ceiling bounce
    pub bounce_damping: f32,
    /// Below this speed on both axes a ball is parked
    pub stop_threshold: f32,
    /// Gap kept between the footer and the floor line (px)
    pub floor_clearance: f32,
    /// Spawn velocity components are drawn from +/- this (px/frame)
    pub spawn_speed: f32,

    // === Capacity ===
    /// Spawns beyond this are dropped
    pub max_balls: usize,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: consts::GRAVITY,
            bounce_damping: consts::BOUNCE_DAMPING,
            stop_threshold: consts::STOP_THRESHOLD,
            floor_clearance: consts::FLOOR_CLEARANCE,
            spawn_speed: consts::SPAWN_SPEED,

            max_balls: consts::MAX_BALLS,

            show_fps: true,
        }
    }
}

impl Tuning {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "ball_pit_tuning";

    /// Load tuning from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(tuning) = serde_json::from_str(&json) {
                    log::info!("Loaded tuning from LocalStorage");
                    return tuning;
                }
            }
        }

        log::info!("Using default tuning");
        Self::default()
    }

    /// Save tuning to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Tuning saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
