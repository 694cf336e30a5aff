//! Sandbox settings
//!
//! Persisted as JSON: LocalStorage on the web, a file in the working
//! directory on native.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::Material;

/// Sandbox settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Grid ===
    /// Grid width in cells
    pub grid_width: u32,
    /// Grid height in cells
    pub grid_height: u32,
    /// Pixels per cell side
    pub cell_size: u32,

    // === Brush ===
    /// Brush side length in cells
    pub brush_size: u32,
    /// Material selected at startup (primary button)
    pub initial_material: Material,
    /// Material painted by the secondary button
    pub right_button_material: Material,

    // === Physics ===
    /// Physics ticks per second
    pub physics_hz: u32,
    /// Tie-break RNG seed (None = seed from the clock)
    pub seed: Option<u64>,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            grid_width: GRID_WIDTH,
            grid_height: GRID_HEIGHT,
            cell_size: CELL_SIZE,

            brush_size: BRUSH_SIZE,
            initial_material: Material::Sand,
            right_button_material: Material::Water,

            physics_hz: PHYSICS_HZ,
            seed: None,

            show_fps: true,
        }
    }
}

impl Settings {
    /// Fixed physics timestep in seconds
    pub fn timestep(&self) -> f32 {
        1.0 / self.physics_hz.max(1) as f32
    }

    /// Window/canvas size in pixels implied by the grid
    pub fn window_size(&self) -> (u32, u32) {
        (
            self.grid_width.saturating_mul(self.cell_size),
            self.grid_height.saturating_mul(self.cell_size),
        )
    }

    /// Clamp values the simulation cannot run with
    pub fn sanitized(mut self) -> Self {
        if self.grid_width == 0 || self.grid_height == 0 {
            log::warn!(
                "Grid {}x{} is empty, using {}x{}",
                self.grid_width,
                self.grid_height,
                GRID_WIDTH,
                GRID_HEIGHT
            );
            self.grid_width = GRID_WIDTH;
            self.grid_height = GRID_HEIGHT;
        }
        if self.grid_width > MAX_GRID_SIZE || self.grid_height > MAX_GRID_SIZE {
            log::warn!(
                "Grid {}x{} too large, clamping each side to {}",
                self.grid_width,
                self.grid_height,
                MAX_GRID_SIZE
            );
            self.grid_width = self.grid_width.min(MAX_GRID_SIZE);
            self.grid_height = self.grid_height.min(MAX_GRID_SIZE);
        }
        if self.cell_size == 0 {
            log::warn!("Cell size 0, using {}", CELL_SIZE);
            self.cell_size = CELL_SIZE;
        }
        if self.physics_hz == 0 {
            log::warn!("Physics rate 0 Hz, using {}", PHYSICS_HZ);
            self.physics_hz = PHYSICS_HZ;
        }
        if self.brush_size > MAX_BRUSH_SIZE {
            log::warn!("Brush size {} too large, using {}", self.brush_size, MAX_BRUSH_SIZE);
            self.brush_size = MAX_BRUSH_SIZE;
        }
        self
    }

    /// Parse settings JSON, falling back to defaults for missing fields
    pub fn from_json(json: &str) -> Option<Self> {
        match serde_json::from_str::<Settings>(json) {
            Ok(settings) => Some(settings.sanitized()),
            Err(e) => {
                log::warn!("Ignoring malformed settings: {}", e);
                None
            }
        }
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "sand_sandbox_settings";

    /// Settings file on native
    pub const FILE_NAME: &'static str = "sandbox_settings.json";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Some(settings) = Self::from_json(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Load settings from `sandbox_settings.json` if present
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::load_from(std::path::Path::new(Self::FILE_NAME))
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        self.save_to(std::path::Path::new(Self::FILE_NAME));
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => {
                if let Some(settings) = Self::from_json(&json) {
                    log::info!("Loaded settings from {}", path.display());
                    return settings;
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => log::warn!("Could not read {}: {}", path.display(), e),
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Write settings as pretty JSON, logging (not returning) failures
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to(&self, path: &std::path::Path) {
        match serde_json::to_string_pretty(self) {
            Ok(json) => match std::fs::write(path, json) {
                Ok(()) => log::info!("Settings saved to {}", path.display()),
                Err(e) => log::warn!("Could not write {}: {}", path.display(), e),
            },
            Err(e) => log::warn!("Could not serialize settings: {}", e),
        }
    }
}
