//! Sand Sandbox - a falling sand cellular automaton
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid, brush, physics step)
//! - `renderer`: WebGPU rendering pipeline
//! - `settings`: Persisted preferences

pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::Settings;

use glam::{IVec2, Vec2};

/// Sandbox configuration constants
pub mod consts {
    /// Default window dimensions in pixels
    pub const WINDOW_WIDTH: u32 = 800;
    pub const WINDOW_HEIGHT: u32 = 600;
    pub const TARGET_FPS: u32 = 60;

    /// Pixels per cell side
    pub const CELL_SIZE: u32 = 4;
    /// Grid dimensions in cells
    pub const GRID_WIDTH: u32 = WINDOW_WIDTH / CELL_SIZE;
    pub const GRID_HEIGHT: u32 = WINDOW_HEIGHT / CELL_SIZE;
    /// Largest grid accepted per axis
    pub const MAX_GRID_SIZE: u32 = 4096;

    /// Physics tick rate (50 Hz)
    pub const PHYSICS_HZ: u32 = 50;
    /// Fixed physics timestep
    pub const PHYSICS_DT: f32 = 1.0 / PHYSICS_HZ as f32;

    /// Brush side length in cells
    pub const BRUSH_SIZE: u32 = 4;
    pub const MAX_BRUSH_SIZE: u32 = 64;
}

/// Map a pointer position in pixels to the grid cell under it
///
/// Truncates the pixel position and then divides with truncation, so a
/// pointer slightly left of or above the canvas still lands on row/column 0.
/// Cells outside the grid are left for the brush to clip.
#[inline]
pub fn pointer_to_cell(pos: Vec2, cell_size: u32) -> IVec2 {
    let cell = cell_size.clamp(1, i32::MAX as u32) as i32;
    IVec2::new(pos.x as i32 / cell, pos.y as i32 / cell)
}
