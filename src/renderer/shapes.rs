//! Shape generation for the cell grid
//!
//! Everything here works in pixel space with the origin at the top left;
//! the pipeline maps pixels to NDC.

use glam::Vec2;

use super::vertex::{Vertex, material_color};
use crate::sim::Grid;

/// Generate vertices for an axis-aligned filled rectangle (two triangles)
pub fn rect(min: Vec2, size: Vec2, color: [f32; 4]) -> [Vertex; 6] {
    let max = min + size;
    [
        Vertex::new(min.x, min.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(max.x, max.y, color),
    ]
}

/// Generate one filled square per non-empty cell
pub fn grid_quads(grid: &Grid, cell_size: f32) -> Vec<Vertex> {
    let mut vertices = Vec::new();
    let size = Vec2::splat(cell_size);

    for (x, y, material) in grid.iter() {
        if let Some(color) = material_color(material) {
            let min = Vec2::new(x as f32, y as f32) * cell_size;
            vertices.extend_from_slice(&rect(min, size, color));
        }
    }

    vertices
}
