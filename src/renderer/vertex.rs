//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

use crate::sim::Material;

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

const fn rgb(r: u8, g: u8, b: u8) -> [f32; 4] {
    [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0]
}

/// Colors for cells and background
pub mod colors {
    use super::rgb;

    pub const SAND: [f32; 4] = rgb(255, 161, 0); // Orange
    pub const WATER: [f32; 4] = rgb(0, 121, 241); // Blue
    pub const STONE: [f32; 4] = rgb(130, 130, 130); // Gray
    pub const BACKGROUND: [f32; 4] = rgb(50, 50, 64);
}

/// Fill color for a material; Empty is not drawn
pub fn material_color(material: Material) -> Option<[f32; 4]> {
    match material {
        Material::Empty => None,
        Material::Sand => Some(colors::SAND),
        Material::Water => Some(colors::WATER),
        Material::Stone => Some(colors::STONE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette() {
        assert_eq!(material_color(Material::Empty), None);
        assert_eq!(material_color(Material::Sand), Some(colors::SAND));
        assert_eq!(material_color(Material::Water), Some(colors::WATER));
        assert_eq!(material_color(Material::Stone), Some(colors::STONE));
        assert_eq!(colors::SAND, [1.0, 161.0 / 255.0, 0.0, 1.0]);
    }

    #[test]
    fn test_vertex_layout_stride() {
        assert_eq!(std::mem::size_of::<Vertex>(), 24);
        assert_eq!(Vertex::desc().array_stride, 24);
    }
}
