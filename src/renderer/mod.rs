//! WebGPU rendering module
//!
//! Each non-empty cell becomes a flat-colored quad; the surface is cleared to
//! the background color first.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use vertex::{Vertex, material_color};
