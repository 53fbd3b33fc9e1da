//! # Built-in Geometry
//!
//! Vertex tables for the objects that are not loaded from model files: the
//! textured container cube, the tapered planter box and the sky dome cube.
//! All of them are drawn as plain triangle lists, 36 vertices each.

pub mod primitives;

pub use primitives::*;

use crate::gfx::scene::vertex::Vertex3D;

/// Floats per row in an interleaved `[position, normal, uv]` table.
pub const FLOATS_PER_VERTEX: usize = 8;

/// Non-indexed triangle list ready for GPU upload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeometryData {
    pub vertices: Vec<Vertex3D>,
}

impl GeometryData {
    /// Splits an interleaved table into vertices; a trailing partial row is ignored.
    pub fn from_interleaved(table: &[f32]) -> Self {
        Self {
            vertices: table
                .chunks_exact(FLOATS_PER_VERTEX)
                .map(Vertex3D::from_row)
                .collect(),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }
}
