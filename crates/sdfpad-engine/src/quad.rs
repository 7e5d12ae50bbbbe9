//! Full-canvas quad geometry

use bytemuck::{Pod, Zeroable};

/// Number of vertices in the canvas quad (two triangles)
pub const QUAD_VERTEX_COUNT: usize = 6;

/// Vertex of the canvas quad
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 3],
    /// Field coordinate in `[0, 1]`, remapped to `[-1, 1]` by `build_sdf`
    pub uv: [f32; 2],
}

impl QuadVertex {
    const fn new(x: f32, y: f32, u: f32, v: f32) -> Self {
        Self {
            position: [x, y, 1.0],
            uv: [u, v],
        }
    }
}

/// Axis scales that keep the canvas square on a `width` x `height` surface.
///
/// The shorter axis spans the full clip range (scale 1.0); the longer one
/// shrinks by the aspect ratio.
pub fn aspect_scale(width: u32, height: u32) -> [f32; 2] {
    let width = width.max(1) as f32;
    let height = height.max(1) as f32;
    [(height / width).min(1.0), (width / height).min(1.0)]
}

/// Quad vertices for a `width` x `height` surface
pub fn canvas_quad(width: u32, height: u32) -> [QuadVertex; QUAD_VERTEX_COUNT] {
    let [x, y] = aspect_scale(width, height);
    [
        QuadVertex::new(-x, -y, 0.0, 0.0),
        QuadVertex::new(-x, y, 0.0, 1.0),
        QuadVertex::new(x, y, 1.0, 1.0),
        QuadVertex::new(x, y, 1.0, 1.0),
        QuadVertex::new(x, -y, 1.0, 0.0),
        QuadVertex::new(-x, -y, 0.0, 0.0),
    ]
}
