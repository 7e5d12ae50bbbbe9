//! SDFPad Engine - Canvas session and rebuild controller
//!
//! The engine sits between the editor and the GPU. It owns the editing session
//! ([`Canvas`]), regenerates WGSL when layer geometry changes, and drives a
//! [`GpuBackend`] to rebuild only what is stale before each draw.
//!
//! ## Example
//!
//! ```ignore
//! use sdfpad_engine::{Canvas, FragmentSource, ShapeKind};
//!
//! let mut canvas = Canvas::new(FragmentSource::Embedded);
//! canvas.set_surface_size(1280, 720);
//! canvas.append_layer(ShapeKind::Circle);
//!
//! // Each frame
//! canvas.prepare(&mut backend);
//! canvas.draw(&backend, &mut pass);
//! ```

pub mod backend;
pub mod canvas;
pub mod quad;

pub use backend::{BackendError, GpuBackend};
pub use canvas::Canvas;
pub use quad::{QUAD_VERTEX_COUNT, QuadVertex, aspect_scale, canvas_quad};

// Re-export the model so hosts only need one dependency
pub use sdfpad_sdf::{
    FragmentSource, Layer, LayerEdit, LayerError, LayerOp, PreviewMode, PreviewSettings,
    PreviewUniforms, Shape, ShapeKind, glam,
};
