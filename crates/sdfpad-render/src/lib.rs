//! SDFPad Render - WGPU backend for the preview canvas
//!
//! Implements [`sdfpad_engine::GpuBackend`] on top of wgpu: a dynamic vertex
//! buffer for the canvas quad, a render pipeline compiled from the assembled
//! WGSL, and one uniform buffer carrying [`sdfpad_sdf::PreviewUniforms`].

pub mod backend;
pub mod gpu;

// Re-export wgpu for hosts that configure surfaces
pub use wgpu;

pub use backend::{PreviewPipeline, WgpuBackend};
pub use gpu::{GpuContext, init_with_surface};
