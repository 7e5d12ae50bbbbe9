//! GPU service seam
//!
//! The canvas never talks to a graphics API directly. It drives a
//! [`GpuBackend`], which owns device access and hands out opaque handles.

use sdfpad_sdf::PreviewUniforms;
use thiserror::Error;

use crate::quad::{QUAD_VERTEX_COUNT, QuadVertex};

/// Errors reported by a GPU backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The assembled shader failed to compile or the pipeline failed validation
    #[error("Pipeline creation failed: {0}")]
    Pipeline(String),

    /// No usable adapter, device or surface
    #[error("GPU initialization failed: {0}")]
    Init(String),
}

/// GPU object service used by the canvas
pub trait GpuBackend {
    /// Dynamic vertex buffer holding the canvas quad
    type VertexBuffer;
    /// Compiled shader plus render pipeline
    type Pipeline;
    /// Render pass the preview is recorded into
    type Pass<'pass>;

    /// Allocate a vertex buffer large enough for the canvas quad
    fn create_vertex_buffer(&mut self) -> Self::VertexBuffer;

    /// Upload quad vertices
    fn write_vertices(
        &mut self,
        buffer: &Self::VertexBuffer,
        vertices: &[QuadVertex; QUAD_VERTEX_COUNT],
    );

    /// Compile `source` and build a pipeline bound to the preview uniform layout
    fn create_pipeline(&mut self, source: &str) -> Result<Self::Pipeline, BackendError>;

    fn destroy_pipeline(&mut self, pipeline: Self::Pipeline);

    fn destroy_vertex_buffer(&mut self, buffer: Self::VertexBuffer);

    /// Bind, upload `uniforms` and draw the quad
    fn draw(
        &self,
        pass: &mut Self::Pass<'_>,
        pipeline: &Self::Pipeline,
        vertices: &Self::VertexBuffer,
        uniforms: &PreviewUniforms,
    );
}
