//! Canvas session state and lazy GPU rebuilds
//!
//! The canvas owns the layer stack, the preview settings and the GPU handles
//! derived from them. Two dirty flags decide what gets rebuilt before a draw:
//!
//! - `needs_resize`: the surface size changed, so the quad must be recomputed
//! - `needs_reshader`: layer geometry changed, so the shader must be regenerated
//!
//! Both are set initially and checked once per frame in [`Canvas::prepare`].
//! A clean flag costs nothing, so shader compilation only happens on the frame
//! after an edit.

use sdfpad_sdf::{
    FragmentSource, LayerEdit, LayerError, LayerStack, PreviewSettings, ShaderFragments,
    ShapeKind, generate,
};

use crate::backend::GpuBackend;
use crate::quad::{QUAD_VERTEX_COUNT, canvas_quad};

/// Editor session: layers, preview settings and the GPU objects built from them
pub struct Canvas<B: GpuBackend> {
    layers: LayerStack,
    preview: PreviewSettings,
    fragments: FragmentSource,

    needs_resize: bool,
    needs_reshader: bool,
    surface_size: [u32; 2],

    /// Generated `build_sdf` function for the current layers
    field_source: String,
    /// Last fully assembled program, if assembly succeeded
    shader_source: Option<String>,
    /// Fragments the last assembly used
    loaded_fragments: Option<ShaderFragments>,
    last_error: Option<String>,

    vertex_buffer: Option<B::VertexBuffer>,
    pipeline: Option<B::Pipeline>,
}

impl<B: GpuBackend> Canvas<B> {
    /// Create an empty canvas; the first [`prepare`](Self::prepare) builds everything
    pub fn new(fragments: FragmentSource) -> Self {
        Self {
            layers: LayerStack::new(),
            preview: PreviewSettings::default(),
            fragments,
            needs_resize: true,
            needs_reshader: true,
            surface_size: [0, 0],
            field_source: generate(&[]),
            shader_source: None,
            loaded_fragments: None,
            last_error: None,
            vertex_buffer: None,
            pipeline: None,
        }
    }

    // ========================================================================
    // Layer editing
    // ========================================================================

    pub fn layers(&self) -> &LayerStack {
        &self.layers
    }

    /// Append a default layer of `kind`
    pub fn append_layer(&mut self, kind: ShapeKind) -> usize {
        let index = self.layers.append(kind);
        tracing::debug!("Appended {} layer at {}", kind.label(), index);
        self.geometry_changed();
        index
    }

    /// Apply an edit to one layer.
    ///
    /// Geometry edits schedule a shader rebuild. Other edits refresh the
    /// generated text and the assembled program in place, and retry the
    /// rebuild only when the preview has no pipeline. Returns whether
    /// geometry changed.
    pub fn edit_layer(&mut self, index: usize, edit: LayerEdit) -> Result<bool, LayerError> {
        let geometry = self.layers.apply(index, edit)?;
        if geometry || self.pipeline.is_none() {
            self.geometry_changed();
        } else {
            self.refresh_field_source();
            self.reassemble();
        }
        Ok(geometry)
    }

    pub fn remove_layer(&mut self, index: usize) -> Result<(), LayerError> {
        self.layers.remove(index)?;
        self.geometry_changed();
        Ok(())
    }

    pub fn move_layer(&mut self, from: usize, to: usize) -> Result<(), LayerError> {
        if from == to {
            return Ok(());
        }
        self.layers.move_layer(from, to)?;
        self.geometry_changed();
        Ok(())
    }

    /// Clear the `just_created` markers once the editor has seen new layers
    pub fn settle_new_layers(&mut self) {
        self.layers.settle();
    }

    fn geometry_changed(&mut self) {
        self.needs_reshader = true;
        self.refresh_field_source();
    }

    fn refresh_field_source(&mut self) {
        self.field_source = generate(self.layers.as_slice());
    }

    /// Re-assemble the program text with the fragments of the last rebuild
    fn reassemble(&mut self) {
        let Some(fragments) = &self.loaded_fragments else {
            return;
        };
        match fragments.assemble(&self.field_source) {
            Ok(source) => self.shader_source = Some(source),
            Err(e) => tracing::warn!("Shader text not refreshed: {}", e),
        }
    }

    // ========================================================================
    // Preview settings
    // ========================================================================

    pub fn preview(&self) -> &PreviewSettings {
        &self.preview
    }

    /// Preview settings only feed the per-frame uniform upload, so editing
    /// them never schedules a rebuild.
    pub fn preview_mut(&mut self) -> &mut PreviewSettings {
        &mut self.preview
    }

    // ========================================================================
    // Dirty state
    // ========================================================================

    /// Record the current surface size; a change schedules a quad rebuild
    pub fn set_surface_size(&mut self, width: u32, height: u32) {
        if self.surface_size != [width, height] {
            self.surface_size = [width, height];
            self.needs_resize = true;
        }
    }

    pub fn surface_size(&self) -> [u32; 2] {
        self.surface_size
    }

    /// Force a shader rebuild on the next frame (e.g. fragments changed on disk)
    pub fn mark_reshader(&mut self) {
        self.needs_reshader = true;
    }

    /// Switch fragment source; takes effect on the next frame
    pub fn set_fragment_source(&mut self, fragments: FragmentSource) {
        self.fragments = fragments;
        self.needs_reshader = true;
    }

    pub fn fragment_source(&self) -> &FragmentSource {
        &self.fragments
    }

    pub fn needs_resize(&self) -> bool {
        self.needs_resize
    }

    pub fn needs_reshader(&self) -> bool {
        self.needs_reshader
    }

    /// Generated `build_sdf` function text
    pub fn field_source(&self) -> &str {
        &self.field_source
    }

    /// Complete program from the last rebuild
    pub fn shader_source(&self) -> Option<&str> {
        self.shader_source.as_deref()
    }

    /// Why the last rebuild left the preview empty, if it did
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Whether both GPU objects exist and a draw will produce output
    pub fn is_drawable(&self) -> bool {
        self.pipeline.is_some() && self.vertex_buffer.is_some()
    }

    // ========================================================================
    // Frame
    // ========================================================================

    /// Resolve both dirty flags. Call once per frame before [`draw`](Self::draw).
    pub fn prepare(&mut self, backend: &mut B) {
        self.resize_if_dirty(backend);
        self.recreate_pipeline_if_dirty(backend);
    }

    fn resize_if_dirty(&mut self, backend: &mut B) {
        if !self.needs_resize {
            return;
        }

        let [width, height] = self.surface_size;
        if width == 0 || height == 0 {
            // Minimized; keep the flag until a real size arrives.
            return;
        }
        self.needs_resize = false;

        let vertices = canvas_quad(width, height);
        let buffer = self
            .vertex_buffer
            .get_or_insert_with(|| backend.create_vertex_buffer());
        backend.write_vertices(buffer, &vertices);

        tracing::debug!(
            "Canvas quad rebuilt for {}x{} ({} vertices)",
            width,
            height,
            QUAD_VERTEX_COUNT
        );
    }

    fn recreate_pipeline_if_dirty(&mut self, backend: &mut B) {
        if !self.needs_reshader {
            return;
        }
        self.needs_reshader = false;

        if let Some(pipeline) = self.pipeline.take() {
            backend.destroy_pipeline(pipeline);
        }

        self.refresh_field_source();
        let fragments = self.fragments.load();
        let source = match fragments.assemble(&self.field_source) {
            Ok(source) => source,
            Err(e) => {
                tracing::warn!("Preview disabled: {}", e);
                self.shader_source = None;
                self.loaded_fragments = None;
                self.last_error = Some(e.to_string());
                return;
            }
        };

        match backend.create_pipeline(&source) {
            Ok(pipeline) => {
                tracing::debug!(
                    "Preview pipeline rebuilt ({} layers, {} bytes of WGSL)",
                    self.layers.len(),
                    source.len()
                );
                self.pipeline = Some(pipeline);
                self.last_error = None;
            }
            Err(e) => {
                tracing::warn!("Preview disabled: {}", e);
                self.last_error = Some(e.to_string());
            }
        }
        self.shader_source = Some(source);
        self.loaded_fragments = Some(fragments);
    }

    /// Record the preview draw into `pass`.
    ///
    /// Does nothing while either GPU object is missing (first frame before
    /// [`prepare`](Self::prepare), or a failed rebuild).
    pub fn draw(&self, backend: &B, pass: &mut B::Pass<'_>) {
        let (Some(pipeline), Some(vertices)) = (&self.pipeline, &self.vertex_buffer) else {
            return;
        };
        backend.draw(pass, pipeline, vertices, &self.preview.uniforms());
    }

    /// Destroy all GPU objects. The canvas rebuilds them if prepared again.
    pub fn release(&mut self, backend: &mut B) {
        if let Some(pipeline) = self.pipeline.take() {
            backend.destroy_pipeline(pipeline);
        }
        if let Some(buffer) = self.vertex_buffer.take() {
            backend.destroy_vertex_buffer(buffer);
        }
        self.needs_resize = true;
        self.needs_reshader = true;
    }
}
