//! Canvas rebuild discipline against a recording backend

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use sdfpad_engine::glam::{Vec2, Vec4};
use sdfpad_engine::{
    BackendError, Canvas, FragmentSource, GpuBackend, LayerEdit, LayerOp, PreviewMode,
    PreviewUniforms, QUAD_VERTEX_COUNT, QuadVertex, ShapeKind, canvas_quad,
};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    CreateVertexBuffer(u32),
    WriteVertices(u32),
    CreatePipeline(u32),
    DestroyPipeline(u32),
    DestroyVertexBuffer(u32),
}

/// Backend that records every call and hands out numbered handles
#[derive(Default)]
struct RecordingBackend {
    next_id: u32,
    calls: Vec<Call>,
    sources: Vec<String>,
    uploaded: Option<[QuadVertex; QUAD_VERTEX_COUNT]>,
    fail_pipelines: bool,
}

impl RecordingBackend {
    fn id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    fn take_calls(&mut self) -> Vec<Call> {
        std::mem::take(&mut self.calls)
    }
}

#[derive(Default)]
struct Pass {
    draws: Vec<(u32, u32, PreviewUniforms)>,
}

impl GpuBackend for RecordingBackend {
    type VertexBuffer = u32;
    type Pipeline = u32;
    type Pass<'pass> = Pass;

    fn create_vertex_buffer(&mut self) -> u32 {
        let id = self.id();
        self.calls.push(Call::CreateVertexBuffer(id));
        id
    }

    fn write_vertices(&mut self, buffer: &u32, vertices: &[QuadVertex; QUAD_VERTEX_COUNT]) {
        self.calls.push(Call::WriteVertices(*buffer));
        self.uploaded = Some(*vertices);
    }

    fn create_pipeline(&mut self, source: &str) -> Result<u32, BackendError> {
        self.sources.push(source.to_string());
        if self.fail_pipelines {
            return Err(BackendError::Pipeline("rejected".into()));
        }
        let id = self.id();
        self.calls.push(Call::CreatePipeline(id));
        Ok(id)
    }

    fn destroy_pipeline(&mut self, pipeline: u32) {
        self.calls.push(Call::DestroyPipeline(pipeline));
    }

    fn destroy_vertex_buffer(&mut self, buffer: u32) {
        self.calls.push(Call::DestroyVertexBuffer(buffer));
    }

    fn draw(
        &self,
        pass: &mut Self::Pass<'_>,
        pipeline: &u32,
        vertices: &u32,
        uniforms: &PreviewUniforms,
    ) {
        pass.draws.push((*pipeline, *vertices, *uniforms));
    }
}

fn prepared_canvas(backend: &mut RecordingBackend) -> Canvas<RecordingBackend> {
    let mut canvas = Canvas::new(FragmentSource::Embedded);
    canvas.set_surface_size(800, 600);
    canvas.prepare(backend);
    backend.take_calls();
    canvas
}

#[test]
fn first_frame_builds_everything() {
    let mut backend = RecordingBackend::default();
    let mut canvas = Canvas::new(FragmentSource::Embedded);
    assert!(canvas.needs_resize());
    assert!(canvas.needs_reshader());

    canvas.set_surface_size(800, 600);
    canvas.prepare(&mut backend);

    assert_eq!(
        backend.take_calls(),
        vec![
            Call::CreateVertexBuffer(1),
            Call::WriteVertices(1),
            Call::CreatePipeline(2),
        ]
    );
    assert!(!canvas.needs_resize());
    assert!(!canvas.needs_reshader());
    assert!(canvas.is_drawable());
}

#[test]
fn clean_frames_do_nothing() {
    let mut backend = RecordingBackend::default();
    let mut canvas = prepared_canvas(&mut backend);

    canvas.prepare(&mut backend);
    canvas.prepare(&mut backend);
    assert!(backend.take_calls().is_empty());
}

#[test]
fn geometry_edits_set_reshader() {
    let mut backend = RecordingBackend::default();
    let mut canvas = prepared_canvas(&mut backend);
    let index = canvas.append_layer(ShapeKind::Rectangle);
    canvas.prepare(&mut backend);

    let edits = [
        LayerEdit::Op(LayerOp::Subtract),
        LayerEdit::Position(Vec2::new(0.2, 0.1)),
        LayerEdit::Rotation(45.0),
        LayerEdit::Size(Vec2::new(0.4, 0.2)),
        LayerEdit::CornerRadii(Vec4::splat(0.3)),
        LayerEdit::Shape(ShapeKind::Circle),
        LayerEdit::Radius(0.5),
    ];
    for edit in edits {
        assert!(!canvas.needs_reshader());
        assert!(canvas.edit_layer(index, edit.clone()).unwrap(), "{edit:?}");
        assert!(canvas.needs_reshader(), "{edit:?}");
        canvas.prepare(&mut backend);
    }
}

#[test]
fn append_sets_reshader() {
    let mut backend = RecordingBackend::default();
    let mut canvas = prepared_canvas(&mut backend);
    canvas.append_layer(ShapeKind::Circle);
    assert!(canvas.needs_reshader());
}

#[test]
fn preview_edits_do_not_set_reshader() {
    let mut backend = RecordingBackend::default();
    let mut canvas = prepared_canvas(&mut backend);

    canvas.preview_mut().set_mode(PreviewMode::Contour);
    canvas.preview_mut().set_blur_amount(0.2);
    canvas.preview_mut().set_num_subdivisions(5);

    assert!(!canvas.needs_reshader());
    canvas.prepare(&mut backend);
    assert!(backend.take_calls().is_empty());
}

#[test]
fn name_edit_refreshes_text_without_rebuild() {
    let mut backend = RecordingBackend::default();
    let mut canvas = prepared_canvas(&mut backend);
    let index = canvas.append_layer(ShapeKind::Circle);
    canvas.prepare(&mut backend);

    let geometry = canvas
        .edit_layer(index, LayerEdit::Name("hub cap".into()))
        .unwrap();
    assert!(!geometry);
    assert!(!canvas.needs_reshader());
    assert!(canvas.field_source().contains("let hub_cap_0: f32"));
}

#[test]
fn name_edit_refreshes_assembled_program() {
    let mut backend = RecordingBackend::default();
    let mut canvas = prepared_canvas(&mut backend);
    let index = canvas.append_layer(ShapeKind::Circle);
    canvas.prepare(&mut backend);
    backend.take_calls();

    canvas
        .edit_layer(index, LayerEdit::Name("rim".into()))
        .unwrap();
    let source = canvas.shader_source().unwrap();
    assert!(source.contains("let rim_0: f32"));
    assert!(!source.contains("layer_0"));
    assert!(source.contains(canvas.field_source()));

    canvas.prepare(&mut backend);
    assert!(backend.take_calls().is_empty());
}

#[test]
fn name_edit_retries_failed_build() {
    let mut backend = RecordingBackend {
        fail_pipelines: true,
        ..Default::default()
    };
    let mut canvas = Canvas::new(FragmentSource::Embedded);
    canvas.set_surface_size(800, 600);
    let index = canvas.append_layer(ShapeKind::Circle);
    canvas.prepare(&mut backend);
    assert!(!canvas.is_drawable());

    backend.fail_pipelines = false;
    canvas
        .edit_layer(index, LayerEdit::Name("retry".into()))
        .unwrap();
    assert!(canvas.needs_reshader());
    canvas.prepare(&mut backend);
    assert!(canvas.is_drawable());
    assert!(canvas.shader_source().unwrap().contains("let retry_0: f32"));
}

#[test]
fn reshader_destroys_before_create() {
    let mut backend = RecordingBackend::default();
    let mut canvas = prepared_canvas(&mut backend);

    canvas.append_layer(ShapeKind::Circle);
    canvas.prepare(&mut backend);
    assert_eq!(
        backend.take_calls(),
        vec![Call::DestroyPipeline(2), Call::CreatePipeline(3)]
    );
}

#[test]
fn rebuild_uses_current_layers() {
    let mut backend = RecordingBackend::default();
    let mut canvas = prepared_canvas(&mut backend);
    let index = canvas.append_layer(ShapeKind::Circle);
    canvas.edit_layer(index, LayerEdit::Name("a".into())).unwrap();
    canvas.prepare(&mut backend);

    let source = backend.sources.last().unwrap();
    assert!(source.contains("let a_0: f32 = sdf_circle(coord, vec2<f32>(0.0, 0.0), 0.3);"));
    assert!(source.contains("fn fs_main"));
    assert_eq!(canvas.shader_source(), Some(source.as_str()));
}

#[test]
fn resize_uploads_new_quad() {
    let mut backend = RecordingBackend::default();
    let mut canvas = prepared_canvas(&mut backend);

    canvas.set_surface_size(1600, 800);
    assert!(canvas.needs_resize());
    canvas.prepare(&mut backend);

    assert_eq!(backend.take_calls(), vec![Call::WriteVertices(1)]);
    assert_eq!(backend.uploaded, Some(canvas_quad(1600, 800)));
    assert_eq!(backend.uploaded.unwrap()[2].position, [0.5, 1.0, 1.0]);
    assert!(!canvas.needs_resize());
}

#[test]
fn same_size_is_not_a_resize() {
    let mut backend = RecordingBackend::default();
    let mut canvas = prepared_canvas(&mut backend);
    canvas.set_surface_size(800, 600);
    assert!(!canvas.needs_resize());
}

#[test]
fn zero_size_waits_for_real_size() {
    let mut backend = RecordingBackend::default();
    let mut canvas = prepared_canvas(&mut backend);

    canvas.set_surface_size(0, 600);
    canvas.prepare(&mut backend);
    assert!(canvas.needs_resize());
    assert!(backend.take_calls().is_empty());

    canvas.set_surface_size(640, 480);
    canvas.prepare(&mut backend);
    assert!(!canvas.needs_resize());
}

#[test]
fn missing_fragments_leave_preview_empty() {
    let mut backend = RecordingBackend::default();
    let dir = std::env::temp_dir().join("sdfpad-engine-missing-fragments");
    let mut canvas = Canvas::new(FragmentSource::Directory(dir));
    canvas.set_surface_size(800, 600);
    canvas.prepare(&mut backend);

    assert!(!canvas.needs_reshader());
    assert!(!canvas.is_drawable());
    assert!(canvas.last_error().unwrap().contains("palette.wgsl"));
    assert!(backend.sources.is_empty());

    let mut pass = Pass::default();
    canvas.draw(&backend, &mut pass);
    assert!(pass.draws.is_empty());
}

#[test]
fn compile_failure_is_recoverable() {
    let mut backend = RecordingBackend {
        fail_pipelines: true,
        ..Default::default()
    };
    let mut canvas = Canvas::new(FragmentSource::Embedded);
    canvas.set_surface_size(800, 600);
    canvas.prepare(&mut backend);

    assert!(!canvas.is_drawable());
    assert!(canvas.last_error().unwrap().contains("rejected"));

    backend.fail_pipelines = false;
    canvas.mark_reshader();
    canvas.prepare(&mut backend);
    assert!(canvas.is_drawable());
    assert!(canvas.last_error().is_none());
}

#[test]
fn draw_uploads_current_settings() {
    let mut backend = RecordingBackend::default();
    let mut canvas = prepared_canvas(&mut backend);
    canvas.preview_mut().set_mode(PreviewMode::Contour);

    let mut pass = Pass::default();
    canvas.draw(&backend, &mut pass);

    assert_eq!(pass.draws.len(), 1);
    let (pipeline, vertices, uniforms) = pass.draws[0];
    assert_eq!((pipeline, vertices), (2, 1));
    assert_eq!(uniforms.mode, PreviewMode::Contour as i32);
}

#[test]
fn draw_before_prepare_is_a_no_op() {
    let backend = RecordingBackend::default();
    let canvas: Canvas<RecordingBackend> = Canvas::new(FragmentSource::Embedded);
    let mut pass = Pass::default();
    canvas.draw(&backend, &mut pass);
    assert!(pass.draws.is_empty());
}

#[test]
fn out_of_range_edit_changes_nothing() {
    let mut backend = RecordingBackend::default();
    let mut canvas = prepared_canvas(&mut backend);
    assert!(canvas.edit_layer(7, LayerEdit::Rotation(1.0)).is_err());
    assert!(!canvas.needs_reshader());
}

#[test]
fn move_and_remove_set_reshader() {
    let mut backend = RecordingBackend::default();
    let mut canvas = prepared_canvas(&mut backend);
    canvas.append_layer(ShapeKind::Circle);
    canvas.append_layer(ShapeKind::Rectangle);
    canvas.prepare(&mut backend);

    canvas.move_layer(1, 0).unwrap();
    assert!(canvas.needs_reshader());
    assert!(canvas.field_source().contains("sdf_rect"));
    canvas.prepare(&mut backend);

    canvas.remove_layer(0).unwrap();
    assert!(canvas.needs_reshader());
    assert!(!canvas.field_source().contains("sdf_rect"));
}

#[test]
fn release_destroys_handles() {
    let mut backend = RecordingBackend::default();
    let mut canvas = prepared_canvas(&mut backend);

    canvas.release(&mut backend);
    assert_eq!(
        backend.take_calls(),
        vec![Call::DestroyPipeline(2), Call::DestroyVertexBuffer(1)]
    );
    assert!(!canvas.is_drawable());
}
