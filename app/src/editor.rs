//! Editor actions
//!
//! The panels never mutate layers while iterating them. They record what the
//! user did as [`EditorAction`]s, which are applied to the canvas once the UI
//! pass is over.

use sdfpad_engine::{Canvas, GpuBackend, LayerEdit, ShapeKind};

/// Something the user did in one of the panels
#[derive(Debug, Clone, PartialEq)]
pub enum EditorAction {
    AppendLayer(ShapeKind),
    Edit { index: usize, edit: LayerEdit },
    Remove(usize),
    Move { from: usize, to: usize },
    /// Copy the generated field function
    CopyField,
    /// Copy the complete assembled shader
    CopyShader,
}

/// Apply actions in order.
///
/// Returns the text to place on the clipboard, if any action asked for a copy.
/// Invalid indices are logged and skipped.
pub fn apply<B: GpuBackend>(
    canvas: &mut Canvas<B>,
    actions: impl IntoIterator<Item = EditorAction>,
) -> Option<String> {
    let mut clipboard = None;

    for action in actions {
        let result = match action {
            EditorAction::AppendLayer(kind) => {
                canvas.append_layer(kind);
                Ok(())
            }
            EditorAction::Edit { index, edit } => canvas.edit_layer(index, edit).map(|_| ()),
            EditorAction::Remove(index) => canvas.remove_layer(index),
            EditorAction::Move { from, to } => canvas.move_layer(from, to),
            EditorAction::CopyField => {
                clipboard = Some(canvas.field_source().to_string());
                Ok(())
            }
            EditorAction::CopyShader => {
                match canvas.shader_source() {
                    Some(source) => clipboard = Some(source.to_string()),
                    None => tracing::warn!("No assembled shader to copy"),
                }
                Ok(())
            }
        };

        if let Err(e) = result {
            tracing::warn!("Ignoring edit: {}", e);
        }
    }

    clipboard
}

/// Place `text` on the system clipboard. Failures are logged.
pub fn copy_to_clipboard(text: &str) {
    match arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text)) {
        Ok(()) => tracing::info!("Copied {} bytes to clipboard", text.len()),
        Err(e) => tracing::warn!("Clipboard unavailable: {}", e),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sdfpad_engine::{
        BackendError, FragmentSource, LayerOp, PreviewUniforms, QUAD_VERTEX_COUNT, QuadVertex,
    };

    /// Backend that accepts everything and draws nothing
    struct NullBackend;

    impl GpuBackend for NullBackend {
        type VertexBuffer = ();
        type Pipeline = ();
        type Pass<'pass> = ();

        fn create_vertex_buffer(&mut self) {}

        fn write_vertices(&mut self, _buffer: &(), _vertices: &[QuadVertex; QUAD_VERTEX_COUNT]) {}

        fn create_pipeline(&mut self, _source: &str) -> Result<(), BackendError> {
            Ok(())
        }

        fn destroy_pipeline(&mut self, _pipeline: ()) {}

        fn destroy_vertex_buffer(&mut self, _buffer: ()) {}

        fn draw(
            &self,
            _pass: &mut Self::Pass<'_>,
            _pipeline: &(),
            _vertices: &(),
            _uniforms: &PreviewUniforms,
        ) {
        }
    }

    fn canvas() -> Canvas<NullBackend> {
        Canvas::new(FragmentSource::Embedded)
    }

    #[test]
    fn test_actions_apply_in_order() {
        let mut canvas = canvas();
        let copied = apply(
            &mut canvas,
            [
                EditorAction::AppendLayer(ShapeKind::Circle),
                EditorAction::AppendLayer(ShapeKind::Rectangle),
                EditorAction::Edit {
                    index: 1,
                    edit: LayerEdit::Op(LayerOp::Subtract),
                },
                EditorAction::Move { from: 1, to: 0 },
            ],
        );

        assert!(copied.is_none());
        let layers = canvas.layers();
        assert_eq!(layers.len(), 2);
        assert_eq!(layers.get(0).unwrap().op, LayerOp::Subtract);
        assert_eq!(layers.get(1).unwrap().shape.kind(), ShapeKind::Circle);
    }

    #[test]
    fn test_invalid_index_is_skipped() {
        let mut canvas = canvas();
        apply(
            &mut canvas,
            [
                EditorAction::Remove(4),
                EditorAction::AppendLayer(ShapeKind::Circle),
            ],
        );
        assert_eq!(canvas.layers().len(), 1);
    }

    #[test]
    fn test_copy_field_text() {
        let mut canvas = canvas();
        let copied = apply(
            &mut canvas,
            [
                EditorAction::AppendLayer(ShapeKind::Circle),
                EditorAction::CopyField,
            ],
        )
        .unwrap();

        assert_eq!(copied, canvas.field_source());
        assert!(copied.starts_with("fn build_sdf("));
        assert!(copied.contains("layer_0"));
    }

    #[test]
    fn test_copy_shader_needs_a_rebuild() {
        let mut canvas = canvas();
        assert!(apply(&mut canvas, [EditorAction::CopyShader]).is_none());

        canvas.prepare(&mut NullBackend);
        let copied = apply(&mut canvas, [EditorAction::CopyShader]).unwrap();
        assert!(copied.contains("fn sdf_union"));
        assert!(copied.contains("fn build_sdf"));
        assert!(copied.contains("fn fs_main"));
    }
}
