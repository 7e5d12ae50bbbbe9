//! Editor panels
//!
//! Four fixed windows around the canvas: Palette (top left), Layers (bottom
//! left), Code (bottom right) and Preview (top right). Layer and clipboard
//! interactions are returned as [`EditorAction`]s; preview settings are
//! written directly since they never affect the generated shader.

use egui::{Align2, Color32, ComboBox, DragValue, Ui};
use sdfpad_engine::glam::Vec2;
use sdfpad_engine::{
    Canvas, GpuBackend, Layer, LayerEdit, LayerOp, PreviewMode, PreviewSettings, Shape, ShapeKind,
};

use crate::editor::EditorAction;

const PANEL_MARGIN: f32 = 8.0;

/// Draw all panels for one frame
pub fn show<B: GpuBackend>(
    ctx: &egui::Context,
    canvas: &mut Canvas<B>,
    actions: &mut Vec<EditorAction>,
) {
    palette_window(ctx, actions);
    layers_window(ctx, canvas, actions);
    code_window(ctx, canvas, actions);
    preview_window(ctx, canvas.preview_mut());
}

fn palette_window(ctx: &egui::Context, actions: &mut Vec<EditorAction>) {
    egui::Window::new("Palette")
        .anchor(Align2::LEFT_TOP, [PANEL_MARGIN, PANEL_MARGIN])
        .resizable(false)
        .show(ctx, |ui| {
            for kind in ShapeKind::SELECTABLE {
                if ui.button(shape_button_label(kind)).clicked() {
                    actions.push(EditorAction::AppendLayer(kind));
                }
            }
        });
}

fn shape_button_label(kind: ShapeKind) -> &'static str {
    match kind {
        ShapeKind::None => "None",
        ShapeKind::Circle => "Circle",
        ShapeKind::Rectangle => "Rectangle",
    }
}

fn layers_window<B: GpuBackend>(
    ctx: &egui::Context,
    canvas: &Canvas<B>,
    actions: &mut Vec<EditorAction>,
) {
    let max_height = ctx.screen_rect().height() * 0.65;

    egui::Window::new("Layers")
        .anchor(Align2::LEFT_BOTTOM, [PANEL_MARGIN, -PANEL_MARGIN])
        .resizable(false)
        .min_width(150.0)
        .show(ctx, |ui| {
            let layers = canvas.layers();
            if layers.is_empty() {
                ui.weak("Add a shape from the palette");
                return;
            }

            egui::ScrollArea::vertical()
                .max_height(max_height)
                .show(ui, |ui| {
                    for (index, layer) in layers.iter().enumerate() {
                        ui.push_id(index, |ui| {
                            egui::CollapsingHeader::new(format!("{}: {}", index, layer.name))
                                .default_open(true)
                                .show(ui, |ui| {
                                    layer_controls(ui, index, layers.len(), layer, actions);
                                });
                        });
                    }
                });
        });
}

fn layer_controls(
    ui: &mut Ui,
    index: usize,
    count: usize,
    layer: &Layer,
    actions: &mut Vec<EditorAction>,
) {
    let mut edit = |change: LayerEdit| {
        actions.push(EditorAction::Edit {
            index,
            edit: change,
        });
    };

    let mut name = layer.name.as_str().to_string();
    let response = ui
        .horizontal(|ui| {
            let response = ui.text_edit_singleline(&mut name);
            ui.label("name");
            response
        })
        .inner;
    if layer.just_created {
        response.request_focus();
    }
    if response.changed() {
        edit(LayerEdit::Name(name));
    }

    let mut op = layer.op;
    ComboBox::from_label("Kind")
        .selected_text(op.label())
        .show_ui(ui, |ui| {
            for candidate in LayerOp::SELECTABLE {
                ui.selectable_value(&mut op, candidate, candidate.label());
            }
        });
    if op != layer.op {
        edit(LayerEdit::Op(op));
    }

    let current_kind = layer.shape.kind();
    let mut kind = current_kind;
    ComboBox::from_label("Shape")
        .selected_text(kind.label())
        .show_ui(ui, |ui| {
            for candidate in ShapeKind::SELECTABLE {
                ui.selectable_value(&mut kind, candidate, candidate.label());
            }
        });
    if kind != current_kind {
        edit(LayerEdit::Shape(kind));
    }

    let mut position = layer.position;
    if vec2_row(ui, "Position", &mut position) {
        edit(LayerEdit::Position(position));
    }

    if layer.shape.uses_rotation() {
        let mut degrees = layer.rotation_degrees;
        let changed = ui
            .horizontal(|ui| {
                let changed = ui
                    .add(DragValue::new(&mut degrees).speed(1.0).suffix("°"))
                    .changed();
                ui.label("Rotation (Degrees)");
                changed
            })
            .inner;
        if changed {
            edit(LayerEdit::Rotation(degrees));
        }
    }

    match layer.shape {
        Shape::None => {}
        Shape::Circle { radius } => {
            let mut radius = radius;
            let changed = ui
                .horizontal(|ui| {
                    let changed = ui
                        .add(DragValue::new(&mut radius).speed(0.01))
                        .changed();
                    ui.label("Radius");
                    changed
                })
                .inner;
            if changed {
                edit(LayerEdit::Radius(radius));
            }
        }
        Shape::Rectangle { size, corner_radii } => {
            let mut size = size;
            if vec2_row(ui, "Size", &mut size) {
                edit(LayerEdit::Size(size));
            }

            let mut radii = corner_radii;
            let changed = ui
                .horizontal(|ui| {
                    let mut changed = false;
                    for value in radii.as_mut() {
                        changed |= ui
                            .add(DragValue::new(value).speed(0.01).range(0.0..=1.0))
                            .changed();
                    }
                    ui.label("Corner Radii");
                    changed
                })
                .inner;
            if changed {
                edit(LayerEdit::CornerRadii(radii));
            }
        }
    }

    ui.horizontal(|ui| {
        if ui.add_enabled(index > 0, egui::Button::new("Up")).clicked() {
            actions.push(EditorAction::Move {
                from: index,
                to: index - 1,
            });
        }
        if ui
            .add_enabled(index + 1 < count, egui::Button::new("Down"))
            .clicked()
        {
            actions.push(EditorAction::Move {
                from: index,
                to: index + 1,
            });
        }
        if ui.button("Remove").clicked() {
            actions.push(EditorAction::Remove(index));
        }
    });
}

fn vec2_row(ui: &mut Ui, label: &str, value: &mut Vec2) -> bool {
    ui.horizontal(|ui| {
        let x = ui.add(DragValue::new(&mut value.x).speed(0.01)).changed();
        let y = ui.add(DragValue::new(&mut value.y).speed(0.01)).changed();
        ui.label(label);
        x || y
    })
    .inner
}

fn code_window<B: GpuBackend>(
    ctx: &egui::Context,
    canvas: &Canvas<B>,
    actions: &mut Vec<EditorAction>,
) {
    let screen = ctx.screen_rect();

    egui::Window::new("Code")
        .anchor(Align2::RIGHT_BOTTOM, [-PANEL_MARGIN, -PANEL_MARGIN])
        .default_open(false)
        .resizable(false)
        .max_width(screen.width() * 0.45)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Copy to Clipboard").clicked() {
                    actions.push(EditorAction::CopyField);
                }
                if ui.button("Copy Shader").clicked() {
                    actions.push(EditorAction::CopyShader);
                }
            });

            if let Some(error) = canvas.last_error() {
                ui.colored_label(Color32::LIGHT_RED, error);
            }

            ui.separator();
            egui::ScrollArea::both()
                .max_height(screen.height() * 0.6)
                .show(ui, |ui| {
                    ui.monospace(canvas.field_source());
                });
        });
}

fn preview_window(ctx: &egui::Context, preview: &mut PreviewSettings) {
    egui::Window::new("Preview")
        .anchor(Align2::RIGHT_TOP, [-PANEL_MARGIN, PANEL_MARGIN])
        .resizable(false)
        .min_width(ctx.screen_rect().width() * 0.25)
        .show(ctx, |ui| {
            let mut mode = preview.mode();
            ComboBox::from_label("Mode")
                .selected_text(mode.label())
                .show_ui(ui, |ui| {
                    for candidate in PreviewMode::ALL {
                        ui.selectable_value(&mut mode, candidate, candidate.label());
                    }
                });
            preview.set_mode(mode);

            match mode {
                PreviewMode::None => {}
                PreviewMode::Mask => {
                    let mut blur = preview.blur_amount();
                    if unit_row(ui, "Blur Amount", &mut blur, 0.001) {
                        preview.set_blur_amount(blur);
                    }
                }
                PreviewMode::Contour => contour_controls(ui, preview),
            }
        });
}

fn contour_controls(ui: &mut Ui, preview: &mut PreviewSettings) {
    let mut value = preview.division_distance();
    if unit_row(ui, "Division Distance", &mut value, 0.001) {
        preview.set_division_distance(value);
    }

    let mut value = preview.division_thickness();
    if unit_row(ui, "Division Thickness", &mut value, 0.001) {
        preview.set_division_thickness(value);
    }

    let mut subdivisions = preview.num_subdivisions();
    let changed = ui
        .horizontal(|ui| {
            let changed = ui
                .add(DragValue::new(&mut subdivisions).range(0..=i32::MAX))
                .changed();
            ui.label("Num Subdivisions");
            changed
        })
        .inner;
    if changed {
        preview.set_num_subdivisions(subdivisions);
    }

    let mut value = preview.subdivision_thickness();
    if unit_row(ui, "Subdivision Thickness", &mut value, 0.001) {
        preview.set_subdivision_thickness(value);
    }

    ui.separator();

    let mut color = preview.interior_color();
    if color_row(ui, "Interior Color", &mut color) {
        preview.set_interior_color(color);
    }

    let mut color = preview.exterior_color();
    if color_row(ui, "Exterior Color", &mut color) {
        preview.set_exterior_color(color);
    }
}

fn unit_row(ui: &mut Ui, label: &str, value: &mut f32, speed: f64) -> bool {
    ui.horizontal(|ui| {
        let changed = ui
            .add(DragValue::new(value).speed(speed).range(0.0..=1.0))
            .changed();
        ui.label(label);
        changed
    })
    .inner
}

fn color_row(ui: &mut Ui, label: &str, color: &mut [f32; 4]) -> bool {
    ui.horizontal(|ui| {
        let changed = ui.color_edit_button_rgba_unmultiplied(color).changed();
        ui.label(label);
        changed
    })
    .inner
}
