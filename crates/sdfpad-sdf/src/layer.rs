//! Layer model
//!
//! A layer is one shape contribution to the composed field. Layers live in a
//! [`LayerStack`] whose order is significant: layer `i` is combined into the
//! result produced by layers `0..i`.

use glam::{Vec2, Vec4};

use crate::error::LayerError;

/// Maximum label length in bytes
pub const MAX_NAME_BYTES: usize = 31;

/// Label given to freshly appended layers
pub const DEFAULT_LAYER_NAME: &str = "layer";

/// Shape discriminant, used when appending or switching shape kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    None,
    Circle,
    Rectangle,
}

impl ShapeKind {
    /// Kinds a user can pick in the editor
    pub const SELECTABLE: [ShapeKind; 2] = [ShapeKind::Circle, ShapeKind::Rectangle];

    pub fn label(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Circle => "circle",
            Self::Rectangle => "rectangle",
        }
    }
}

/// Shape geometry of a layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// Placeholder; generates the maximal distance
    None,
    Circle {
        radius: f32,
    },
    Rectangle {
        size: Vec2,
        /// Per-corner rounding, each in `[0, 1]`
        corner_radii: Vec4,
    },
}

impl Shape {
    /// Default parameters for a shape kind
    pub fn default_for(kind: ShapeKind) -> Self {
        match kind {
            ShapeKind::None => Self::None,
            ShapeKind::Circle => Self::Circle { radius: 0.3 },
            ShapeKind::Rectangle => Self::Rectangle {
                size: Vec2::splat(0.3),
                corner_radii: Vec4::splat(0.15),
            },
        }
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::None => ShapeKind::None,
            Self::Circle { .. } => ShapeKind::Circle,
            Self::Rectangle { .. } => ShapeKind::Rectangle,
        }
    }

    /// Whether the layer rotation has any effect on this shape
    pub fn uses_rotation(&self) -> bool {
        matches!(self, Self::Rectangle { .. })
    }
}

/// How a layer combines with the field accumulated so far
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerOp {
    /// Distance is computed but not merged
    None,
    Union,
    Intersect,
    Subtract,
}

impl LayerOp {
    pub const SELECTABLE: [LayerOp; 3] = [LayerOp::Union, LayerOp::Intersect, LayerOp::Subtract];

    pub fn label(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Union => "Add",
            Self::Intersect => "Intersect",
            Self::Subtract => "Subtract",
        }
    }
}

/// Sanitized layer label, safe to embed in a shader identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LayerName(String);

impl LayerName {
    /// Sanitize raw user input.
    ///
    /// Whitespace and any other character that cannot appear in an identifier
    /// become `_`. The result is truncated to [`MAX_NAME_BYTES`].
    pub fn new(raw: &str) -> Self {
        let mut name: String = raw
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        // Every char is ASCII at this point, so any byte index is a boundary.
        name.truncate(MAX_NAME_BYTES);
        Self(name)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for LayerName {
    fn default() -> Self {
        Self(DEFAULT_LAYER_NAME.to_string())
    }
}

impl std::fmt::Display for LayerName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One shape contribution to the field
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub name: LayerName,
    pub op: LayerOp,
    pub shape: Shape,
    pub position: Vec2,
    /// Only meaningful for rectangles
    pub rotation_degrees: f32,
    /// Set on append, cleared once the editor has focused the new entry
    pub just_created: bool,
}

impl Layer {
    /// A new layer with default parameters for `kind`, combined by union
    pub fn new(kind: ShapeKind) -> Self {
        Self {
            name: LayerName::default(),
            op: LayerOp::Union,
            shape: Shape::default_for(kind),
            position: Vec2::ZERO,
            rotation_degrees: 0.0,
            just_created: true,
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = LayerName::new(name);
        self
    }

    pub fn with_op(mut self, op: LayerOp) -> Self {
        self.op = op;
        self
    }

    pub fn with_position(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    pub fn with_rotation(mut self, degrees: f32) -> Self {
        self.rotation_degrees = degrees;
        self
    }

    /// Apply an edit, returning whether the field geometry changed
    pub fn apply(&mut self, edit: LayerEdit) -> bool {
        match edit {
            LayerEdit::Name(raw) => {
                self.name = LayerName::new(&raw);
                false
            }
            LayerEdit::Shape(kind) => {
                if self.shape.kind() == kind {
                    return false;
                }
                self.shape = Shape::default_for(kind);
                true
            }
            LayerEdit::Op(op) => {
                self.op = op;
                true
            }
            LayerEdit::Position(position) => {
                self.position = position;
                true
            }
            LayerEdit::Rotation(degrees) => {
                self.rotation_degrees = degrees;
                true
            }
            LayerEdit::Radius(value) => match &mut self.shape {
                Shape::Circle { radius } => {
                    *radius = value;
                    true
                }
                Shape::None | Shape::Rectangle { .. } => false,
            },
            LayerEdit::Size(value) => match &mut self.shape {
                Shape::Rectangle { size, .. } => {
                    *size = value;
                    true
                }
                Shape::None | Shape::Circle { .. } => false,
            },
            LayerEdit::CornerRadii(value) => match &mut self.shape {
                Shape::Rectangle { corner_radii, .. } => {
                    *corner_radii = value.clamp(Vec4::ZERO, Vec4::ONE);
                    true
                }
                Shape::None | Shape::Circle { .. } => false,
            },
        }
    }
}

/// A single field edit made by the editing surface
#[derive(Debug, Clone, PartialEq)]
pub enum LayerEdit {
    Name(String),
    Shape(ShapeKind),
    Op(LayerOp),
    Position(Vec2),
    Rotation(f32),
    /// Circle radius; ignored for other shapes
    Radius(f32),
    /// Rectangle size; ignored for other shapes
    Size(Vec2),
    /// Rectangle corner radii, clamped to `[0, 1]`; ignored for other shapes
    CornerRadii(Vec4),
}

/// Ordered collection of layers
#[derive(Debug, Clone, Default)]
pub struct LayerStack {
    layers: Vec<Layer>,
}

impl LayerStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a default layer of `kind` and return its index
    pub fn append(&mut self, kind: ShapeKind) -> usize {
        self.push(Layer::new(kind))
    }

    /// Append a prepared layer and return its index
    pub fn push(&mut self, layer: Layer) -> usize {
        self.layers.push(layer);
        self.layers.len() - 1
    }

    /// Apply an edit to the layer at `index`.
    ///
    /// Returns `Ok(true)` when the edit changed field geometry.
    pub fn apply(&mut self, index: usize, edit: LayerEdit) -> Result<bool, LayerError> {
        let len = self.layers.len();
        let layer = self
            .layers
            .get_mut(index)
            .ok_or(LayerError::IndexOutOfRange { index, len })?;
        Ok(layer.apply(edit))
    }

    pub fn remove(&mut self, index: usize) -> Result<Layer, LayerError> {
        if index >= self.layers.len() {
            return Err(LayerError::IndexOutOfRange {
                index,
                len: self.layers.len(),
            });
        }
        Ok(self.layers.remove(index))
    }

    /// Move the layer at `from` so it ends up at `to`
    pub fn move_layer(&mut self, from: usize, to: usize) -> Result<(), LayerError> {
        let len = self.layers.len();
        for index in [from, to] {
            if index >= len {
                return Err(LayerError::IndexOutOfRange { index, len });
            }
        }
        let layer = self.layers.remove(from);
        self.layers.insert(to, layer);
        Ok(())
    }

    /// Clear the `just_created` flag on every layer
    pub fn settle(&mut self) {
        for layer in &mut self.layers {
            layer.just_created = false;
        }
    }

    pub fn get(&self, index: usize) -> Option<&Layer> {
        self.layers.get(index)
    }

    pub fn as_slice(&self) -> &[Layer] {
        &self.layers
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Layer> {
        self.layers.iter()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl<'a> IntoIterator for &'a LayerStack {
    type Item = &'a Layer;
    type IntoIter = std::slice::Iter<'a, Layer>;

    fn into_iter(self) -> Self::IntoIter {
        self.layers.iter()
    }
}
