//! Layer stack to WGSL code generator
//!
//! Serializes an ordered list of layers into the `build_sdf` field function.
//! Accumulation is strictly sequential: each layer's local distance is folded
//! into `sdf` with its own operation, in list order.

// String writing is infallible, so .unwrap() is safe here
#![allow(clippy::unwrap_used)]

use std::fmt::{self, Write};

use glam::{Vec2, Vec4};

use crate::layer::{Layer, LayerOp, Shape};

/// Name of the generated field function
pub const FIELD_FUNCTION: &str = "build_sdf";

/// Smoothing constant passed to every combinator
pub const BLEND_K: f32 = 0.01;

/// Initial accumulator value and the distance of a `Shape::None` layer
pub const MAX_DISTANCE: f32 = f32::MAX;

/// A float formatted as a WGSL literal.
///
/// Uses the shortest representation that round-trips to the same `f32`, so
/// unchanged input always produces identical text.
#[derive(Debug, Clone, Copy)]
pub struct Literal(pub f32);

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = if self.0.is_nan() {
            0.0
        } else if self.0.is_infinite() {
            MAX_DISTANCE.copysign(self.0)
        } else {
            self.0
        };
        // Debug output always carries a '.' or an exponent ("1.0", "1e-7").
        write!(f, "{:?}", value)
    }
}

struct Vec2Literal(Vec2);

impl fmt::Display for Vec2Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "vec2<f32>({}, {})", Literal(self.0.x), Literal(self.0.y))
    }
}

/// Corner radii in the argument order `sdf_rect` expects.
///
/// The editor stores radii as (x, y, z, w); the palette indexes corners as
/// (y, w, x, z).
struct CornerLiteral(Vec4);

impl fmt::Display for CornerLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.0;
        write!(
            f,
            "vec4<f32>({}, {}, {}, {})",
            Literal(r.y),
            Literal(r.w),
            Literal(r.x),
            Literal(r.z)
        )
    }
}

/// Identifier of the local distance of layer `index`.
///
/// The trailing index keeps identifiers unique even when names repeat.
/// Identifiers that would start with a digit or the reserved `__` prefix
/// get an `l` in front.
pub fn layer_ident(layer: &Layer, index: usize) -> String {
    let ident = format!("{}_{}", layer.name.as_str(), index);
    if ident.starts_with(|c: char| c.is_ascii_digit()) || ident.starts_with("__") {
        format!("l{}", ident)
    } else {
        ident
    }
}

/// Generate WGSL code for a layer stack
#[derive(Debug, Default)]
pub struct WgslGenerator;

impl WgslGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Generate the complete `build_sdf` function
    pub fn generate(&self, layers: &[Layer]) -> String {
        let mut code = String::new();

        writeln!(code, "fn {}(uv: vec2<f32>) -> f32 {{", FIELD_FUNCTION).unwrap();
        writeln!(code, "    let coord = (uv - 0.5) * 2.0;").unwrap();
        writeln!(code, "    var sdf: f32 = {};", Literal(MAX_DISTANCE)).unwrap();

        for (index, layer) in layers.iter().enumerate() {
            let ident = layer_ident(layer, index);
            Self::generate_shape(layer, &ident, &mut code);
            Self::generate_op(layer.op, &ident, &mut code);
        }

        writeln!(code, "    return sdf;").unwrap();
        writeln!(code, "}}").unwrap();

        code
    }

    fn generate_shape(layer: &Layer, ident: &str, code: &mut String) {
        match layer.shape {
            Shape::None => {
                writeln!(code, "    let {}: f32 = {};", ident, Literal(MAX_DISTANCE)).unwrap();
            }
            Shape::Circle { radius } => {
                writeln!(
                    code,
                    "    let {}: f32 = sdf_circle(coord, {}, {});",
                    ident,
                    Vec2Literal(layer.position),
                    Literal(radius)
                )
                .unwrap();
            }
            Shape::Rectangle { size, corner_radii } => {
                writeln!(
                    code,
                    "    let {}: f32 = sdf_rect(coord, {}, {}, {}, {});",
                    ident,
                    Vec2Literal(layer.position),
                    Literal(layer.rotation_degrees / 360.0),
                    Vec2Literal(size),
                    CornerLiteral(corner_radii)
                )
                .unwrap();
            }
        }
    }

    fn generate_op(op: LayerOp, ident: &str, code: &mut String) {
        let combinator = match op {
            LayerOp::None => return,
            LayerOp::Union => "sdf_union",
            LayerOp::Intersect => "sdf_intersect",
            LayerOp::Subtract => "sdf_subtract",
        };
        writeln!(
            code,
            "    sdf = {}(sdf, {}, {});",
            combinator,
            ident,
            Literal(BLEND_K)
        )
        .unwrap();
    }
}

/// Generate the `build_sdf` function for a layer list
pub fn generate(layers: &[Layer]) -> String {
    WgslGenerator::new().generate(layers)
}
