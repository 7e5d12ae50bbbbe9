//! SDFPad SDF - Layered 2D SDF model and WGSL generation
//!
//! This crate holds everything about the composed field that does not touch
//! the GPU: the layer model, the `build_sdf` generator, shader assembly and the
//! preview uniform block.
//!
//! ## Key Types
//!
//! - [`LayerStack`] - Ordered list of [`Layer`]s, edited with [`LayerEdit`]
//! - [`WgslGenerator`] - Converts a layer list to the `build_sdf` function
//! - [`ShaderFragments`] - Palette and preview fragments around the field function
//! - [`PreviewSettings`] / [`PreviewUniforms`] - Preview shading and its GPU layout
//!
//! ## Example
//!
//! ```rust
//! use sdfpad_sdf::{LayerStack, ShaderFragments, ShapeKind, generate};
//!
//! let mut layers = LayerStack::new();
//! layers.append(ShapeKind::Circle);
//!
//! let field = generate(layers.as_slice());
//! let shader = ShaderFragments::embedded().assemble(&field);
//! assert!(shader.is_ok());
//! ```

mod assembly;
mod error;
mod layer;
mod preview;
mod wgsl_gen;

pub use assembly::{
    FragmentKind, FragmentSource, PALETTE_FILE, PREVIEW_FILE, ShaderFragments, assemble,
    embedded_palette, embedded_preview,
};
pub use error::{LayerError, ShaderError};
pub use layer::{
    DEFAULT_LAYER_NAME, Layer, LayerEdit, LayerName, LayerOp, LayerStack, MAX_NAME_BYTES, Shape,
    ShapeKind,
};
pub use preview::{PreviewMode, PreviewSettings, PreviewUniforms};
pub use wgsl_gen::{
    BLEND_K, FIELD_FUNCTION, Literal, MAX_DISTANCE, WgslGenerator, generate, layer_ident,
};

// Re-export glam so callers can build positions and radii
pub use glam;
