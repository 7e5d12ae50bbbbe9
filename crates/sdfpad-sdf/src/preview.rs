//! Preview display settings
//!
//! [`PreviewSettings`] is what the editor mutates; [`PreviewUniforms`] is the
//! fixed-layout block uploaded to the fragment shader every frame.

use bytemuck::{Pod, Zeroable};

/// How the preview shades the field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i32)]
pub enum PreviewMode {
    /// Raw distance as a grayscale ramp
    None = 0,
    /// Inside/outside mask with optional blur
    #[default]
    Mask = 1,
    /// Iso-distance contour lines
    Contour = 2,
}

impl PreviewMode {
    pub const ALL: [PreviewMode; 3] = [PreviewMode::None, PreviewMode::Mask, PreviewMode::Contour];

    pub fn label(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Mask => "Mask",
            Self::Contour => "Contour",
        }
    }
}

/// Live preview settings
///
/// Fields are private so every write goes through a clamping setter.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewSettings {
    mode: PreviewMode,
    blur_amount: f32,
    division_distance: f32,
    division_thickness: f32,
    num_subdivisions: i32,
    subdivision_thickness: f32,
    interior_color: [f32; 4],
    exterior_color: [f32; 4],
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            mode: PreviewMode::Mask,
            blur_amount: 0.005,
            division_distance: 0.25,
            division_thickness: 0.01,
            num_subdivisions: 3,
            subdivision_thickness: 0.003,
            interior_color: [0.86, 0.74, 0.18, 1.0],
            exterior_color: [0.23, 0.68, 0.62, 1.0],
        }
    }
}

fn unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

fn color(value: [f32; 4]) -> [f32; 4] {
    value.map(unit)
}

impl PreviewSettings {
    pub fn mode(&self) -> PreviewMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: PreviewMode) {
        self.mode = mode;
    }

    pub fn blur_amount(&self) -> f32 {
        self.blur_amount
    }

    pub fn set_blur_amount(&mut self, value: f32) {
        self.blur_amount = unit(value);
    }

    pub fn division_distance(&self) -> f32 {
        self.division_distance
    }

    pub fn set_division_distance(&mut self, value: f32) {
        self.division_distance = unit(value);
    }

    pub fn division_thickness(&self) -> f32 {
        self.division_thickness
    }

    pub fn set_division_thickness(&mut self, value: f32) {
        self.division_thickness = unit(value);
    }

    pub fn num_subdivisions(&self) -> i32 {
        self.num_subdivisions
    }

    pub fn set_num_subdivisions(&mut self, value: i32) {
        self.num_subdivisions = value.max(0);
    }

    pub fn subdivision_thickness(&self) -> f32 {
        self.subdivision_thickness
    }

    pub fn set_subdivision_thickness(&mut self, value: f32) {
        self.subdivision_thickness = unit(value);
    }

    pub fn interior_color(&self) -> [f32; 4] {
        self.interior_color
    }

    pub fn set_interior_color(&mut self, value: [f32; 4]) {
        self.interior_color = color(value);
    }

    pub fn exterior_color(&self) -> [f32; 4] {
        self.exterior_color
    }

    pub fn set_exterior_color(&mut self, value: [f32; 4]) {
        self.exterior_color = color(value);
    }

    /// GPU-ready copy of these settings
    pub fn uniforms(&self) -> PreviewUniforms {
        PreviewUniforms::from(self)
    }
}

/// Uniform block for the preview fragment shader.
///
/// Must match `PreviewSettings` in `preview.wgsl` field for field:
///
/// | offset | field                 | type       |
/// |--------|-----------------------|------------|
/// | 0      | mode                  | i32        |
/// | 4      | blur_amount           | f32        |
/// | 8      | division_distance     | f32        |
/// | 12     | division_thickness    | f32        |
/// | 16     | num_subdivisions      | i32        |
/// | 20     | subdivision_thickness | f32        |
/// | 24     | padding               | 8 bytes    |
/// | 32     | interior_color        | vec4<f32>  |
/// | 48     | exterior_color        | vec4<f32>  |
///
/// The padding puts the colors on the 16-byte boundary that vec4 members
/// require in a uniform buffer.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PreviewUniforms {
    pub mode: i32,
    pub blur_amount: f32,
    pub division_distance: f32,
    pub division_thickness: f32,
    pub num_subdivisions: i32,
    pub subdivision_thickness: f32,
    pub _padding: [u8; 8],
    pub interior_color: [f32; 4],
    pub exterior_color: [f32; 4],
}

impl From<&PreviewSettings> for PreviewUniforms {
    fn from(settings: &PreviewSettings) -> Self {
        Self {
            mode: settings.mode as i32,
            blur_amount: settings.blur_amount,
            division_distance: settings.division_distance,
            division_thickness: settings.division_thickness,
            num_subdivisions: settings.num_subdivisions,
            subdivision_thickness: settings.subdivision_thickness,
            _padding: [0; 8],
            interior_color: settings.interior_color,
            exterior_color: settings.exterior_color,
        }
    }
}

impl Default for PreviewUniforms {
    fn default() -> Self {
        PreviewUniforms::from(&PreviewSettings::default())
    }
}
