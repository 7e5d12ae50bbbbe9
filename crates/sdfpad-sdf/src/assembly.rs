//! Shader assembly
//!
//! A complete preview program is the palette (primitive and combinator
//! functions), a blank line, the generated `build_sdf` function, and the
//! preview tail (entry points and shading).

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ShaderError;

/// File name of the palette fragment inside a shader directory
pub const PALETTE_FILE: &str = "palette.wgsl";

/// File name of the preview fragment inside a shader directory
pub const PREVIEW_FILE: &str = "preview.wgsl";

/// Which static fragment a piece of text came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FragmentKind {
    Palette,
    Preview,
}

impl FragmentKind {
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Palette => PALETTE_FILE,
            Self::Preview => PREVIEW_FILE,
        }
    }
}

impl fmt::Display for FragmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// The two static fragments surrounding the generated field function
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ShaderFragments {
    pub palette: String,
    pub preview: String,
}

impl ShaderFragments {
    /// Fragments compiled into the binary
    pub fn embedded() -> Self {
        Self {
            palette: embedded_palette().to_string(),
            preview: embedded_preview().to_string(),
        }
    }

    /// Load both fragments from `dir`.
    ///
    /// A fragment that cannot be read loads as an empty string; assembly
    /// reports it later.
    pub fn from_dir(dir: &Path) -> Self {
        Self {
            palette: read_fragment(dir, FragmentKind::Palette),
            preview: read_fragment(dir, FragmentKind::Preview),
        }
    }

    /// Assemble a full program around `field`
    pub fn assemble(&self, field: &str) -> Result<String, ShaderError> {
        assemble(field, &self.palette, &self.preview)
    }
}

fn read_fragment(dir: &Path, kind: FragmentKind) -> String {
    let path = dir.join(kind.file_name());
    match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!("Could not read shader fragment {}: {}", path.display(), e);
            String::new()
        }
    }
}

/// Where fragments come from at rebuild time
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FragmentSource {
    /// The defaults compiled into the binary
    #[default]
    Embedded,
    /// `palette.wgsl` and `preview.wgsl` read from a directory on every rebuild
    Directory(PathBuf),
}

impl FragmentSource {
    pub fn load(&self) -> ShaderFragments {
        match self {
            Self::Embedded => ShaderFragments::embedded(),
            Self::Directory(dir) => ShaderFragments::from_dir(dir),
        }
    }
}

/// Concatenate `preamble`, a blank line, `field` and `tail`.
///
/// Fails when either static fragment is empty, since the result could not
/// compile.
pub fn assemble(field: &str, preamble: &str, tail: &str) -> Result<String, ShaderError> {
    if preamble.trim().is_empty() {
        return Err(ShaderError::MissingFragment(FragmentKind::Palette));
    }
    if tail.trim().is_empty() {
        return Err(ShaderError::MissingFragment(FragmentKind::Preview));
    }

    let mut source = String::with_capacity(preamble.len() + field.len() + tail.len() + 2);
    source.push_str(preamble);
    source.push_str("\n\n");
    source.push_str(field);
    source.push_str(tail);
    Ok(source)
}

/// Default palette: primitive distance functions and smooth combinators
pub fn embedded_palette() -> &'static str {
    include_str!("shaders/palette.wgsl")
}

/// Default preview tail: vertex/fragment entry points and shading
pub fn embedded_preview() -> &'static str {
    include_str!("shaders/preview.wgsl")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_assemble_order() {
        let source = assemble("FIELD\n", "PALETTE", "TAIL").unwrap();
        assert_eq!(source, "PALETTE\n\nFIELD\nTAIL");
    }

    #[test]
    fn test_missing_palette() {
        let err = assemble("fn build_sdf", "", "tail").unwrap_err();
        assert_eq!(err, ShaderError::MissingFragment(FragmentKind::Palette));
    }

    #[test]
    fn test_missing_preview() {
        let err = assemble("fn build_sdf", "palette", "  \n").unwrap_err();
        assert_eq!(err, ShaderError::MissingFragment(FragmentKind::Preview));
    }

    #[test]
    fn test_embedded_fragments_define_entry_points() {
        let fragments = ShaderFragments::embedded();
        for name in [
            "fn sdf_circle",
            "fn sdf_rect",
            "fn sdf_union",
            "fn sdf_intersect",
            "fn sdf_subtract",
        ] {
            assert!(fragments.palette.contains(name), "palette lacks {name}");
        }
        assert!(fragments.preview.contains("fn vs_main"));
        assert!(fragments.preview.contains("fn fs_main"));
        assert!(fragments.preview.contains("build_sdf("));
    }

    #[test]
    fn test_missing_directory_loads_empty() {
        let dir = std::env::temp_dir().join("sdfpad-no-such-shader-dir");
        let fragments = FragmentSource::Directory(dir).load();
        assert!(fragments.palette.is_empty());
        assert!(fragments.preview.is_empty());
        assert!(fragments.assemble("fn build_sdf").is_err());
    }

    #[test]
    fn test_directory_source() {
        let dir = std::env::temp_dir().join(format!("sdfpad-fragments-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(PALETTE_FILE), "// palette").unwrap();
        fs::write(dir.join(PREVIEW_FILE), "// preview").unwrap();

        let fragments = FragmentSource::Directory(dir.clone()).load();
        assert_eq!(fragments.palette, "// palette");
        assert_eq!(fragments.preview, "// preview");

        fs::remove_dir_all(&dir).ok();
    }
}
