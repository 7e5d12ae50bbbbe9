//! Error types for layer editing and shader assembly

use thiserror::Error;

use crate::assembly::FragmentKind;

/// Errors raised by the layer model
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayerError {
    #[error("Layer index {index} out of range (have {len} layers)")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Errors raised while assembling a shader program
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShaderError {
    /// A static fragment was empty or could not be loaded
    #[error("Shader fragment '{0}' is missing")]
    MissingFragment(FragmentKind),
}
