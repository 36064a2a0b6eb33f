//! Crate level error type.

use thiserror::Error;

use crate::backend::BackendError;
use crate::shader::ShaderError;

/// Errors surfaced by the line renderer.
///
/// Shader errors only happen during initialization. Backend errors are
/// failed device calls and are passed through unchanged.
#[derive(Error, Debug)]
pub enum LinesError {
    #[error("Line shader unavailable: {0}")]
    Shader(#[from] ShaderError),
    #[error("Graphics backend error: {0}")]
    Backend(#[from] BackendError),
}

pub type LinesResult<T> = Result<T, LinesError>;
