//! Line shaders
//!
//! The line program is built from two WGSL sources (vertex + fragment).
//! Loading and linking happen once, in an explicit initialization step that
//! returns a [`ShaderError`] instead of failing later at draw time.

mod program;
mod source;

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub use program::{
    AttributeSlots, LineUniforms, LinkedProgram, ProgramInfo, UniformLayout,
    CURRENT_PACK_ATTRIBUTE, FRAGMENT_ENTRY_POINT, NEXT_PACK_ATTRIBUTE, PREV_PACK_ATTRIBUTE,
    VERTEX_ENTRY_POINT,
};
pub use source::{LINE_FRAGMENT_SHADER_SOURCE, LINE_VERTEX_SHADER_SOURCE};

/// Pipeline stage a shader source belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vertex => write!(f, "vertex"),
            Self::Fragment => write!(f, "fragment"),
        }
    }
}

/// Errors raised while loading or linking the line program.
#[derive(Error, Debug)]
pub enum ShaderError {
    #[error("Failed to read shader source {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse {stage} shader:\n{message}")]
    Parse { stage: ShaderStage, message: String },
    #[error("{stage} shader failed validation: {message}")]
    Validation { stage: ShaderStage, message: String },
    #[error("{stage} shader has no entry point `{name}`")]
    MissingEntryPoint {
        stage: ShaderStage,
        name: &'static str,
    },
    #[error("Vertex attribute `{0}` not found")]
    MissingAttribute(&'static str),
    #[error("Vertex attribute `{0}` must be a vec3<f32> with a location")]
    AttributeType(&'static str),
    #[error("{stage} shader declares no line uniform block")]
    MissingUniformBlock { stage: ShaderStage },
    #[error("Uniform member `{member}` is missing or mistyped in the {stage} shader")]
    UniformMember {
        stage: ShaderStage,
        member: &'static str,
    },
    #[error("Vertex and fragment shaders disagree on the uniform block layout")]
    UniformMismatch,
}

/// Vertex and fragment WGSL text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSources {
    pub vertex: String,
    pub fragment: String,
}

impl ShaderSources {
    pub fn new(vertex: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self {
            vertex: vertex.into(),
            fragment: fragment.into(),
        }
    }

    /// The line shaders shipped with the crate.
    pub fn builtin() -> Self {
        Self::new(LINE_VERTEX_SHADER_SOURCE, LINE_FRAGMENT_SHADER_SOURCE)
    }

    /// Read both stages from disk.
    pub fn from_files(
        vertex: impl AsRef<Path>,
        fragment: impl AsRef<Path>,
    ) -> Result<Self, ShaderError> {
        Ok(Self::new(read_source(vertex.as_ref())?, read_source(fragment.as_ref())?))
    }
}

fn read_source(path: &Path) -> Result<String, ShaderError> {
    log::debug!("Loading shader source {}", path.display());
    std::fs::read_to_string(path).map_err(|source| ShaderError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_an_io_error() {
        let err = ShaderSources::from_files("does/not/exist.vs.wgsl", "does/not/exist.fs.wgsl")
            .unwrap_err();
        assert!(matches!(err, ShaderError::Io { .. }));
        assert!(err.to_string().contains("exist.vs.wgsl"));
    }

    #[test]
    fn test_from_files_roundtrip() {
        let dir = std::env::temp_dir().join(format!("thick_lines_shader_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let vs = dir.join("line.vs.wgsl");
        let fs = dir.join("line.fs.wgsl");
        std::fs::write(&vs, LINE_VERTEX_SHADER_SOURCE).unwrap();
        std::fs::write(&fs, LINE_FRAGMENT_SHADER_SOURCE).unwrap();

        let sources = ShaderSources::from_files(&vs, &fs).unwrap();
        assert_eq!(sources, ShaderSources::builtin());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(ShaderStage::Vertex.to_string(), "vertex");
        assert_eq!(ShaderStage::Fragment.to_string(), "fragment");
    }
}
