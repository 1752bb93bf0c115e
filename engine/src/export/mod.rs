//! Export Module
//!
//! Plain data transcription of editor state into interchange formats:
//!
//! - [`obj`] - Wavefront OBJ text for the voxel grid or the sculpted mesh
//! - [`bedrock`] - block-geometry JSON, one cube per voxel

pub mod bedrock;
pub mod obj;

pub use bedrock::{BedrockGeometry, geometry_from_grid};
pub use obj::{write_mesh_obj, write_voxels_obj};

/// Errors that can occur while exporting.
#[derive(Debug)]
pub enum ExportError {
    /// Standard I/O error.
    Io(std::io::Error),
    /// JSON serialization error.
    Json(serde_json::Error),
    /// There are no voxels to export.
    EmptyGrid,
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportError::Io(e) => write!(f, "IO error: {e}"),
            ExportError::Json(e) => write!(f, "JSON error: {e}"),
            ExportError::EmptyGrid => write!(f, "voxel grid is empty"),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Io(e) => Some(e),
            ExportError::Json(e) => Some(e),
            ExportError::EmptyGrid => None,
        }
    }
}

impl From<std::io::Error> for ExportError {
    fn from(e: std::io::Error) -> Self {
        ExportError::Io(e)
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(e: serde_json::Error) -> Self {
        ExportError::Json(e)
    }
}
