//! Editor Configuration
//!
//! Centralized, serializable settings for the brush, the voxel grid and the
//! initial camera pose. Every field has a default, so a config file only
//! needs the values it overrides:
//!
//! ```json
//! { "brush": { "radius": 0.75 }, "voxel": { "ground_plane": false } }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

// ============================================================================
// SECTIONS
// ============================================================================

/// Sculpt brush defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushConfig {
    /// Brush radius in world units
    pub radius: f32,
    /// Displacement at the brush center per sample (negative digs in)
    pub strength: f32,
    /// Also refresh normals of the one-ring around displaced vertices
    pub refresh_neighbor_normals: bool,
}

impl Default for BrushConfig {
    fn default() -> Self {
        Self {
            radius: 1.0,
            strength: 0.1,
            refresh_neighbor_normals: false,
        }
    }
}

/// Longest voxel pick ray accepted by `validate`.
pub const MAX_RAY_DISTANCE: f32 = 10_000.0;

/// Voxel grid and voxel picking settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoxelConfig {
    /// Edge length of one voxel in world units
    pub cell_size: f32,
    /// Allow placing voxels on the y = 0 plane when no voxel is hit
    pub ground_plane: bool,
    /// Maximum pick distance for voxel rays
    pub max_ray_distance: f32,
}

impl Default for VoxelConfig {
    fn default() -> Self {
        Self {
            cell_size: 1.0,
            ground_plane: true,
            max_ray_distance: 500.0,
        }
    }
}

/// Initial camera pose.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub target: [f32; 3],
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    /// Viewport width / height
    pub aspect: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [8.0, 8.0, 8.0],
            target: [0.0, 0.0, 0.0],
            fov_degrees: 60.0,
            aspect: 16.0 / 9.0,
        }
    }
}

/// Complete editor configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub brush: BrushConfig,
    pub voxel: VoxelConfig,
    pub camera: CameraConfig,
}

// ============================================================================
// ERROR TYPE
// ============================================================================

/// Errors that can occur while loading a configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// Standard I/O error.
    Io(std::io::Error),
    /// JSON syntax or type error.
    Json(serde_json::Error),
    /// Parsed, but a value is out of range.
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {e}"),
            ConfigError::Json(e) => write!(f, "JSON error: {e}"),
            ConfigError::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Json(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}

// ============================================================================
// LOADING
// ============================================================================

impl EditorConfig {
    /// Read and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&text)?;
        log::info!("loaded editor config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate a JSON config string.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: EditorConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the engine cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = [
            self.brush.radius,
            self.brush.strength,
            self.voxel.cell_size,
            self.voxel.max_ray_distance,
            self.camera.fov_degrees,
            self.camera.aspect,
        ]
        .iter()
        .chain(&self.camera.position)
        .chain(&self.camera.target)
        .all(|v| v.is_finite());
        if !finite {
            return Err(ConfigError::Invalid("non-finite value".into()));
        }
        if self.brush.radius < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "brush radius must be >= 0, got {}",
                self.brush.radius
            )));
        }
        if self.voxel.cell_size <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "voxel cell_size must be > 0, got {}",
                self.voxel.cell_size
            )));
        }
        if !(self.voxel.max_ray_distance > 0.0 && self.voxel.max_ray_distance <= MAX_RAY_DISTANCE) {
            return Err(ConfigError::Invalid(format!(
                "voxel max_ray_distance must be in (0, {MAX_RAY_DISTANCE}], got {}",
                self.voxel.max_ray_distance
            )));
        }
        if !(self.camera.fov_degrees > 0.0 && self.camera.fov_degrees < 180.0) {
            return Err(ConfigError::Invalid(format!(
                "camera fov_degrees must be in (0, 180), got {}",
                self.camera.fov_degrees
            )));
        }
        if self.camera.aspect <= 0.0 {
            return Err(ConfigError::Invalid("camera aspect must be > 0".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let config = EditorConfig::from_json_str("{}").unwrap();
        assert_eq!(config, EditorConfig::default());
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config =
            EditorConfig::from_json_str(r#"{ "brush": { "radius": 0.75 }, "voxel": { "ground_plane": false } }"#)
                .unwrap();
        assert!((config.brush.radius - 0.75).abs() < 1e-6);
        assert!((config.brush.strength - 0.1).abs() < 1e-6);
        assert!(!config.voxel.ground_plane);
        assert!((config.voxel.cell_size - 1.0).abs() < 1e-6);
    }

    #[test]
    fn rejects_zero_cell_size() {
        let err = EditorConfig::from_json_str(r#"{ "voxel": { "cell_size": 0.0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_bad_fov_and_negative_radius() {
        assert!(EditorConfig::from_json_str(r#"{ "camera": { "fov_degrees": 180.0 } }"#).is_err());
        assert!(EditorConfig::from_json_str(r#"{ "brush": { "radius": -1.0 } }"#).is_err());
    }

    #[test]
    fn rejects_unbounded_ray_distance() {
        let err = EditorConfig::from_json_str(r#"{ "voxel": { "max_ray_distance": 1e30 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(EditorConfig::from_json_str(r#"{ "voxel": { "max_ray_distance": 10000.0 } }"#).is_ok());
    }

    #[test]
    fn malformed_json_is_a_json_error() {
        let err = EditorConfig::from_json_str("{ brush: ").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
        assert!(err.to_string().starts_with("JSON error"));
    }

    #[test]
    fn serializes_and_reloads() {
        let mut config = EditorConfig::default();
        config.brush.refresh_neighbor_normals = true;
        let text = config.to_json_string().unwrap();
        assert_eq!(EditorConfig::from_json_str(&text).unwrap(), config);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = EditorConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
