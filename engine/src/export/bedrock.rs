//! Block-geometry JSON export.
//!
//! Produces a `minecraft:geometry` document with a single root bone holding
//! one unit cube per voxel. Cube origins and sizes are in voxel units.

use serde::{Deserialize, Serialize};

use super::ExportError;
use crate::voxel::VoxelGrid;

pub const FORMAT_VERSION: &str = "1.12.0";
pub const TEXTURE_SIZE: u32 = 16;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BedrockGeometry {
    pub format_version: String,
    #[serde(rename = "minecraft:geometry")]
    pub geometry: Vec<GeometryEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryEntry {
    pub description: GeometryDescription,
    pub bones: Vec<Bone>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryDescription {
    pub identifier: String,
    pub texture_width: u32,
    pub texture_height: u32,
    pub visible_bounds_width: f32,
    pub visible_bounds_height: f32,
    pub visible_bounds_offset: [f32; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bone {
    pub name: String,
    pub pivot: [f32; 3],
    pub cubes: Vec<Cube>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cube {
    pub origin: [f32; 3],
    pub size: [f32; 3],
    pub uv: [u32; 2],
}

/// Build the geometry document for `grid`. `identifier` gets a `geometry.`
/// prefix if it lacks one.
pub fn geometry_from_grid(grid: &VoxelGrid, identifier: &str) -> Result<BedrockGeometry, ExportError> {
    let coords = grid.sorted_coords();
    let Some(first) = coords.first() else {
        return Err(ExportError::EmptyGrid);
    };

    let mut min = first.as_ivec3();
    let mut max = min;
    for c in &coords {
        min = min.min(c.as_ivec3());
        max = max.max(c.as_ivec3());
    }
    let extent = (max - min + glam::IVec3::ONE).as_vec3();
    let center_y = (min.y as f32 + max.y as f32 + 1.0) * 0.5;

    let cubes = coords
        .iter()
        .map(|c| Cube {
            origin: [c.x as f32, c.y as f32, c.z as f32],
            size: [1.0, 1.0, 1.0],
            uv: [0, 0],
        })
        .collect();

    let identifier = if identifier.starts_with("geometry.") {
        identifier.to_string()
    } else {
        format!("geometry.{identifier}")
    };

    Ok(BedrockGeometry {
        format_version: FORMAT_VERSION.to_string(),
        geometry: vec![GeometryEntry {
            description: GeometryDescription {
                identifier,
                texture_width: TEXTURE_SIZE,
                texture_height: TEXTURE_SIZE,
                visible_bounds_width: extent.x.max(extent.z),
                visible_bounds_height: extent.y,
                visible_bounds_offset: [0.0, center_y, 0.0],
            },
            bones: vec![Bone {
                name: "root".to_string(),
                pivot: [0.0, 0.0, 0.0],
                cubes,
            }],
        }],
    })
}

impl BedrockGeometry {
    pub fn to_json_string(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn cube_count(&self) -> usize {
        self.geometry
            .iter()
            .flat_map(|g| &g.bones)
            .map(|b| b.cubes.len())
            .sum()
    }
}
