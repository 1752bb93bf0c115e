//! Voxel Module
//!
//! Sparse voxel editing on an integer lattice:
//!
//! - [`types`] - coordinates, occupancy records, renderer events, hits, boxes
//! - [`grid`] - the `VoxelGrid` store, DDA picking and neighbor placement
//! - [`voxelizer`] - mesh to grid sampling
//! - [`worker`] - voxelization off the input thread

pub mod grid;
pub mod types;
pub mod voxelizer;
pub mod worker;

pub use grid::{DEFAULT_CELL_SIZE, MAX_RAY_CELLS, VoxelGrid};
pub use types::{VoxelAabb, VoxelCoord, VoxelEvent, VoxelHit, VoxelMaterialId, VoxelRecord, VoxelSource};
pub use voxelizer::{Voxelizer, voxelize};
pub use worker::{VoxelizeCommand, VoxelizeEvent, VoxelizeWorker};
