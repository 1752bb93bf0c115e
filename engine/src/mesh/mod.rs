//! Mesh Module
//!
//! Indexed triangle meshes and the incremental machinery the sculpt brush
//! runs on:
//!
//! - [`types`] - `Mesh` buffers, import validation, GPU vertex layout, primitives
//! - [`topology`] - vertex adjacency and vertex -> triangle incidence
//! - [`normals`] - full and subset normal recomputation

pub mod normals;
pub mod topology;
pub mod types;

pub use normals::{face_normal, recompute_all, recompute_subset};
pub use topology::TopologyIndex;
pub use types::{Mesh, MeshError, Vertex, generate_box, generate_plane_grid, generate_sphere};
