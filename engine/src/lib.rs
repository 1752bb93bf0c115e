//! Voxsculpt Engine Library
//!
//! Geometry core of an interactive voxel and mesh editor: a sparse voxel
//! grid with pointer-driven add/remove, mesh voxelization, and a radius
//! sculpt brush with incremental normal updates. Rendering, windowing and
//! UI live outside this crate and talk to it through the session.
//!
//! # Modules
//!
//! - [`voxel`] - Sparse voxel grid, DDA picking, voxelizer and its worker
//! - [`mesh`] - Indexed meshes, topology index and normal recomputation
//! - [`sculpt`] - Brush settings, stroke state machine and displacement
//! - [`camera`] - Look-at camera and ray/triangle, ray/plane hits
//! - [`input`] - Pointer events and tool selection
//! - [`session`] - The editing context that ties everything together
//! - [`export`] - OBJ and block-geometry JSON writers
//! - [`config`] - Serializable editor settings
//!
//! # Example
//!
//! ```ignore
//! use glam::{Mat4, Vec2, Vec3};
//! use voxsculpt_engine::{EditSession, EditTool, EditorConfig, Modifiers, PointerEvent};
//! use voxsculpt_engine::mesh::generate_sphere;
//!
//! let mut session = EditSession::new(EditorConfig::default());
//! session.bind_mesh(generate_sphere(Vec3::ZERO, 2.0, 24), Mat4::IDENTITY);
//! session.set_tool(EditTool::Sculpt);
//!
//! session.handle_pointer(PointerEvent::Down { ndc: Vec2::ZERO, modifiers: Modifiers::new() });
//! session.handle_pointer(PointerEvent::Move { ndc: Vec2::new(0.05, 0.0) });
//! session.handle_pointer(PointerEvent::Up);
//!
//! // Re-upload only what changed.
//! let dirty = session.take_dirty_vertices();
//! ```

pub mod camera;
pub mod config;
pub mod export;
pub mod input;
pub mod mesh;
pub mod sculpt;
pub mod session;
pub mod voxel;

pub use camera::{Camera, Ray};
pub use config::{ConfigError, EditorConfig};
pub use export::ExportError;
pub use input::{EditTool, Modifiers, PointerEvent};
pub use mesh::{Mesh, MeshError, TopologyIndex};
pub use sculpt::{BrushSettings, SampleOutcome, SculptEngine, SculptTarget, StrokeState};
pub use session::{EditOutcome, EditSession};
pub use voxel::{VoxelCoord, VoxelEvent, VoxelGrid, Voxelizer, voxelize};
