//! Mesh Types
//!
//! Indexed triangle mesh with owned position/normal buffers, the GPU vertex
//! layout produced from it, and the primitive generators used by the demo and
//! tests.
//!
//! Positions and normals are stored as separate contiguous arrays indexed by
//! vertex id. Outside this crate they are read-only; the sculpt engine and the
//! normal recomputer are the only writers.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use super::normals;

// ============================================================================
// GPU VERTEX TYPE
// ============================================================================

/// Interleaved vertex uploaded to the renderer after a sculpt or import.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

static_assertions::assert_eq_size!(Vertex, [u8; 24]);

// ============================================================================
// ERROR TYPE
// ============================================================================

/// Errors raised when mesh buffers violate the mesh invariants.
///
/// These are only produced at the import boundary; once a `Mesh` exists its
/// buffers are known to be consistent.
#[derive(Debug, Clone, PartialEq)]
pub enum MeshError {
    /// Normal buffer length differs from the position buffer length.
    NormalCountMismatch { positions: usize, normals: usize },
    /// A triangle references a vertex that does not exist.
    IndexOutOfRange {
        triangle: usize,
        index: u32,
        vertex_count: usize,
    },
    /// A flat index buffer whose length is not divisible by three.
    IndexCountNotMultipleOfThree(usize),
    /// A vertex position contains NaN or infinity.
    NonFiniteVertex(usize),
}

impl std::fmt::Display for MeshError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeshError::NormalCountMismatch { positions, normals } => write!(
                f,
                "normal count {normals} does not match vertex count {positions}"
            ),
            MeshError::IndexOutOfRange {
                triangle,
                index,
                vertex_count,
            } => write!(
                f,
                "triangle {triangle} references vertex {index}, but the mesh has {vertex_count} vertices"
            ),
            MeshError::IndexCountNotMultipleOfThree(n) => {
                write!(f, "index count {n} is not a multiple of three")
            }
            MeshError::NonFiniteVertex(i) => write!(f, "vertex {i} has a non-finite position"),
        }
    }
}

impl std::error::Error for MeshError {}

// ============================================================================
// MESH
// ============================================================================

/// An indexed triangle mesh.
///
/// Invariants: `normals.len() == positions.len()`, and every index in
/// `triangles` is `< positions.len()`. Degenerate triangles are allowed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    triangles: Vec<[u32; 3]>,
}

impl Mesh {
    /// Empty mesh with no vertices and no triangles.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a mesh from separate buffers, validating every invariant.
    ///
    /// `normals` may be `None`, in which case all normals start at zero.
    pub fn from_parts(
        positions: Vec<Vec3>,
        normals: Option<Vec<Vec3>>,
        triangles: Vec<[u32; 3]>,
    ) -> Result<Self, MeshError> {
        let normals = normals.unwrap_or_else(|| vec![Vec3::ZERO; positions.len()]);
        if normals.len() != positions.len() {
            return Err(MeshError::NormalCountMismatch {
                positions: positions.len(),
                normals: normals.len(),
            });
        }
        if let Some(i) = positions.iter().position(|p| !p.is_finite()) {
            return Err(MeshError::NonFiniteVertex(i));
        }
        let vertex_count = positions.len();
        for (t, tri) in triangles.iter().enumerate() {
            if let Some(&index) = tri.iter().find(|&&i| i as usize >= vertex_count) {
                return Err(MeshError::IndexOutOfRange {
                    triangle: t,
                    index,
                    vertex_count,
                });
            }
        }
        Ok(Self {
            positions,
            normals,
            triangles,
        })
    }

    /// Build a mesh from raw position arrays and a flat index buffer, then
    /// compute smooth normals.
    pub fn from_flat(positions: &[[f32; 3]], indices: &[u32]) -> Result<Self, MeshError> {
        if indices.len() % 3 != 0 {
            return Err(MeshError::IndexCountNotMultipleOfThree(indices.len()));
        }
        let positions = positions.iter().copied().map(Vec3::from_array).collect();
        let triangles = indices
            .chunks_exact(3)
            .map(|c| [c[0], c[1], c[2]])
            .collect();
        Self::new_computed(positions, triangles)
    }

    /// Build a mesh and compute its normals from face geometry.
    pub fn new_computed(positions: Vec<Vec3>, triangles: Vec<[u32; 3]>) -> Result<Self, MeshError> {
        let mut mesh = Self::from_parts(positions, None, triangles)?;
        normals::recompute_all(&mut mesh);
        Ok(mesh)
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    /// Corner positions of triangle `t`.
    #[inline]
    pub fn triangle_positions(&self, t: usize) -> [Vec3; 3] {
        let [a, b, c] = self.triangles[t];
        [
            self.positions[a as usize],
            self.positions[b as usize],
            self.positions[c as usize],
        ]
    }

    pub(crate) fn positions_mut(&mut self) -> &mut [Vec3] {
        &mut self.positions
    }

    /// Positions and normals borrowed together for the normal recomputer.
    pub(crate) fn split_for_normals(&mut self) -> (&[Vec3], &mut [Vec3], &[[u32; 3]]) {
        (&self.positions, &mut self.normals, &self.triangles)
    }

    /// Axis-aligned bounds of all vertices, or `None` for an empty mesh.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = *self.positions.first()?;
        Some(
            self.positions
                .iter()
                .fold((first, first), |(min, max), &p| (min.min(p), max.max(p))),
        )
    }

    /// Interleaved vertex buffer for GPU upload.
    pub fn to_gpu_vertices(&self) -> Vec<Vertex> {
        self.positions
            .iter()
            .zip(&self.normals)
            .map(|(p, n)| Vertex {
                position: p.to_array(),
                normal: n.to_array(),
            })
            .collect()
    }

    /// Triangle indices as one flat `u32` slice.
    pub fn flat_indices(&self) -> &[u32] {
        bytemuck::cast_slice(&self.triangles)
    }
}

// ============================================================================
// MESH GENERATION PRIMITIVES
// ============================================================================

/// Generate an axis-aligned box with 4 unshared vertices per face.
pub fn generate_box(center: Vec3, half_extents: Vec3) -> Mesh {
    let (hx, hy, hz) = (half_extents.x, half_extents.y, half_extents.z);

    let corners = [
        Vec3::new(-hx, -hy, -hz),
        Vec3::new(hx, -hy, -hz),
        Vec3::new(hx, hy, -hz),
        Vec3::new(-hx, hy, -hz),
        Vec3::new(-hx, -hy, hz),
        Vec3::new(hx, -hy, hz),
        Vec3::new(hx, hy, hz),
        Vec3::new(-hx, hy, hz),
    ];

    // Quads wound so that (c-b)x(a-b) points outward.
    let faces: [[usize; 4]; 6] = [
        [0, 3, 2, 1],
        [4, 5, 6, 7],
        [0, 4, 7, 3],
        [1, 2, 6, 5],
        [3, 7, 6, 2],
        [0, 1, 5, 4],
    ];

    let mut positions = Vec::with_capacity(24);
    let mut triangles = Vec::with_capacity(12);
    for quad in &faces {
        let base = positions.len() as u32;
        positions.extend(quad.iter().map(|&i| center + corners[i]));
        triangles.push([base, base + 1, base + 2]);
        triangles.push([base, base + 2, base + 3]);
    }

    primitive(positions, triangles)
}

/// Generate a flat grid in the XZ plane facing +Y with shared vertices.
///
/// `cells` quads per side, each `cell_size` wide, centered on `center`.
pub fn generate_plane_grid(center: Vec3, cells: u32, cell_size: f32) -> Mesh {
    let side = cells + 1;
    let half = cells as f32 * cell_size * 0.5;

    let mut positions = Vec::with_capacity((side * side) as usize);
    for z in 0..side {
        for x in 0..side {
            positions.push(
                center + Vec3::new(x as f32 * cell_size - half, 0.0, z as f32 * cell_size - half),
            );
        }
    }

    let mut triangles = Vec::with_capacity((cells * cells * 2) as usize);
    for z in 0..cells {
        for x in 0..cells {
            let i0 = z * side + x;
            let i1 = i0 + 1;
            let i2 = i0 + side;
            let i3 = i2 + 1;
            triangles.push([i0, i2, i1]);
            triangles.push([i1, i2, i3]);
        }
    }

    primitive(positions, triangles)
}

/// Generate a UV sphere. `segments` is clamped to at least 3.
pub fn generate_sphere(center: Vec3, radius: f32, segments: u32) -> Mesh {
    let segments = segments.max(3);
    let mut positions = Vec::new();
    let mut triangles = Vec::new();

    for lat in 0..=segments {
        let theta = (lat as f32) * std::f32::consts::PI / (segments as f32);
        let (sin_theta, cos_theta) = theta.sin_cos();

        for lon in 0..=segments {
            let phi = (lon as f32) * 2.0 * std::f32::consts::PI / (segments as f32);
            let (sin_phi, cos_phi) = phi.sin_cos();
            let dir = Vec3::new(sin_theta * cos_phi, cos_theta, sin_theta * sin_phi);
            positions.push(center + dir * radius);
        }
    }

    for lat in 0..segments {
        for lon in 0..segments {
            let first = lat * (segments + 1) + lon;
            let second = first + segments + 1;
            triangles.push([first, first + 1, second]);
            triangles.push([second, first + 1, second + 1]);
        }
    }

    primitive(positions, triangles)
}

fn primitive(positions: Vec<Vec3>, triangles: Vec<[u32; 3]>) -> Mesh {
    let mut mesh = Mesh {
        normals: vec![Vec3::ZERO; positions.len()],
        positions,
        triangles,
    };
    normals::recompute_all(&mut mesh);
    mesh
}
