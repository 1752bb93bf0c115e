//! Topology Index
//!
//! Vertex adjacency derived from triangle connectivity. Built once per mesh
//! and cached for the mesh's lifetime; sculpting only moves vertices, so the
//! index stays valid until the triangle list itself is replaced.

use std::collections::HashSet;

use super::types::Mesh;

/// Vertex -> neighbor vertices and vertex -> incident triangles.
#[derive(Debug, Clone, Default)]
pub struct TopologyIndex {
    /// Sorted, de-duplicated neighbor list per vertex.
    neighbors: Vec<Vec<u32>>,
    /// Indices of the triangles referencing each vertex, ascending.
    faces: Vec<Vec<u32>>,
    triangle_count: usize,
}

impl TopologyIndex {
    /// Build the adjacency of `mesh`.
    ///
    /// For every triangle (a, b, c), `b` and `c` become neighbors of `a`, and
    /// symmetrically for `b` and `c`. A degenerate triangle such as (a, a, b)
    /// makes `a` its own neighbor; that is tolerated.
    pub fn build(mesh: &Mesh) -> Self {
        let vertex_count = mesh.vertex_count();
        let mut neighbors: Vec<Vec<u32>> = vec![Vec::new(); vertex_count];
        let mut faces: Vec<Vec<u32>> = vec![Vec::new(); vertex_count];

        for (t, &[a, b, c]) in mesh.triangles().iter().enumerate() {
            let t = t as u32;
            for (v, others) in [(a, [b, c]), (b, [a, c]), (c, [a, b])] {
                neighbors[v as usize].extend_from_slice(&others);
                let incident = &mut faces[v as usize];
                if incident.last() != Some(&t) {
                    incident.push(t);
                }
            }
        }

        for list in &mut neighbors {
            list.sort_unstable();
            list.dedup();
        }

        Self {
            neighbors,
            faces,
            triangle_count: mesh.triangle_count(),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.neighbors.len()
    }

    /// Whether this index was built from a mesh with the same shape as `mesh`.
    pub fn matches(&self, mesh: &Mesh) -> bool {
        self.neighbors.len() == mesh.vertex_count() && self.triangle_count == mesh.triangle_count()
    }

    /// Distinct vertices sharing a triangle with `v` (empty if out of range).
    pub fn neighbors(&self, v: u32) -> &[u32] {
        self.neighbors.get(v as usize).map_or(&[], Vec::as_slice)
    }

    /// Triangles referencing `v` (empty if out of range).
    pub fn faces_of(&self, v: u32) -> &[u32] {
        self.faces.get(v as usize).map_or(&[], Vec::as_slice)
    }

    /// Every triangle referencing at least one of `vertices`, each listed once.
    pub fn faces_touching(&self, vertices: impl IntoIterator<Item = u32>) -> Vec<u32> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for v in vertices {
            for &f in self.faces_of(v) {
                if seen.insert(f) {
                    out.push(f);
                }
            }
        }
        out
    }

    /// `vertices` plus their one-ring neighbors, de-duplicated.
    pub fn expand_one_ring(&self, vertices: &[u32]) -> Vec<u32> {
        let mut seen = HashSet::with_capacity(vertices.len());
        let mut out = Vec::with_capacity(vertices.len());
        for &v in vertices {
            if seen.insert(v) {
                out.push(v);
            }
        }
        for &v in vertices {
            for &n in self.neighbors(v) {
                if seen.insert(n) {
                    out.push(n);
                }
            }
        }
        out
    }
}
