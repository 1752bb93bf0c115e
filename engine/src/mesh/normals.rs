//! Normal Recomputation
//!
//! Per-vertex normals are the normalized sum of the unnormalized face normals
//! of every triangle touching the vertex (area-weighted, since the cross
//! product length is twice the triangle area).
//!
//! `recompute_subset` is the sculpt hot path: its cost is proportional to the
//! number of triangles incident to the given vertices, never to the size of
//! the whole mesh.

use std::collections::HashSet;

use glam::Vec3;

use super::topology::TopologyIndex;
use super::types::Mesh;

/// Unnormalized face normal of triangle (a, b, c): `(c - b) x (a - b)`.
///
/// Counter-clockwise triangles (seen from the front) yield a normal pointing
/// towards the viewer. Zero-area triangles yield `Vec3::ZERO`.
#[inline]
pub fn face_normal(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    (c - b).cross(a - b)
}

/// Recompute every vertex normal of `mesh`.
pub fn recompute_all(mesh: &mut Mesh) {
    let (positions, normals, triangles) = mesh.split_for_normals();

    normals.fill(Vec3::ZERO);

    for &[a, b, c] in triangles {
        let (a, b, c) = (a as usize, b as usize, c as usize);
        let n = face_normal(positions[a], positions[b], positions[c]);
        normals[a] += n;
        normals[b] += n;
        normals[c] += n;
    }

    for n in normals.iter_mut() {
        *n = n.normalize_or_zero();
    }
}

/// Recompute normals for `vertices` only.
///
/// Only the listed normals are zeroed, only triangles touching at least one
/// listed vertex are visited, and only listed vertices receive accumulation and
/// normalization. Every other normal is left untouched. Indices outside the
/// mesh are ignored.
pub fn recompute_subset(mesh: &mut Mesh, topology: &TopologyIndex, vertices: &[u32]) {
    let vertex_count = mesh.vertex_count();
    let subset: HashSet<u32> = vertices
        .iter()
        .copied()
        .filter(|&v| (v as usize) < vertex_count)
        .collect();
    let dropped = vertices.iter().filter(|&&v| v as usize >= vertex_count).count();
    if dropped > 0 {
        log::warn!("recompute_subset: ignoring {dropped} out-of-range vertex indices");
    }
    if subset.is_empty() {
        return;
    }

    // Same triangle order as recompute_all, so both paths sum identically.
    let mut faces = topology.faces_touching(subset.iter().copied());
    faces.sort_unstable();
    let (positions, normals, triangles) = mesh.split_for_normals();

    for &v in &subset {
        normals[v as usize] = Vec3::ZERO;
    }

    for f in faces {
        let Some(&tri) = triangles.get(f as usize) else {
            continue;
        };
        let [a, b, c] = tri;
        let n = face_normal(
            positions[a as usize],
            positions[b as usize],
            positions[c as usize],
        );
        for v in tri {
            if subset.contains(&v) {
                normals[v as usize] += n;
            }
        }
    }

    for &v in &subset {
        let n = &mut normals[v as usize];
        *n = n.normalize_or_zero();
    }
}
