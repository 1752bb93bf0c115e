//! Mesh Voxelizer
//!
//! Fills a [`VoxelGrid`] with every lattice cell whose box overlaps the
//! bounding box of at least one mesh triangle. This is the conservative
//! box/box test, not exact triangle/box intersection: a cell near a sloped
//! triangle can be marked even when the surface itself misses it.
//!
//! Cells are only considered inside the mesh bounding-box lattice
//! (`floor(min / s)` up to the last cell starting below `max`), so a mesh
//! spanning exactly `[0, 1]^3` produces the single voxel `(0, 0, 0)`.

use glam::{IVec3, Mat4, Vec3};

use super::grid::VoxelGrid;
use super::types::{VoxelAabb, VoxelCoord, VoxelRecord, VoxelSource};
use crate::mesh::Mesh;

/// Voxelization parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Voxelizer {
    cell_size: f32,
    /// Mesh placement applied to vertices before sampling.
    transform: Mat4,
}

impl Default for Voxelizer {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Voxelizer {
    pub fn new(cell_size: f32) -> Self {
        let cell_size = if cell_size.is_finite() && cell_size > 0.0 {
            cell_size
        } else {
            1.0
        };
        Self {
            cell_size,
            transform: Mat4::IDENTITY,
        }
    }

    pub fn with_transform(mut self, transform: Mat4) -> Self {
        self.transform = transform;
        self
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Voxelize `mesh` into a fresh grid.
    pub fn run(&self, mesh: &Mesh) -> VoxelGrid {
        let mut grid = VoxelGrid::with_cell_size(self.cell_size);
        self.fill(mesh, &mut grid);
        grid.drain_events();
        grid
    }

    /// Clear `grid` and voxelize `mesh` into it. Renderer events for both the
    /// clear and the new voxels stay queued on `grid`.
    pub fn run_into(&self, mesh: &Mesh, grid: &mut VoxelGrid) {
        grid.replace_with(self.run(mesh));
    }

    fn fill(&self, mesh: &Mesh, grid: &mut VoxelGrid) {
        if mesh.triangle_count() == 0 {
            return;
        }

        let world: Vec<Vec3> = mesh
            .positions()
            .iter()
            .map(|p| self.transform.transform_point3(*p))
            .collect();

        let Some(bounds) = world_bounds(&world) else {
            return;
        };
        let s = self.cell_size;
        let lo = (bounds.min / s).floor().as_ivec3();
        let hi = ((bounds.max / s).ceil().as_ivec3() - IVec3::ONE).max(lo);

        let record = VoxelRecord {
            source: VoxelSource::Voxelized,
            ..Default::default()
        };

        for tri in mesh.triangles() {
            let tri_box = VoxelAabb::from_triangle(tri.map(|i| world[i as usize]));
            // Candidate cells padded by one on each side; the overlap test decides.
            let first = ((tri_box.min / s).floor().as_ivec3() - IVec3::ONE).max(lo);
            let last = ((tri_box.max / s).floor().as_ivec3() + IVec3::ONE).min(hi);

            for x in first.x..=last.x {
                for y in first.y..=last.y {
                    for z in first.z..=last.z {
                        let coord = VoxelCoord::new(x, y, z);
                        if VoxelAabb::from_cell(coord, s).overlaps(&tri_box) {
                            grid.add_with(coord, record);
                        }
                    }
                }
            }
        }

        log::debug!(
            "voxelized {} triangles into {} cells (lattice {:?}..={:?}, cell {})",
            mesh.triangle_count(),
            grid.len(),
            lo,
            hi,
            s
        );
    }
}

fn world_bounds(points: &[Vec3]) -> Option<VoxelAabb> {
    let (first, rest) = points.split_first()?;
    let mut aabb = VoxelAabb::new(*first, *first);
    for p in rest {
        aabb.include_point(*p);
    }
    Some(aabb)
}

/// Voxelize `mesh` at `cell_size` with identity placement.
pub fn voxelize(mesh: &Mesh, cell_size: f32) -> VoxelGrid {
    Voxelizer::new(cell_size).run(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{generate_box, generate_sphere};

    /// Every lattice cell tested against every triangle.
    fn brute_force(mesh: &Mesh, s: f32) -> Vec<VoxelCoord> {
        let Some((min, max)) = mesh.bounds() else {
            return Vec::new();
        };
        if mesh.triangle_count() == 0 {
            return Vec::new();
        }
        let lo = (min / s).floor().as_ivec3();
        let hi = ((max / s).ceil().as_ivec3() - IVec3::ONE).max(lo);
        let mut out = Vec::new();
        for x in lo.x..=hi.x {
            for y in lo.y..=hi.y {
                for z in lo.z..=hi.z {
                    let coord = VoxelCoord::new(x, y, z);
                    let cell = VoxelAabb::from_cell(coord, s);
                    let hit = (0..mesh.triangle_count())
                        .any(|t| cell.overlaps(&VoxelAabb::from_triangle(mesh.triangle_positions(t))));
                    if hit {
                        out.push(coord);
                    }
                }
            }
        }
        out
    }

    #[test]
    fn empty_mesh_gives_empty_grid() {
        assert!(voxelize(&Mesh::new(), 1.0).is_empty());
    }

    #[test]
    fn points_without_triangles_give_empty_grid() {
        let mesh = Mesh::from_parts(vec![Vec3::ZERO, Vec3::ONE], None, Vec::new()).unwrap();
        assert!(voxelize(&mesh, 1.0).is_empty());
    }

    #[test]
    fn unit_cube_fills_single_voxel() {
        let mesh = generate_box(Vec3::splat(0.5), Vec3::splat(0.5));
        let grid = voxelize(&mesh, 1.0);
        assert_eq!(grid.sorted_coords(), vec![VoxelCoord::new(0, 0, 0)]);
    }

    #[test]
    fn two_unit_box_fills_eight_voxels() {
        let mesh = generate_box(Vec3::ONE, Vec3::ONE);
        let grid = voxelize(&mesh, 1.0);
        assert_eq!(grid.len(), 8);
        assert!(grid.values().all(|(_, r)| r.source == VoxelSource::Voxelized));
    }

    #[test]
    fn flat_triangle_still_voxelizes() {
        let mesh = Mesh::from_flat(&[[0.2, 0.5, 0.2], [2.7, 0.5, 0.2], [0.2, 0.5, 2.7]], &[0, 1, 2]).unwrap();
        let grid = voxelize(&mesh, 1.0);
        assert!(grid.contains(VoxelCoord::new(0, 0, 0)));
        assert!(grid.contains(VoxelCoord::new(2, 0, 2)));
    }

    /// Known approximation: the far corner cell (2, 0, 2) lies entirely past the
    /// triangle's hypotenuse yet is marked, because only bounding boxes are
    /// compared.
    #[test]
    fn bounding_box_test_keeps_false_positive() {
        let mesh = Mesh::from_flat(&[[0.2, 0.5, 0.2], [2.7, 0.5, 0.2], [0.2, 0.5, 2.7]], &[0, 1, 2]).unwrap();
        let grid = voxelize(&mesh, 1.0);
        // x + z >= 4 everywhere in that cell, while the triangle has x + z <= 2.9.
        assert!(grid.contains(VoxelCoord::new(2, 0, 2)));
        assert_eq!(grid.len(), 9);
    }

    #[test]
    fn matches_brute_force_scan() {
        let mesh = generate_sphere(Vec3::new(0.3, 1.1, -0.4), 2.2, 10);
        for s in [1.0, 0.5, 0.7] {
            let grid = voxelize(&mesh, s);
            assert_eq!(grid.sorted_coords(), brute_force(&mesh, s), "cell size {s}");
        }
    }

    #[test]
    fn run_into_clears_previous_contents() {
        let mut grid = VoxelGrid::new();
        grid.add(VoxelCoord::new(50, 50, 50));
        let mesh = generate_box(Vec3::splat(0.5), Vec3::splat(0.5));
        Voxelizer::default().run_into(&mesh, &mut grid);
        assert!(!grid.contains(VoxelCoord::new(50, 50, 50)));
        assert_eq!(grid.len(), 1);
    }

    #[test]
    fn transform_moves_sampled_region() {
        let mesh = generate_box(Vec3::splat(0.5), Vec3::splat(0.5));
        let grid = Voxelizer::new(1.0)
            .with_transform(Mat4::from_translation(Vec3::new(3.0, 0.0, -2.0)))
            .run(&mesh);
        assert_eq!(grid.sorted_coords(), vec![VoxelCoord::new(3, 0, -2)]);
    }
}
