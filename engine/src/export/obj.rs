//! Wavefront OBJ writers.

use std::io::Write;

use glam::Vec3;

use super::ExportError;
use crate::mesh::Mesh;
use crate::voxel::VoxelGrid;

/// Unit cube corners, indexed like the quads below.
const CUBE_CORNERS: [Vec3; 8] = [
    Vec3::new(0.0, 0.0, 0.0),
    Vec3::new(1.0, 0.0, 0.0),
    Vec3::new(1.0, 1.0, 0.0),
    Vec3::new(0.0, 1.0, 0.0),
    Vec3::new(0.0, 0.0, 1.0),
    Vec3::new(1.0, 0.0, 1.0),
    Vec3::new(1.0, 1.0, 1.0),
    Vec3::new(0.0, 1.0, 1.0),
];

/// Outward counter-clockwise quads over `CUBE_CORNERS`.
const CUBE_QUADS: [[usize; 4]; 6] = [
    [0, 3, 2, 1],
    [4, 5, 6, 7],
    [0, 4, 7, 3],
    [1, 2, 6, 5],
    [3, 7, 6, 2],
    [0, 1, 5, 4],
];

/// Write every voxel as its own cube: 8 vertices and 6 quads, 1-based.
/// Voxels are emitted in ascending coordinate order.
pub fn write_voxels_obj<W: Write>(grid: &VoxelGrid, mut out: W) -> Result<(), ExportError> {
    if grid.is_empty() {
        return Err(ExportError::EmptyGrid);
    }
    let s = grid.cell_size();

    writeln!(out, "# voxsculpt voxel export")?;
    writeln!(out, "# {} voxels, cell size {}", grid.len(), s)?;
    writeln!(out, "o voxels")?;

    for (n, coord) in grid.sorted_coords().into_iter().enumerate() {
        let min = coord.min_corner(s);
        for corner in CUBE_CORNERS {
            let p = min + corner * s;
            writeln!(out, "v {} {} {}", p.x, p.y, p.z)?;
        }
        let base = n * 8 + 1;
        for [a, b, c, d] in CUBE_QUADS {
            writeln!(out, "f {} {} {} {}", base + a, base + b, base + c, base + d)?;
        }
    }
    out.flush()?;
    Ok(())
}

/// Write `mesh` with per-vertex normals (`f v//vn`).
pub fn write_mesh_obj<W: Write>(mesh: &Mesh, mut out: W) -> Result<(), ExportError> {
    writeln!(out, "# voxsculpt mesh export")?;
    writeln!(
        out,
        "# {} vertices, {} triangles",
        mesh.vertex_count(),
        mesh.triangle_count()
    )?;
    writeln!(out, "o mesh")?;

    for p in mesh.positions() {
        writeln!(out, "v {} {} {}", p.x, p.y, p.z)?;
    }
    for n in mesh.normals() {
        writeln!(out, "vn {} {} {}", n.x, n.y, n.z)?;
    }
    for [a, b, c] in mesh.triangles() {
        let (a, b, c) = (a + 1, b + 1, c + 1);
        writeln!(out, "f {a}//{a} {b}//{b} {c}//{c}")?;
    }
    out.flush()?;
    Ok(())
}
