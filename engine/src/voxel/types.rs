use glam::{IVec3, Vec3};

/// Integer lattice coordinate of a voxel (its minimum corner, in cells).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VoxelCoord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl VoxelCoord {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub fn as_ivec3(self) -> IVec3 {
        IVec3::new(self.x, self.y, self.z)
    }

    /// Cell containing world point `p` for cells of edge `cell_size`.
    pub fn from_world(p: Vec3, cell_size: f32) -> Self {
        let c = (p / cell_size).floor();
        Self::new(c.x as i32, c.y as i32, c.z as i32)
    }

    /// World-space minimum corner.
    pub fn min_corner(self, cell_size: f32) -> Vec3 {
        self.as_ivec3().as_vec3() * cell_size
    }

    /// World-space cube center, where the renderer materializes the voxel.
    pub fn center(self, cell_size: f32) -> Vec3 {
        (self.as_ivec3().as_vec3() + Vec3::splat(0.5)) * cell_size
    }
}

impl From<IVec3> for VoxelCoord {
    fn from(value: IVec3) -> Self {
        Self::new(value.x, value.y, value.z)
    }
}

impl From<(i32, i32, i32)> for VoxelCoord {
    fn from((x, y, z): (i32, i32, i32)) -> Self {
        Self::new(x, y, z)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct VoxelMaterialId(pub u8);

/// How a voxel came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VoxelSource {
    #[default]
    Placed,
    Voxelized,
}

/// Occupancy record. The render handle itself belongs to the renderer; this
/// carries what is needed to rebuild geometry and material on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VoxelRecord {
    pub material: VoxelMaterialId,
    pub source: VoxelSource,
}

/// Renderer signal produced by grid mutations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VoxelEvent {
    /// Create a unit cube centered at `center`.
    Materialize { coord: VoxelCoord, center: Vec3 },
    /// Destroy the cube for `coord`.
    Dematerialize { coord: VoxelCoord },
}

/// Nearest voxel face hit by a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoxelHit {
    pub coord: VoxelCoord,
    /// Point where the ray enters the voxel.
    pub world_pos: Vec3,
    /// Outward normal of the entered face; zero if the ray starts inside.
    pub normal: IVec3,
    pub distance: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoxelAabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl VoxelAabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn include_point(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    /// Closed-interval overlap: boxes sharing only a face still overlap.
    pub fn overlaps(&self, other: &VoxelAabb) -> bool {
        self.min.cmple(other.max).all() && self.max.cmpge(other.min).all()
    }

    /// Bounding box of a triangle.
    pub fn from_triangle([a, b, c]: [Vec3; 3]) -> Self {
        Self::new(a.min(b).min(c), a.max(b).max(c))
    }

    /// World box covered by a voxel cell.
    pub fn from_cell(coord: VoxelCoord, cell_size: f32) -> Self {
        let min = coord.min_corner(cell_size);
        Self::new(min, min + Vec3::splat(cell_size))
    }
}
