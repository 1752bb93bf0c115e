use std::collections::HashMap;

use glam::{IVec3, Vec3};

use super::types::{VoxelCoord, VoxelEvent, VoxelHit, VoxelRecord};

pub const DEFAULT_CELL_SIZE: f32 = 1.0;

/// Sparse voxel occupancy keyed by lattice coordinate.
///
/// Every mutation queues a [`VoxelEvent`] for the renderer; the grid never
/// touches render resources itself.
#[derive(Debug, Clone)]
pub struct VoxelGrid {
    cells: HashMap<VoxelCoord, VoxelRecord>,
    cell_size: f32,
    events: Vec<VoxelEvent>,
}

impl Default for VoxelGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl VoxelGrid {
    pub fn new() -> Self {
        Self::with_cell_size(DEFAULT_CELL_SIZE)
    }

    /// Empty grid whose cells are `cell_size` world units wide.
    /// Non-positive or non-finite sizes fall back to the default.
    pub fn with_cell_size(cell_size: f32) -> Self {
        let cell_size = if cell_size.is_finite() && cell_size > 0.0 {
            cell_size
        } else {
            DEFAULT_CELL_SIZE
        };
        Self {
            cells: HashMap::new(),
            cell_size,
            events: Vec::new(),
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, coord: VoxelCoord) -> bool {
        self.cells.contains_key(&coord)
    }

    pub fn get(&self, coord: VoxelCoord) -> Option<&VoxelRecord> {
        self.cells.get(&coord)
    }

    /// Add a default voxel at `coord`. Returns `false` if it was already
    /// occupied (the existing entry is kept).
    pub fn add(&mut self, coord: VoxelCoord) -> bool {
        self.add_with(coord, VoxelRecord::default())
    }

    pub fn add_with(&mut self, coord: VoxelCoord, record: VoxelRecord) -> bool {
        if self.cells.contains_key(&coord) {
            return false;
        }
        self.cells.insert(coord, record);
        self.events.push(VoxelEvent::Materialize {
            coord,
            center: coord.center(self.cell_size),
        });
        true
    }

    /// Remove the voxel at `coord`, if any.
    pub fn remove(&mut self, coord: VoxelCoord) -> Option<VoxelRecord> {
        let removed = self.cells.remove(&coord)?;
        self.events.push(VoxelEvent::Dematerialize { coord });
        Some(removed)
    }

    /// Remove every voxel, signalling removal for each.
    pub fn clear(&mut self) {
        self.events.extend(
            self.cells
                .drain()
                .map(|(coord, _)| VoxelEvent::Dematerialize { coord }),
        );
    }

    /// Occupied voxels in unspecified order.
    pub fn values(&self) -> impl Iterator<Item = (VoxelCoord, &VoxelRecord)> + '_ {
        self.cells.iter().map(|(coord, record)| (*coord, record))
    }

    /// Occupied coordinates in ascending (x, y, z) order, for stable output.
    pub fn sorted_coords(&self) -> Vec<VoxelCoord> {
        let mut coords: Vec<VoxelCoord> = self.cells.keys().copied().collect();
        coords.sort_unstable();
        coords
    }

    /// Replace the whole contents with `other`'s, as one step.
    ///
    /// Old voxels are dematerialized and the new ones materialized; queued
    /// events of `other` are discarded in favour of the regenerated ones.
    pub fn replace_with(&mut self, other: VoxelGrid) {
        self.clear();
        self.cell_size = other.cell_size;
        self.cells = other.cells;
        let cell_size = self.cell_size;
        self.events.extend(self.cells.keys().map(|&coord| VoxelEvent::Materialize {
            coord,
            center: coord.center(cell_size),
        }));
    }

    /// Take all pending renderer signals, oldest first.
    pub fn drain_events(&mut self) -> Vec<VoxelEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    /// Coordinate adjacent to a hit face: the cell just outside the face at
    /// `point` along `normal`. Never the cell that owns the face.
    pub fn neighbor_for_hit(&self, point: Vec3, normal: IVec3) -> VoxelCoord {
        let nudged = point + normal.as_vec3() * (0.5 * self.cell_size);
        VoxelCoord::from_world(nudged, self.cell_size)
    }

    /// Placement target for a traversal hit. `None` when the ray started
    /// inside the hit voxel and there is no entered face.
    pub fn place_from_hit(&self, hit: &VoxelHit) -> Option<VoxelCoord> {
        (hit.normal != IVec3::ZERO).then(|| self.neighbor_for_hit(hit.world_pos, hit.normal))
    }

    /// Nearest occupied voxel along a ray (Amanatides-Woo traversal).
    pub fn raycast(&self, origin: Vec3, dir: Vec3, max_dist: f32) -> Option<VoxelHit> {
        let dir = dir.normalize_or_zero();
        if dir.length_squared() < 1e-8 || !(max_dist > 0.0 && max_dist.is_finite()) || self.cells.is_empty() {
            return None;
        }
        let size = self.cell_size;

        let mut cell = VoxelCoord::from_world(origin, size).as_ivec3();
        let step = IVec3::new(sign_i(dir.x), sign_i(dir.y), sign_i(dir.z));

        let mut t_max_x = dda_t_max(origin.x, dir.x, cell.x, step.x, size);
        let mut t_max_y = dda_t_max(origin.y, dir.y, cell.y, step.y, size);
        let mut t_max_z = dda_t_max(origin.z, dir.z, cell.z, step.z, size);
        let t_delta_x = dda_t_delta(dir.x, size);
        let t_delta_y = dda_t_delta(dir.y, size);
        let t_delta_z = dda_t_delta(dir.z, size);

        let mut t = 0.0f32;
        let mut hit_normal = IVec3::ZERO;
        let max_steps = ((max_dist / size).ceil().min(MAX_RAY_CELLS as f32) as usize)
            .saturating_mul(3)
            .saturating_add(4);

        for _ in 0..max_steps {
            let coord = VoxelCoord::from(cell);
            if self.cells.contains_key(&coord) {
                return Some(VoxelHit {
                    coord,
                    world_pos: origin + dir * t,
                    normal: hit_normal,
                    distance: t,
                });
            }

            if t_max_x <= t_max_y && t_max_x <= t_max_z {
                cell.x += step.x;
                t = t_max_x;
                t_max_x += t_delta_x;
                hit_normal = IVec3::new(-step.x, 0, 0);
            } else if t_max_y <= t_max_z {
                cell.y += step.y;
                t = t_max_y;
                t_max_y += t_delta_y;
                hit_normal = IVec3::new(0, -step.y, 0);
            } else {
                cell.z += step.z;
                t = t_max_z;
                t_max_z += t_delta_z;
                hit_normal = IVec3::new(0, 0, -step.z);
            }

            if t > max_dist {
                break;
            }
        }

        None
    }
}

/// Upper bound on cells crossed per axis by a single traversal.
pub const MAX_RAY_CELLS: usize = 1 << 16;

fn sign_i(v: f32) -> i32 {
    if v > 0.0 {
        1
    } else if v < 0.0 {
        -1
    } else {
        0
    }
}

fn dda_t_delta(dir_component: f32, cell_size: f32) -> f32 {
    if dir_component.abs() < 1e-6 {
        f32::INFINITY
    } else {
        cell_size / dir_component.abs()
    }
}

fn dda_t_max(origin_component: f32, dir_component: f32, cell: i32, step: i32, cell_size: f32) -> f32 {
    if step == 0 || dir_component.abs() < 1e-6 {
        return f32::INFINITY;
    }
    let boundary = if step > 0 {
        (cell as f32 + 1.0) * cell_size
    } else {
        cell as f32 * cell_size
    };
    (boundary - origin_component) / dir_component
}
