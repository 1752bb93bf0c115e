//! Sculpt Engine
//!
//! Radius brush that pushes mesh vertices along the surface normal of the
//! picked triangle with a linear falloff, then refreshes normals for the
//! displaced vertices only.
//!
//! Input is reduced to three signals: `begin_stroke` (pointer down),
//! `sample` (pointer move) and `end_stroke` (pointer up). Missing targets and
//! missed rays are reported through [`SampleOutcome`], never as errors.

use std::collections::BTreeSet;

use glam::{Mat4, Vec3};

use crate::camera::{Ray, ray_triangle};
use crate::config::BrushConfig;
use crate::mesh::{Mesh, TopologyIndex, face_normal, recompute_subset};

// ============================================================================
// BRUSH SETTINGS
// ============================================================================

/// Brush parameters, usually bound to UI sliders.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushSettings {
    /// World-space radius. Vertices at distance >= radius are untouched.
    pub radius: f32,
    /// Displacement at the brush center per sample (negative pushes inward)
    pub strength: f32,
    /// Refresh normals of the one-ring around displaced vertices as well
    pub refresh_neighbor_normals: bool,
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self::from(&BrushConfig::default())
    }
}

impl From<&BrushConfig> for BrushSettings {
    fn from(config: &BrushConfig) -> Self {
        Self {
            radius: config.radius,
            strength: config.strength,
            refresh_neighbor_normals: config.refresh_neighbor_normals,
        }
    }
}

impl BrushSettings {
    /// Displacement scale at world distance `distance` from the brush center,
    /// or `None` outside the brush.
    #[inline]
    pub fn falloff(&self, distance: f32) -> Option<f32> {
        (distance < self.radius).then(|| self.strength * (1.0 - distance / self.radius))
    }
}

// ============================================================================
// TARGET
// ============================================================================

/// Surface point picked by the brush ray, in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushHit {
    pub center: Vec3,
    /// Unit face normal of the hit triangle
    pub normal: Vec3,
    pub triangle: usize,
    pub distance: f32,
}

/// A mesh bound for sculpting, with its cached topology and placement.
#[derive(Debug, Clone)]
pub struct SculptTarget {
    mesh: Mesh,
    topology: TopologyIndex,
    transform: Mat4,
    inverse: Mat4,
}

impl SculptTarget {
    /// Bind `mesh` placed in the world by `transform`.
    pub fn new(mesh: Mesh, transform: Mat4) -> Self {
        let topology = TopologyIndex::build(&mesh);
        let mut target = Self {
            mesh,
            topology,
            transform: Mat4::IDENTITY,
            inverse: Mat4::IDENTITY,
        };
        target.set_transform(transform);
        target
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn topology(&self) -> &TopologyIndex {
        &self.topology
    }

    pub fn transform(&self) -> Mat4 {
        self.transform
    }

    /// Move the mesh. A non-invertible transform is ignored.
    pub fn set_transform(&mut self, transform: Mat4) {
        let det = transform.determinant();
        if !det.is_finite() || det.abs() < 1e-12 {
            log::warn!("ignoring non-invertible sculpt target transform");
            return;
        }
        self.transform = transform;
        self.inverse = transform.inverse();
    }

    pub fn into_mesh(self) -> Mesh {
        self.mesh
    }

    /// Nearest triangle hit by `ray`, in world space.
    pub fn raycast(&self, ray: &Ray) -> Option<BrushHit> {
        if !ray.is_valid() {
            return None;
        }
        let mut best: Option<BrushHit> = None;
        for t in 0..self.mesh.triangle_count() {
            let local = self.mesh.triangle_positions(t);
            let [a, b, c] = local.map(|p| self.transform.transform_point3(p));
            let Some(dist) = ray_triangle(ray, a, b, c) else {
                continue;
            };
            if best.is_some_and(|hit| hit.distance <= dist) {
                continue;
            }
            // Inverse transpose keeps the face orientation under mirrored placements.
            let [la, lb, lc] = local;
            let normal = self
                .inverse
                .transpose()
                .transform_vector3(face_normal(la, lb, lc))
                .normalize_or_zero();
            best = Some(BrushHit {
                center: ray.at(dist),
                normal,
                triangle: t,
                distance: dist,
            });
        }
        best
    }
}

// ============================================================================
// STROKE STATE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum StrokeState {
    #[default]
    Idle,
    Active {
        last_hit: BrushHit,
    },
}

/// What a brush signal did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleOutcome {
    /// No stroke in progress; the sample was ignored.
    NotActive,
    /// No mesh bound.
    NoTarget,
    /// The ray missed the mesh.
    Missed,
    /// The brush ran and moved `displaced` vertices.
    Applied { displaced: usize },
}

// ============================================================================
// SCULPT ENGINE
// ============================================================================

#[derive(Debug, Default)]
pub struct SculptEngine {
    pub settings: BrushSettings,
    state: StrokeState,
    /// Vertices whose position or normal changed since the last upload
    dirty: BTreeSet<u32>,
}

impl SculptEngine {
    pub fn new(settings: BrushSettings) -> Self {
        Self {
            settings,
            state: StrokeState::Idle,
            dirty: BTreeSet::new(),
        }
    }

    pub fn state(&self) -> StrokeState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, StrokeState::Active { .. })
    }

    /// Pointer down. Starts a stroke and applies the first sample when the
    /// ray hits the target; otherwise the engine returns to idle.
    pub fn begin_stroke(&mut self, target: Option<&mut SculptTarget>, ray: &Ray) -> SampleOutcome {
        self.state = StrokeState::Idle;
        let Some(target) = target else {
            return SampleOutcome::NoTarget;
        };
        let Some(hit) = target.raycast(ray) else {
            return SampleOutcome::Missed;
        };
        log::debug!("sculpt stroke started on triangle {}", hit.triangle);
        self.state = StrokeState::Active { last_hit: hit };
        self.apply_hit(target, hit)
    }

    /// Pointer move. A miss skips the sample and keeps the stroke alive.
    pub fn sample(&mut self, target: Option<&mut SculptTarget>, ray: &Ray) -> SampleOutcome {
        if !self.is_active() {
            return SampleOutcome::NotActive;
        }
        let Some(target) = target else {
            return SampleOutcome::NoTarget;
        };
        let Some(hit) = target.raycast(ray) else {
            return SampleOutcome::Missed;
        };
        self.state = StrokeState::Active { last_hit: hit };
        self.apply_hit(target, hit)
    }

    /// Pointer up. Returns whether a stroke was in progress.
    pub fn end_stroke(&mut self) -> bool {
        let was_active = self.is_active();
        self.state = StrokeState::Idle;
        if was_active {
            log::debug!("sculpt stroke ended, {} dirty vertices", self.dirty.len());
        }
        was_active
    }

    fn apply_hit(&mut self, target: &mut SculptTarget, hit: BrushHit) -> SampleOutcome {
        let displaced = self.apply_brush(target, hit.center, hit.normal);
        SampleOutcome::Applied {
            displaced: displaced.len(),
        }
    }

    /// Displace every vertex within the brush of world point `center` along
    /// world direction `normal`, then refresh normals for the displaced set.
    /// Returns the displaced vertex indices in ascending order.
    pub fn apply_brush(&mut self, target: &mut SculptTarget, center: Vec3, normal: Vec3) -> Vec<u32> {
        let settings = self.settings;
        let transform = target.transform;
        let inverse = target.inverse;

        let mut displaced = Vec::new();
        for (i, p) in target.mesh.positions_mut().iter_mut().enumerate() {
            let world = transform.transform_point3(*p);
            let Some(amount) = settings.falloff(world.distance(center)) else {
                continue;
            };
            *p += inverse.transform_vector3(normal * amount);
            displaced.push(i as u32);
        }

        if displaced.is_empty() {
            log::trace!("brush at {center} touched no vertices");
            return displaced;
        }

        let refreshed = if settings.refresh_neighbor_normals {
            target.topology.expand_one_ring(&displaced)
        } else {
            displaced.clone()
        };
        recompute_subset(&mut target.mesh, &target.topology, &refreshed);
        self.dirty.extend(refreshed.iter().copied());

        log::trace!(
            "brush at {center}: {} displaced, {} normals refreshed",
            displaced.len(),
            refreshed.len()
        );
        displaced
    }

    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    pub fn clear_dirty(&mut self) {
        self.dirty.clear();
    }

    /// Vertices the renderer must re-upload, ascending. Clears the dirty set.
    pub fn take_dirty_vertices(&mut self) -> Vec<u32> {
        std::mem::take(&mut self.dirty).into_iter().collect()
    }
}
