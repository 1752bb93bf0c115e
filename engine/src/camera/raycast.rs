//! Raycast Module
//!
//! Ray construction from normalized device coordinates and the hit primitives
//! used for pointer picking: ray/plane and ray/triangle.

use glam::{Vec2, Vec3};

/// Minimum ray parameter accepted as a hit, to avoid self-intersection.
pub const RAY_EPSILON: f32 = 1e-6;

/// A half-line `origin + t * direction`, `t >= 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length direction.
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray; `direction` is normalized. A zero direction yields a ray
    /// that never hits anything.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Point at parameter `t` along the ray.
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Whether the ray has a usable direction.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.direction != Vec3::ZERO && self.origin.is_finite()
    }
}

/// Calculate a world-space ray direction through normalized device coordinates.
///
/// # Arguments
/// * `camera_pos` - Camera position in world space
/// * `camera_target` - Point the camera is looking at
/// * `ndc` - Normalized device coordinates, x right and y up, both in [-1, 1]
/// * `aspect_ratio` - Screen aspect ratio (width / height)
/// * `fov` - Vertical field of view in radians
///
/// # Returns
/// Normalized ray direction in world space
pub fn get_ray_direction(
    camera_pos: Vec3,
    camera_target: Vec3,
    ndc: Vec2,
    aspect_ratio: f32,
    fov: f32,
) -> Vec3 {
    let half_fov = (fov * 0.5_f32).tan();

    let forward = (camera_target - camera_pos).normalize_or_zero();
    let up_world = Vec3::Y;

    // Looking straight up or down: use world X as the right reference
    let (right, up) = if forward.y.abs() > 0.99 {
        let right = Vec3::X;
        let up = right.cross(forward).normalize();
        (right, up)
    } else {
        let right = forward.cross(up_world).normalize();
        let up = right.cross(forward);
        (right, up)
    };

    (forward + right * ndc.x * aspect_ratio * half_fov + up * ndc.y * half_fov).normalize_or_zero()
}

/// Convert pixel coordinates (origin top-left, y down) to NDC (y up).
pub fn ndc_from_screen(screen_x: f32, screen_y: f32, screen_width: f32, screen_height: f32) -> Vec2 {
    Vec2::new(
        (2.0 * screen_x / screen_width) - 1.0,
        1.0 - (2.0 * screen_y / screen_height),
    )
}

/// Intersect a ray with the horizontal plane `y = plane_height`.
///
/// Returns the ray parameter of the hit, or `None` if the ray is parallel to
/// the plane or the plane lies behind the origin.
pub fn ray_plane_y(ray: &Ray, plane_height: f32) -> Option<f32> {
    if ray.direction.y.abs() < 0.0001 {
        return None;
    }

    let t = (plane_height - ray.origin.y) / ray.direction.y;
    if t < 0.0 {
        return None;
    }

    Some(t)
}

/// Intersect a ray with triangle (a, b, c), two-sided (Moller-Trumbore).
///
/// Returns the ray parameter of the hit. Degenerate triangles never hit.
pub fn ray_triangle(ray: &Ray, a: Vec3, b: Vec3, c: Vec3) -> Option<f32> {
    let edge1 = b - a;
    let edge2 = c - a;
    let p = ray.direction.cross(edge2);
    let det = edge1.dot(p);
    if det.abs() < 1e-9 {
        return None;
    }
    let inv_det = 1.0 / det;

    let s = ray.origin - a;
    let u = s.dot(p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = ray.direction.dot(q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = edge2.dot(q) * inv_det;
    (t > RAY_EPSILON).then_some(t)
}
