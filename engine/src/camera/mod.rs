//! Camera Module
//!
//! Minimal look-at camera used to turn pointer positions into world rays.
//! Orbit/pan navigation is owned by the viewport; the session only needs the
//! current pose to cast rays.

pub mod raycast;

use glam::{Mat4, Vec2, Vec3};

pub use raycast::{Ray, get_ray_direction, ndc_from_screen, ray_plane_y, ray_triangle};

use crate::config::CameraConfig;

/// Look-at perspective camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    /// Vertical field of view in radians.
    pub fov: f32,
    /// Viewport width / height.
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}

impl Camera {
    pub fn from_config(config: &CameraConfig) -> Self {
        Self {
            position: Vec3::from_array(config.position),
            target: Vec3::from_array(config.target),
            fov: config.fov_degrees.to_radians(),
            aspect: config.aspect,
            near: 0.1,
            far: 1000.0,
        }
    }

    /// World ray from the camera through normalized device coordinates.
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        let dir = get_ray_direction(self.position, self.target, ndc, self.aspect, self.fov);
        Ray::new(self.position, dir)
    }

    /// Update the aspect ratio after a viewport resize.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_ray_matches_view_direction() {
        let camera = Camera {
            position: Vec3::new(0.0, 0.0, 5.0),
            target: Vec3::ZERO,
            ..Camera::default()
        };
        let ray = camera.ray_from_ndc(Vec2::ZERO);
        assert_eq!(ray.origin, camera.position);
        assert!((ray.direction - Vec3::NEG_Z).length() < 1e-6);
    }

    #[test]
    fn resize_ignores_zero_height() {
        let mut camera = Camera::default();
        camera.resize(800, 400);
        assert!((camera.aspect - 2.0).abs() < 1e-6);
        camera.resize(800, 0);
        assert!((camera.aspect - 2.0).abs() < 1e-6);
    }

    #[test]
    fn projected_center_ray_lands_at_screen_center() {
        let camera = Camera::default();
        let ray = camera.ray_from_ndc(Vec2::ZERO);
        let clip = camera.projection_matrix() * camera.view_matrix() * ray.at(5.0).extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-4 && ndc.y.abs() < 1e-4);
    }
}
