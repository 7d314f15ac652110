//! Visual-side state shared with the web front-end.
//!
//! These types avoid platform APIs so the projection math stays host-testable.

use glam::{Mat4, Vec2, Vec3};

use crate::constants::{PARTICLE_CAMERA_FOV_DEG, PARTICLE_CAMERA_Z};

/// Right-handed perspective camera looking at the origin.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    /// The particle-text camera: eye on +Z, vertical fov 50 degrees.
    pub fn particle_default(aspect: f32) -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, PARTICLE_CAMERA_Z),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect,
            fovy_radians: PARTICLE_CAMERA_FOV_DEG.to_radians(),
            znear: 0.1,
            zfar: 1000.0,
        }
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// World point to pixel coordinates (y down) on a `size` viewport, or
    /// `None` when the point is behind the camera or outside the frustum depth.
    pub fn project(view_proj: &Mat4, p: Vec3, size: Vec2) -> Option<Vec2> {
        let clip = *view_proj * p.extend(1.0);
        if clip.w <= 1e-6 {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        if !(-1.0..=1.0).contains(&ndc.z) {
            return None;
        }
        Some(Vec2::new(
            (ndc.x * 0.5 + 0.5) * size.x,
            (1.0 - (ndc.y * 0.5 + 0.5)) * size.y,
        ))
    }

    /// Pixels per world unit at depth `z` (for sizing point sprites).
    pub fn pixels_per_unit(&self, z: f32, viewport_height: f32) -> f32 {
        let dist = (self.eye.z - z).max(1e-3);
        viewport_height / (2.0 * dist * (self.fovy_radians * 0.5).tan())
    }
}
