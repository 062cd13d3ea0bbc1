use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Perspective camera orbiting a target, used to turn pointer positions
/// into world rays.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraState {
    pub eye: Vec3,
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            eye: Vec3::new(10.0, 15.0, -22.0),
            target: Vec3::ZERO,
            fov_degrees: 45.0,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl CameraState {
    /// Smallest angle between the view direction and the vertical.
    pub const MIN_POLAR: f32 = std::f32::consts::PI / 180.0;
    /// Largest angle; keeps the eye above the ground plane.
    pub const MAX_POLAR: f32 = 89.0 * std::f32::consts::PI / 180.0;

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_degrees.to_radians(),
            self.aspect,
            self.near,
            self.far,
        )
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Update the aspect ratio after a viewport resize.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
    }

    /// Rotate the eye around the target, keeping the distance.
    ///
    /// `d_yaw` turns around the vertical axis and `d_pitch` tilts towards the
    /// top view, both in radians. The angle from the vertical is clamped to
    /// `[MIN_POLAR, MAX_POLAR]` so the camera never flips or dips below the
    /// ground.
    pub fn orbit(&mut self, d_yaw: f32, d_pitch: f32) {
        let offset = self.eye - self.target;
        let radius = offset.length();
        if radius <= f32::EPSILON {
            return;
        }
        let yaw = offset.x.atan2(offset.z) + d_yaw;
        let polar = ((offset.y / radius).clamp(-1.0, 1.0).acos() - d_pitch)
            .clamp(Self::MIN_POLAR, Self::MAX_POLAR);
        self.eye = self.target
            + radius
                * Vec3::new(
                    polar.sin() * yaw.sin(),
                    polar.cos(),
                    polar.sin() * yaw.cos(),
                );
    }

    /// World-space ray through a point in normalized device coordinates.
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        let inv = self.view_projection().inverse();
        // glam's perspective_rh maps depth to [0, 1]
        let near = inv.project_point3(Vec3::new(ndc.x, ndc.y, 0.0));
        let far = inv.project_point3(Vec3::new(ndc.x, ndc.y, 1.0));
        Ray {
            origin: near,
            direction: (far - near).normalize(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Invisible square at `y = 0`, centered on the origin, that receives
/// pointer ray casts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundPlane {
    extent: f32,
}

impl GroundPlane {
    /// Name of the ray-cast target surface.
    pub const NAME: &'static str = "ground";

    pub fn new(extent: f32) -> Self {
        Self { extent }
    }

    pub fn extent(&self) -> f32 {
        self.extent
    }

    /// Point where `ray` meets the plane inside its extent, if any.
    pub fn intersect(&self, ray: &Ray) -> Option<Vec3> {
        if ray.direction.y.abs() < f32::EPSILON {
            return None;
        }
        let t = -ray.origin.y / ray.direction.y;
        if t < 0.0 {
            return None;
        }
        let mut hit = ray.at(t);
        hit.y = 0.0;
        let half = self.extent * 0.5;
        let inside = (-half..half).contains(&hit.x) && (-half..half).contains(&hit.z);
        inside.then_some(hit)
    }
}
