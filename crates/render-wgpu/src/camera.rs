use glam::{Mat4, Vec2, Vec3, Vec4};
use roomview_common::ViewportSize;
use roomview_scene::Ray;

/// Camera orbiting a target point, with damped rotation and wheel zoom.
///
/// Spherical coordinates: `theta` around +Y measured from +Z, `phi` down
/// from +Y.
pub struct OrbitCamera {
    pub target: Vec3,
    pub radius: f32,
    pub theta: f32,
    pub phi: f32,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub damping_factor: f32,
    pub enable_damping: bool,
    pub min_distance: f32,
    pub max_distance: f32,
    rotate_delta: Vec2,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::looking_at(Vec3::new(3.0, 2.0, 3.0), Vec3::new(0.0, 1.0, 0.0))
    }
}

impl OrbitCamera {
    /// Place the camera at `eye`, orbiting `target`.
    pub fn looking_at(eye: Vec3, target: Vec3) -> Self {
        let offset = eye - target;
        let radius = offset.length().max(1e-4);
        Self {
            target,
            radius,
            theta: offset.x.atan2(offset.z),
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
            fov: 50.0_f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 100.0,
            rotate_speed: 1.0,
            zoom_speed: 0.05,
            damping_factor: 0.05,
            enable_damping: true,
            min_distance: 0.5,
            max_distance: 50.0,
            rotate_delta: Vec2::ZERO,
        }
    }

    pub fn position(&self) -> Vec3 {
        let (sin_phi, cos_phi) = self.phi.sin_cos();
        let (sin_theta, cos_theta) = self.theta.sin_cos();
        self.target
            + Vec3::new(
                self.radius * sin_phi * sin_theta,
                self.radius * cos_phi,
                self.radius * sin_phi * cos_theta,
            )
    }

    /// Queue rotation from a pointer drag of `delta` pixels.
    pub fn drag(&mut self, delta: Vec2, screen_height: f32) {
        let rotate_per_pixel = std::f32::consts::TAU / screen_height.max(1.0);
        self.rotate_delta -= delta * rotate_per_pixel * self.rotate_speed;
    }

    /// Zoom by wheel steps; positive moves closer.
    pub fn zoom(&mut self, steps: f32) {
        if steps == 0.0 {
            return;
        }
        let scale = (1.0 - self.zoom_speed).powf(steps.abs());
        if steps > 0.0 {
            self.radius *= scale;
        } else {
            self.radius /= scale;
        }
        self.radius = self.radius.clamp(self.min_distance, self.max_distance);
    }

    /// Apply queued rotation. With damping, a share of the remaining
    /// rotation is applied each frame, normalized to 60 fps.
    pub fn update(&mut self, dt: f32) {
        if self.enable_damping {
            let retention = (1.0 - self.damping_factor).powf(dt * 60.0);
            let applied = self.rotate_delta * (1.0 - retention);
            self.theta += applied.x;
            self.phi += applied.y;
            self.rotate_delta *= retention;
        } else {
            self.theta += self.rotate_delta.x;
            self.phi += self.rotate_delta.y;
            self.rotate_delta = Vec2::ZERO;
        }

        const EPS: f32 = 1e-4;
        self.phi = self.phi.clamp(EPS, std::f32::consts::PI - EPS);
    }

    /// Follow a surface resize.
    pub fn set_viewport(&mut self, size: ViewportSize) {
        self.aspect = size.aspect();
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// World-space ray from the eye through a point in normalized device
    /// coordinates. Geometry closer than the near plane is still hit.
    pub fn ray_through(&self, ndc: Vec2) -> Ray {
        let inv_vp = self.view_projection().inverse();
        // wgpu clip space: depth 0 at the near plane, 1 at the far plane.
        let near = inv_vp * Vec4::new(ndc.x, ndc.y, 0.0, 1.0);
        let far = inv_vp * Vec4::new(ndc.x, ndc.y, 1.0, 1.0);
        let near = near.truncate() / near.w;
        let far = far.truncate() / far.w;
        Ray::new(self.position(), far - near)
    }
}
