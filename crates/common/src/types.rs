use glam::{EulerRot, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Spatial transform: position, rotation, scale.
///
/// Local-space helpers mirror the usual scene-graph conventions: rotations
/// and translations are applied along the node's own axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Local-to-parent matrix.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Rotate about the node's own Y axis.
    pub fn rotate_local_y(&mut self, angle: f32) {
        self.rotation = (self.rotation * Quat::from_rotation_y(angle)).normalize();
    }

    /// Move along one of the node's own axes.
    pub fn translate_local(&mut self, axis: Vec3, distance: f32) {
        self.position += self.rotation * axis * distance;
    }

    /// X component of the rotation as XYZ Euler angles.
    pub fn euler_x(&self) -> f32 {
        self.rotation.to_euler(EulerRot::XYZ).0
    }

    /// Replace only the X Euler angle, keeping Y and Z.
    pub fn set_euler_x(&mut self, x: f32) {
        let (_, y, z) = self.rotation.to_euler(EulerRot::XYZ);
        self.rotation = Quat::from_euler(EulerRot::XYZ, x, y, z);
    }
}

/// Drawable surface size in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewportSize {
    pub width: u32,
    pub height: u32,
}

impl ViewportSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width over height, with a zero height treated as one pixel.
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn transform_default_is_identity() {
        let t = Transform::default();
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.rotation, Quat::IDENTITY);
        assert_eq!(t.scale, Vec3::ONE);
    }

    #[test]
    fn translate_follows_facing() {
        let mut t = Transform::default();
        t.rotate_local_y(FRAC_PI_2);
        t.translate_local(Vec3::Z, 2.0);
        // +Z rotated a quarter turn about Y points along +X
        assert!((t.position - Vec3::new(2.0, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn set_euler_x_keeps_other_axes() {
        let mut t = Transform {
            rotation: Quat::from_euler(EulerRot::XYZ, 0.0, 0.3, 0.1),
            ..Transform::default()
        };
        t.set_euler_x(0.25);
        let (x, y, z) = t.rotation.to_euler(EulerRot::XYZ);
        assert!((x - 0.25).abs() < 1e-5);
        assert!((y - 0.3).abs() < 1e-5);
        assert!((z - 0.1).abs() < 1e-5);
    }

    #[test]
    fn viewport_aspect_guards_zero_height() {
        assert_eq!(ViewportSize::new(1280, 720).aspect(), 1280.0 / 720.0);
        assert_eq!(ViewportSize::new(100, 0).aspect(), 100.0);
    }
}
