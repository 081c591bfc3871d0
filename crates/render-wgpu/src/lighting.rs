use glam::Vec3;

/// Convert one sRGB channel to linear.
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Linear RGB from a `0xRRGGBB` color.
pub fn hex_to_linear(hex: u32) -> Vec3 {
    let channel = |shift: u32| srgb_to_linear(((hex >> shift) & 0xff) as f32 / 255.0);
    Vec3::new(channel(16), channel(8), channel(0))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneLighting {
    /// Clear color, also used as the fog color.
    pub background: Vec3,
    pub fog_near: f32,
    pub fog_far: f32,
    pub sky_color: Vec3,
    pub ground_color: Vec3,
    pub hemisphere_intensity: f32,
    /// Position of the directional light; it shines toward the origin.
    pub sun_position: Vec3,
    pub sun_color: Vec3,
    pub sun_intensity: f32,
    pub point_position: Vec3,
    pub point_color: Vec3,
    pub point_intensity: f32,
    pub point_range: f32,
    pub exposure: f32,
}

impl Default for SceneLighting {
    fn default() -> Self {
        Self {
            background: hex_to_linear(0x050505),
            fog_near: 5.0,
            fog_far: 25.0,
            sky_color: Vec3::ONE,
            ground_color: hex_to_linear(0x444444),
            hemisphere_intensity: 0.6,
            sun_position: Vec3::new(5.0, 10.0, 7.0),
            sun_color: Vec3::ONE,
            sun_intensity: 1.5,
            point_position: Vec3::new(0.0, 2.0, 0.0),
            point_color: hex_to_linear(0x0055ff),
            point_intensity: 5.0,
            point_range: 10.0,
            exposure: 1.2,
        }
    }
}

impl SceneLighting {
    pub fn clear_color(&self) -> wgpu::Color {
        wgpu::Color {
            r: self.background.x as f64,
            g: self.background.y as f64,
            b: self.background.z as f64,
            a: 1.0,
        }
    }

    pub fn sun_direction(&self) -> Vec3 {
        self.sun_position.normalize_or_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn srgb_endpoints() {
        assert_eq!(srgb_to_linear(0.0), 0.0);
        assert!((srgb_to_linear(1.0) - 1.0).abs() < 1e-6);
        assert!(srgb_to_linear(0.5) < 0.5);
    }

    #[test]
    fn gamer_light_is_blue() {
        let blue = hex_to_linear(0x0055ff);
        assert_eq!(blue.x, 0.0);
        assert!((blue.z - 1.0).abs() < 1e-6);
        assert!(blue.y > 0.0 && blue.y < blue.z);
    }

    #[test]
    fn default_look() {
        let lighting = SceneLighting::default();
        assert_eq!(lighting.fog_near, 5.0);
        assert_eq!(lighting.fog_far, 25.0);
        assert_eq!(lighting.exposure, 1.2);
        let clear = lighting.clear_color();
        assert!(clear.r > 0.0 && clear.r < 0.01);
        assert!((lighting.sun_direction().length() - 1.0).abs() < 1e-6);
    }
}
