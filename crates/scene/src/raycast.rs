use glam::{Mat4, Vec3};

use crate::graph::{MeshData, NodeId};

const EPSILON: f32 = 1e-7;

/// Half-line with a unit direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

/// A ray/mesh intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub node: NodeId,
    /// Distance from the ray origin in world units.
    pub distance: f32,
    pub point: Vec3,
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn from_points(points: &[Vec3]) -> Option<Self> {
        let first = *points.first()?;
        let (min, max) = points
            .iter()
            .fold((first, first), |(lo, hi), p| (lo.min(*p), hi.max(*p)));
        Some(Self { min, max })
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }
}

impl Ray {
    /// Build a ray; the direction is normalized.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Nearest hit distance against a mesh placed by `world`.
    ///
    /// The ray is moved into mesh-local space so the mesh data is never
    /// transformed. The local direction keeps the world parameterization, so
    /// the returned `t` is a world distance.
    pub fn intersect_mesh(&self, mesh: &MeshData, world: Mat4) -> Option<f32> {
        let inverse = world.inverse();
        let origin = inverse.transform_point3(self.origin);
        let direction = inverse.transform_vector3(self.direction);

        let bounds = mesh.bounds()?;
        slab_test(origin, direction, &bounds)?;

        mesh.triangles()
            .filter_map(|[a, b, c]| {
                intersect_triangle(origin, direction, a, b, c, !mesh.double_sided)
            })
            .min_by(f32::total_cmp)
    }
}

/// Ray/AABB slab test. Returns the entry parameter (clamped to zero).
fn slab_test(origin: Vec3, direction: Vec3, bounds: &Aabb) -> Option<f32> {
    let inv_dir = Vec3::new(
        safe_recip(direction.x),
        safe_recip(direction.y),
        safe_recip(direction.z),
    );

    let t1 = (bounds.min - origin) * inv_dir;
    let t2 = (bounds.max - origin) * inv_dir;
    let tmin = t1.min(t2).max_element();
    let tmax = t1.max(t2).min_element();

    if tmax >= 0.0 && tmin <= tmax {
        Some(tmin.max(0.0))
    } else {
        None
    }
}

fn safe_recip(v: f32) -> f32 {
    if v.abs() > 1e-6 { 1.0 / v } else { f32::MAX }
}

/// Möller–Trumbore ray/triangle test.
fn intersect_triangle(
    origin: Vec3,
    direction: Vec3,
    a: Vec3,
    b: Vec3,
    c: Vec3,
    cull_back_faces: bool,
) -> Option<f32> {
    let edge1 = b - a;
    let edge2 = c - a;
    let p = direction.cross(edge2);
    let det = edge1.dot(p);

    // det > 0: counter-clockwise as seen from the origin (front face).
    if cull_back_faces {
        if det < EPSILON {
            return None;
        }
    } else if det.abs() < EPSILON {
        return None;
    }

    let inv_det = 1.0 / det;
    let s = origin - a;
    let u = s.dot(p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let q = s.cross(edge1);
    let v = direction.dot(q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = edge2.dot(q) * inv_det;
    (t >= 0.0).then_some(t)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle(double_sided: bool) -> MeshData {
        MeshData {
            positions: vec![
                Vec3::new(-1.0, -1.0, 0.0),
                Vec3::new(1.0, -1.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            normals: vec![Vec3::Z; 3],
            indices: vec![0, 1, 2],
            base_color: [1.0; 4],
            double_sided,
        }
    }

    #[test]
    fn front_face_hit_distance() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 3.0), Vec3::NEG_Z);
        let t = ray.intersect_mesh(&triangle(false), Mat4::IDENTITY);
        assert!((t.unwrap() - 3.0).abs() < 1e-5);
    }

    #[test]
    fn back_face_culled_unless_double_sided() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, -3.0), Vec3::Z);
        let single = ray.intersect_mesh(&triangle(false), Mat4::IDENTITY);
        let double = ray.intersect_mesh(&triangle(true), Mat4::IDENTITY);
        assert!(single.is_none());
        assert!(double.is_some());
    }

    #[test]
    fn miss_outside_triangle() {
        let ray = Ray::new(Vec3::new(5.0, 5.0, 3.0), Vec3::NEG_Z);
        let hit = ray.intersect_mesh(&triangle(true), Mat4::IDENTITY);
        assert!(hit.is_none());
    }

    #[test]
    fn behind_origin_is_not_a_hit() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 3.0), Vec3::Z);
        let hit = ray.intersect_mesh(&triangle(true), Mat4::IDENTITY);
        assert!(hit.is_none());
    }

    #[test]
    fn scaled_mesh_reports_world_distance() {
        let world = Mat4::from_scale(Vec3::splat(2.0));
        let ray = Ray::new(Vec3::new(0.0, 0.0, 4.0), Vec3::NEG_Z);
        let t = ray.intersect_mesh(&triangle(false), world).unwrap();
        assert!((t - 4.0).abs() < 1e-5);
    }

    #[test]
    fn aabb_from_points() {
        let points = [Vec3::new(1.0, -2.0, 0.0), Vec3::new(-1.0, 2.0, 4.0)];
        let bounds = Aabb::from_points(&points).unwrap();
        assert_eq!(bounds.min, Vec3::new(-1.0, -2.0, 0.0));
        assert_eq!(bounds.max, Vec3::new(1.0, 2.0, 4.0));
        assert_eq!(bounds.center(), Vec3::new(0.0, 0.0, 2.0));
        assert!(Aabb::from_points(&[]).is_none());
    }
}
