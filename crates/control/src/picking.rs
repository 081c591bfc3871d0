use glam::Vec2;
use roomview_common::ViewportSize;
use roomview_input::UiCommand;
use roomview_scene::{Ray, SceneGraph};

/// Cursor shown over the scene.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CursorIcon {
    #[default]
    Default,
    /// Hovering something clickable.
    Pointer,
}

/// Convert a cursor position in pixels (origin top-left) to normalized
/// device coordinates (origin center, +Y up).
pub fn pointer_to_ndc(x: f32, y: f32, viewport: ViewportSize) -> Vec2 {
    let width = viewport.width.max(1) as f32;
    let height = viewport.height.max(1) as f32;
    Vec2::new(x / width * 2.0 - 1.0, -(y / height) * 2.0 + 1.0)
}

/// Only the nearest hit counts; an interactable mesh behind other geometry
/// is not reachable.
fn nearest_is_interactable(scene: &SceneGraph, ray: &Ray) -> bool {
    scene
        .pick(ray)
        .and_then(|hit| scene.get(hit.node))
        .is_some_and(|node| node.interactable)
}

/// Cursor for a pointer-move ray.
pub fn hover(scene: &SceneGraph, ray: &Ray) -> CursorIcon {
    if nearest_is_interactable(scene, ray) {
        CursorIcon::Pointer
    } else {
        CursorIcon::Default
    }
}

/// Command triggered by a click ray, if any.
pub fn click(scene: &SceneGraph, ray: &Ray) -> Option<UiCommand> {
    if nearest_is_interactable(scene, ray) {
        tracing::debug!("interactable clicked");
        Some(UiCommand::OpenOverlay)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::bind_model;
    use glam::Vec3;
    use roomview_common::Transform;
    use roomview_scene::{MeshData, NodeTemplate};

    fn wall(z: f32) -> MeshData {
        MeshData {
            positions: vec![
                Vec3::new(-1.0, -1.0, z),
                Vec3::new(1.0, -1.0, z),
                Vec3::new(1.0, 1.0, z),
                Vec3::new(-1.0, 1.0, z),
            ],
            normals: vec![Vec3::Z; 4],
            indices: vec![0, 1, 2, 2, 3, 0],
            base_color: [1.0; 4],
            double_sided: false,
        }
    }

    /// Monitor straight ahead at z=-3, a plain box off to the right.
    fn room() -> SceneGraph {
        let template = NodeTemplate::new("Room")
            .with_child(NodeTemplate::new("Monitor_Panel").with_mesh(wall(-3.0)))
            .with_child(
                NodeTemplate::new("Shelf")
                    .with_transform(Transform::from_position(Vec3::new(5.0, 0.0, 0.0)))
                    .with_mesh(wall(-3.0)),
            );
        let mut scene = SceneGraph::new();
        bind_model(&mut scene, &template).unwrap();
        scene
    }

    fn ray_to(x: f32) -> Ray {
        Ray::new(Vec3::new(x, 0.0, 0.0), Vec3::NEG_Z)
    }

    #[test]
    fn ndc_corners_and_center() {
        let vp = ViewportSize::new(800, 600);
        assert_eq!(pointer_to_ndc(0.0, 0.0, vp), Vec2::new(-1.0, 1.0));
        assert_eq!(pointer_to_ndc(800.0, 600.0, vp), Vec2::new(1.0, -1.0));
        assert_eq!(pointer_to_ndc(400.0, 300.0, vp), Vec2::ZERO);
    }

    #[test]
    fn hover_over_monitor_shows_pointer() {
        let scene = room();
        assert_eq!(hover(&scene, &ray_to(0.0)), CursorIcon::Pointer);
    }

    #[test]
    fn hover_over_plain_geometry_or_nothing_is_default() {
        let scene = room();
        assert_eq!(hover(&scene, &ray_to(5.0)), CursorIcon::Default);
        assert_eq!(hover(&scene, &ray_to(50.0)), CursorIcon::Default);
    }

    #[test]
    fn click_on_monitor_opens_overlay() {
        let scene = room();
        assert_eq!(click(&scene, &ray_to(0.0)), Some(UiCommand::OpenOverlay));
        assert_eq!(click(&scene, &ray_to(5.0)), None);
        assert_eq!(click(&scene, &ray_to(50.0)), None);
    }

    #[test]
    fn occluded_monitor_is_not_clickable() {
        let mut scene = room();
        let root = scene.root();
        scene
            .instantiate(root, &NodeTemplate::new("Glass").with_mesh(wall(-1.0)))
            .unwrap();
        assert_eq!(click(&scene, &ray_to(0.0)), None);
        assert_eq!(hover(&scene, &ray_to(0.0)), CursorIcon::Default);
    }
}
