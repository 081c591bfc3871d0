use std::fmt::Write;

use glam::Vec3;
use roomview_scene::{NodeId, SceneGraph};

/// Camera/view configuration for rendering.
#[derive(Debug, Clone, Copy)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            eye: Vec3::new(3.0, 2.0, 3.0),
            target: Vec3::new(0.0, 1.0, 0.0),
            fov_degrees: 50.0,
        }
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads the scene graph and a view configuration, then
/// produces output. It never mutates the scene.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the given scene and view.
    fn render(&self, scene: &SceneGraph, view: &RenderView) -> Self::Output;
}

/// Human-readable dump of the scene graph.
///
/// One line per node, indented by depth, with world position and tags.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }

    fn write_node(&self, out: &mut String, scene: &SceneGraph, id: NodeId, depth: usize) {
        let Some(node) = scene.get(id) else { return };

        let p = scene.world_position(id);
        let mut tags = String::new();
        if let Some(mesh) = &node.mesh {
            let _ = write!(tags, " mesh({} tris)", mesh.triangle_count());
        }
        if node.cast_shadow || node.receive_shadow {
            tags.push_str(" shadow");
        }
        if node.interactable {
            tags.push_str(" interactable");
        }
        let _ = writeln!(
            out,
            "{:indent$}{} pos=({:.2}, {:.2}, {:.2}){}",
            "",
            node.name,
            p.x,
            p.y,
            p.z,
            tags,
            indent = depth * 2
        );

        for child in node.children() {
            self.write_node(out, scene, *child, depth + 1);
        }
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &SceneGraph, view: &RenderView) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "=== Scene (nodes={}, meshes={}) ===",
            scene.len(),
            scene.mesh_nodes().count()
        );
        let _ = writeln!(
            out,
            "Camera: eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1}) fov={:.0}",
            view.eye.x,
            view.eye.y,
            view.eye.z,
            view.target.x,
            view.target.y,
            view.target.z,
            view.fov_degrees
        );
        self.write_node(&mut out, scene, scene.root(), 0);
        tracing::trace!(bytes = out.len(), "debug frame rendered");
        out
    }
}
