use std::fmt;

use roomview_control::ModelBindings;
use roomview_scene::{NodeId, SceneGraph};
use serde::Serialize;

/// Scene inspector for developer tooling.
pub struct SceneInspector;

impl SceneInspector {
    pub fn summary(scene: &SceneGraph) -> SceneSummary {
        let mut summary = SceneSummary {
            node_count: scene.len(),
            ..SceneSummary::default()
        };
        for id in scene.traverse(scene.root()) {
            let Some(node) = scene.get(id) else { continue };
            if let Some(mesh) = &node.mesh {
                summary.mesh_count += 1;
                summary.triangle_count += mesh.triangle_count();
            }
            if node.interactable {
                summary.interactable_count += 1;
            }
        }
        summary
    }

    pub fn inspect_node(scene: &SceneGraph, id: NodeId) -> Option<NodeInfo> {
        Self::node_info(scene, id, 0)
    }

    /// Every node in preorder, with its depth below the root.
    pub fn node_tree(scene: &SceneGraph) -> Vec<NodeInfo> {
        let mut out = Vec::with_capacity(scene.len());
        let mut stack = vec![(scene.root(), 0usize)];
        while let Some((id, depth)) = stack.pop() {
            let Some(info) = Self::node_info(scene, id, depth) else {
                continue;
            };
            out.push(info);
            if let Some(node) = scene.get(id) {
                for child in node.children().iter().rev() {
                    stack.push((*child, depth + 1));
                }
            }
        }
        tracing::trace!(nodes = out.len(), "node tree collected");
        out
    }

    /// Name the nodes a model bound to.
    pub fn binding_report(scene: &SceneGraph, bindings: &ModelBindings) -> BindingReport {
        let name = |id: Option<NodeId>| id.and_then(|id| scene.get(id)).map(|n| n.name.clone());
        let limbs = &bindings.limbs;
        BindingReport {
            character: name(bindings.rig.map(|rig| rig.root)),
            leg_left: name(limbs.leg_left),
            leg_right: name(limbs.leg_right),
            arm_left: name(limbs.arm_left),
            arm_right: name(limbs.arm_right),
            interactables: bindings
                .interactables
                .iter()
                .filter_map(|id| name(Some(*id)))
                .collect(),
            mesh_count: bindings.mesh_count,
        }
    }

    fn node_info(scene: &SceneGraph, id: NodeId, depth: usize) -> Option<NodeInfo> {
        let node = scene.get(id)?;
        let world = scene.world_position(id);
        let local = &node.local;
        Some(NodeInfo {
            id: id.0,
            name: node.name.clone(),
            depth,
            world_position: world.to_array(),
            local_position: local.position.to_array(),
            rotation: local.rotation.to_array(),
            scale: local.scale.to_array(),
            triangles: node.mesh.as_ref().map(|m| m.triangle_count()),
            interactable: node.interactable,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SceneSummary {
    pub node_count: usize,
    pub mesh_count: usize,
    pub triangle_count: usize,
    pub interactable_count: usize,
}

impl fmt::Display for SceneSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Scene: nodes={} meshes={} triangles={} interactable={}",
            self.node_count, self.mesh_count, self.triangle_count, self.interactable_count
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeInfo {
    pub id: u32,
    pub name: String,
    pub depth: usize,
    pub world_position: [f32; 3],
    pub local_position: [f32; 3],
    pub rotation: [f32; 4],
    pub scale: [f32; 3],
    /// Triangle count when the node carries a mesh.
    pub triangles: Option<usize>,
    pub interactable: bool,
}

impl fmt::Display for NodeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [x, y, z] = self.world_position;
        let indent = self.depth * 2;
        write!(f, "{:indent$}{} ({x:.2}, {y:.2}, {z:.2})", "", self.name)?;
        if let Some(tris) = self.triangles {
            write!(f, " [{tris} tris]")?;
        }
        if self.interactable {
            write!(f, " [interactable]")?;
        }
        Ok(())
    }
}

/// Which node names a model bound to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BindingReport {
    pub character: Option<String>,
    pub leg_left: Option<String>,
    pub leg_right: Option<String>,
    pub arm_left: Option<String>,
    pub arm_right: Option<String>,
    pub interactables: Vec<String>,
    pub mesh_count: usize,
}

impl fmt::Display for BindingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());
        writeln!(f, "character: {}", show(&self.character))?;
        writeln!(
            f,
            "limbs: legs {} / {}, arms {} / {}",
            show(&self.leg_left),
            show(&self.leg_right),
            show(&self.arm_left),
            show(&self.arm_right)
        )?;
        writeln!(f, "meshes: {}", self.mesh_count)?;
        write!(f, "interactable: [{}]", self.interactables.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use roomview_common::Transform;
    use roomview_control::bind_model;
    use roomview_scene::{MeshData, NodeTemplate};

    fn triangle() -> MeshData {
        MeshData {
            positions: vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            indices: vec![0, 1, 2],
            ..MeshData::default()
        }
    }

    fn room() -> NodeTemplate {
        let screen = NodeTemplate::new("Monitor_Panel_Screen").with_mesh(triangle());
        NodeTemplate::new("Room")
            .with_child(
                NodeTemplate::new("Steve_ROOT")
                    .with_transform(Transform::from_position(Vec3::new(1.0, 0.0, 0.0)))
                    .with_child(NodeTemplate::new("Pierna_L"))
                    .with_child(NodeTemplate::new("Brazo_R")),
            )
            .with_child(screen)
            .with_child(NodeTemplate::new("Desk").with_mesh(triangle()))
    }

    #[test]
    fn summary_empty_scene() {
        let scene = SceneGraph::new();
        let summary = SceneInspector::summary(&scene);
        assert_eq!(summary.node_count, 1);
        assert_eq!(summary.mesh_count, 0);
        assert!(summary.to_string().contains("nodes=1"));
    }

    #[test]
    fn summary_counts_meshes_and_interactables() {
        let mut scene = SceneGraph::new();
        bind_model(&mut scene, &room()).unwrap();
        let summary = SceneInspector::summary(&scene);
        assert_eq!(summary.node_count, 7);
        assert_eq!(summary.mesh_count, 2);
        assert_eq!(summary.triangle_count, 2);
        assert_eq!(summary.interactable_count, 1);
    }

    #[test]
    fn node_tree_is_preorder_with_depth() {
        let mut scene = SceneGraph::new();
        bind_model(&mut scene, &room()).unwrap();
        let tree = SceneInspector::node_tree(&scene);
        let names: Vec<_> = tree.iter().map(|n| (n.name.as_str(), n.depth)).collect();
        assert_eq!(
            names,
            vec![
                ("Scene", 0),
                ("Room", 1),
                ("Steve_ROOT", 2),
                ("Pierna_L", 3),
                ("Brazo_R", 3),
                ("Monitor_Panel_Screen", 2),
                ("Desk", 2),
            ]
        );
        assert_eq!(tree[3].world_position, [1.0, 0.0, 0.0]);
        assert!(tree[5].to_string().contains("[interactable]"));
    }

    #[test]
    fn binding_report_names_bound_nodes() {
        let mut scene = SceneGraph::new();
        let bindings = bind_model(&mut scene, &room()).unwrap();
        let report = SceneInspector::binding_report(&scene, &bindings);
        assert_eq!(report.character.as_deref(), Some("Steve_ROOT"));
        assert_eq!(report.leg_left.as_deref(), Some("Pierna_L"));
        assert_eq!(report.leg_right, None);
        assert_eq!(report.interactables, ["Monitor_Panel_Screen"]);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["mesh_count"], 2);
        assert!(report.to_string().contains("legs Pierna_L / -"));
    }

    #[test]
    fn inspect_single_node() {
        let mut scene = SceneGraph::new();
        bind_model(&mut scene, &room()).unwrap();
        let id = scene.find_by_name("Monitor_Panel_Screen").unwrap();
        let info = SceneInspector::inspect_node(&scene, id).unwrap();
        assert_eq!(info.name, "Monitor_Panel_Screen");
        assert_eq!(info.depth, 0);
        assert_eq!(info.triangles, Some(1));
        assert!(info.interactable);
        assert!(SceneInspector::inspect_node(&scene, NodeId(99)).is_none());
    }
}
