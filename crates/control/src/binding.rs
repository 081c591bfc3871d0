use roomview_scene::{NodeId, NodeTemplate, SceneError, SceneGraph};

use crate::character::{CharacterRig, Limbs};

/// Exact name of the character root node.
pub const CHARACTER_ROOT: &str = "Steve_ROOT";

/// A mesh whose name contains one of these is tagged interactable.
pub const INTERACTABLE_MARKERS: [&str; 2] = ["Monitor_Panel", "Monitor_Body"];

/// Exact limb node names.
pub struct LimbNames;

impl LimbNames {
    pub const LEG_LEFT: &'static str = "Pierna_L";
    pub const LEG_RIGHT: &'static str = "Pierna_R";
    pub const ARM_LEFT: &'static str = "Brazo_L";
    pub const ARM_RIGHT: &'static str = "Brazo_R";
}

/// What a model exposed once it was placed in the scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelBindings {
    /// Top node of the inserted model.
    pub model_root: NodeId,
    /// Present only if the character root was found.
    pub rig: Option<CharacterRig>,
    /// Limbs found during traversal, even without a character root.
    pub limbs: Limbs,
    pub interactables: Vec<NodeId>,
    pub mesh_count: usize,
}

/// Insert a loaded model under the scene root and bind it.
pub fn bind_model(
    scene: &mut SceneGraph,
    model: &NodeTemplate,
) -> Result<ModelBindings, SceneError> {
    let root = scene.root();
    let model_root = scene.instantiate(root, model)?;
    let bindings = bind_subtree(scene, model_root);

    match &bindings.rig {
        Some(rig) => tracing::info!(
            "character found: {} of 4 limbs bound",
            rig.limbs.bound_count()
        ),
        None => tracing::warn!("no {CHARACTER_ROOT} node; character control disabled"),
    }
    tracing::info!(
        "model bound: {} meshes, {} interactable",
        bindings.mesh_count,
        bindings.interactables.len()
    );
    Ok(bindings)
}

/// Walk a subtree once: bind the character and limbs by exact name, enable
/// shadows on every mesh, and tag interactable meshes by name substring.
///
/// When a name occurs more than once, the last node in traversal order wins.
pub fn bind_subtree(scene: &mut SceneGraph, start: NodeId) -> ModelBindings {
    let mut character = None;
    let mut limbs = Limbs::default();
    let mut interactables = Vec::new();
    let mut mesh_count = 0;

    for id in scene.traverse(start) {
        let Some(node) = scene.get_mut(id) else {
            continue;
        };

        match node.name.as_str() {
            CHARACTER_ROOT => character = Some(id),
            LimbNames::LEG_LEFT => limbs.leg_left = Some(id),
            LimbNames::LEG_RIGHT => limbs.leg_right = Some(id),
            LimbNames::ARM_LEFT => limbs.arm_left = Some(id),
            LimbNames::ARM_RIGHT => limbs.arm_right = Some(id),
            _ => {}
        }

        if node.is_mesh() {
            mesh_count += 1;
            node.cast_shadow = true;
            node.receive_shadow = true;

            if INTERACTABLE_MARKERS.iter().any(|m| node.name.contains(m)) {
                node.interactable = true;
                interactables.push(id);
            }
        }
    }

    ModelBindings {
        model_root: start,
        rig: character.map(|root| CharacterRig { root, limbs }),
        limbs,
        interactables,
        mesh_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use roomview_scene::MeshData;

    fn mesh() -> MeshData {
        MeshData {
            positions: vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            normals: vec![Vec3::Z; 3],
            indices: vec![0, 1, 2],
            base_color: [1.0; 4],
            double_sided: false,
        }
    }

    fn room() -> NodeTemplate {
        NodeTemplate::new("Room")
            .with_child(
                NodeTemplate::new(CHARACTER_ROOT)
                    .with_child(NodeTemplate::new("Pierna_L").with_mesh(mesh()))
                    .with_child(NodeTemplate::new("Pierna_R").with_mesh(mesh()))
                    .with_child(NodeTemplate::new("Brazo_L").with_mesh(mesh()))
                    .with_child(NodeTemplate::new("Brazo_R").with_mesh(mesh())),
            )
            .with_child(NodeTemplate::new("Monitor_Panel.001").with_mesh(mesh()))
            .with_child(NodeTemplate::new("PC_Monitor_Body").with_mesh(mesh()))
            .with_child(NodeTemplate::new("Monitor_Stand").with_mesh(mesh()))
            // Name matches but no mesh: never interactable.
            .with_child(NodeTemplate::new("Monitor_Panel_Empty"))
    }

    #[test]
    fn binds_character_and_limbs() {
        let mut scene = SceneGraph::new();
        let bindings = bind_model(&mut scene, &room()).unwrap();

        let rig = bindings.rig.unwrap();
        assert_eq!(scene.get(rig.root).unwrap().name, CHARACTER_ROOT);
        assert_eq!(rig.limbs.bound_count(), 4);
        let arm = rig.limbs.arm_right.unwrap();
        assert_eq!(scene.get(arm).unwrap().name, "Brazo_R");
        assert_eq!(scene.get(bindings.model_root).unwrap().name, "Room");
    }

    #[test]
    fn tags_monitor_meshes_by_substring() {
        let mut scene = SceneGraph::new();
        let bindings = bind_model(&mut scene, &room()).unwrap();

        let names: Vec<&str> = bindings
            .interactables
            .iter()
            .map(|id| scene.get(*id).unwrap().name.as_str())
            .collect();
        assert_eq!(names, ["Monitor_Panel.001", "PC_Monitor_Body"]);

        let stand = scene.find_by_name("Monitor_Stand").unwrap();
        assert!(!scene.get(stand).unwrap().interactable);
        let empty = scene.find_by_name("Monitor_Panel_Empty").unwrap();
        assert!(!scene.get(empty).unwrap().interactable);
    }

    #[test]
    fn every_mesh_casts_and_receives_shadows() {
        let mut scene = SceneGraph::new();
        let bindings = bind_model(&mut scene, &room()).unwrap();
        assert_eq!(bindings.mesh_count, 7);
        for id in scene.mesh_nodes().collect::<Vec<_>>() {
            let node = scene.get(id).unwrap();
            assert!(node.cast_shadow && node.receive_shadow);
        }
        let group = scene.find_by_name("Room").unwrap();
        assert!(!scene.get(group).unwrap().cast_shadow);
    }

    #[test]
    fn model_without_character_binds_nothing_to_control() {
        let template = NodeTemplate::new("Room")
            .with_child(NodeTemplate::new("Pierna_L"))
            .with_child(NodeTemplate::new("Desk").with_mesh(mesh()));
        let mut scene = SceneGraph::new();
        let bindings = bind_model(&mut scene, &template).unwrap();
        assert!(bindings.rig.is_none());
        assert!(bindings.limbs.leg_left.is_some());
        assert!(bindings.interactables.is_empty());
    }

    #[test]
    fn last_duplicate_name_wins() {
        let template = NodeTemplate::new("Room")
            .with_child(NodeTemplate::new(CHARACTER_ROOT))
            .with_child(NodeTemplate::new(CHARACTER_ROOT));
        let mut scene = SceneGraph::new();
        let bindings = bind_model(&mut scene, &template).unwrap();
        let last = *scene.traverse(bindings.model_root).last().unwrap();
        assert_eq!(bindings.rig.unwrap().root, last);
    }
}
