use glam::{Mat4, Vec3};
use roomview_common::Transform;
use serde::{Deserialize, Serialize};

use crate::raycast::{Aabb, Hit, Ray};

/// Index of a node inside a [`SceneGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

/// Triangle mesh in node-local space.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshData {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    /// Triangle list; three indices per face.
    pub indices: Vec<u32>,
    pub base_color: [f32; 4],
    /// Back faces are pickable only when set.
    pub double_sided: bool,
}

impl MeshData {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Local-space bounds, or `None` for a mesh without vertices.
    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(&self.positions)
    }

    /// Iterate the triangles as vertex triples, skipping out-of-range indices.
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).filter_map(|tri| {
            let a = *self.positions.get(tri[0] as usize)?;
            let b = *self.positions.get(tri[1] as usize)?;
            let c = *self.positions.get(tri[2] as usize)?;
            Some([a, b, c])
        })
    }
}

/// A node in the scene graph.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub local: Transform,
    pub mesh: Option<MeshData>,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
    /// Hover and click affordance tag.
    pub interactable: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(name: String, local: Transform, parent: Option<NodeId>) -> Self {
        Self {
            name,
            local,
            mesh: None,
            cast_shadow: false,
            receive_shadow: false,
            interactable: false,
            parent,
            children: Vec::new(),
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_mesh(&self) -> bool {
        self.mesh.is_some()
    }
}

/// Owned node tree, used to hand loaded models to the graph.
#[derive(Debug, Clone, Default)]
pub struct NodeTemplate {
    pub name: String,
    pub local: Transform,
    pub mesh: Option<MeshData>,
    pub children: Vec<NodeTemplate>,
}

impl NodeTemplate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_transform(mut self, local: Transform) -> Self {
        self.local = local;
        self
    }

    pub fn with_mesh(mut self, mesh: MeshData) -> Self {
        self.mesh = Some(mesh);
        self
    }

    pub fn with_child(mut self, child: NodeTemplate) -> Self {
        self.children.push(child);
        self
    }

    /// Number of nodes in this subtree, including itself.
    pub fn node_count(&self) -> usize {
        let below: usize = self.children.iter().map(NodeTemplate::node_count).sum();
        1 + below
    }
}

/// Errors from scene graph operations.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("unknown node: {0:?}")]
    UnknownNode(NodeId),
}

/// Arena-backed scene graph with a single root.
#[derive(Debug, Clone)]
pub struct SceneGraph {
    nodes: Vec<Node>,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    /// Create a graph holding only the root node.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new("Scene".into(), Transform::default(), None)],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        // The root is always present.
        false
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0 as usize)
    }

    /// Add an empty node under `parent`.
    pub fn add_node(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        local: Transform,
    ) -> Result<NodeId, SceneError> {
        if self.get(parent).is_none() {
            return Err(SceneError::UnknownNode(parent));
        }
        let id = NodeId(self.nodes.len() as u32);
        let node = Node::new(name.into(), local, Some(parent));
        self.nodes.push(node);
        self.nodes[parent.0 as usize].children.push(id);
        Ok(id)
    }

    /// Copy a template tree under `parent`. Returns the id of the subtree root.
    pub fn instantiate(
        &mut self,
        parent: NodeId,
        template: &NodeTemplate,
    ) -> Result<NodeId, SceneError> {
        let name = template.name.clone();
        let id = self.add_node(parent, name, template.local)?;
        self.nodes[id.0 as usize].mesh = template.mesh.clone();
        tracing::trace!(name = %template.name, ?id, "node instantiated");
        for child in &template.children {
            self.instantiate(id, child)?;
        }
        Ok(id)
    }

    /// Depth-first pre-order walk starting at (and including) `start`.
    pub fn traverse(&self, start: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if self.get(start).is_none() {
            return out;
        }
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            out.push(id);
            let node = &self.nodes[id.0 as usize];
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    /// First node in traversal order whose name matches exactly.
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.traverse(self.root())
            .into_iter()
            .find(|id| self.nodes[id.0 as usize].name == name)
    }

    /// Ids of every node carrying a mesh.
    pub fn mesh_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.is_mesh())
            .map(|(i, _)| NodeId(i as u32))
    }

    /// Local-to-world matrix of a node, composed through its ancestors.
    pub fn world_matrix(&self, id: NodeId) -> Mat4 {
        let mut matrix = Mat4::IDENTITY;
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let Some(node) = self.get(current) else {
                break;
            };
            matrix = node.local.matrix() * matrix;
            cursor = node.parent;
        }
        matrix
    }

    /// World-space position of a node's origin.
    pub fn world_position(&self, id: NodeId) -> Vec3 {
        self.world_matrix(id).transform_point3(Vec3::ZERO)
    }

    /// Intersect a world-space ray with every mesh. Nearest hit first.
    pub fn raycast(&self, ray: &Ray) -> Vec<Hit> {
        let mut hits = Vec::new();
        for id in self.mesh_nodes() {
            let node = &self.nodes[id.0 as usize];
            let Some(mesh) = &node.mesh else { continue };
            let world = self.world_matrix(id);
            // A collapsed axis has no inverse to pick through.
            if !world.inverse().is_finite() {
                continue;
            }
            if let Some(distance) = ray.intersect_mesh(mesh, world) {
                hits.push(Hit {
                    node: id,
                    distance,
                    point: ray.at(distance),
                });
            }
        }
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    /// Nearest mesh hit along the ray, if any.
    pub fn pick(&self, ray: &Ray) -> Option<Hit> {
        self.raycast(ray).into_iter().next()
    }
}
