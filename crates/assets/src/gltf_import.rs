use std::path::Path;

use glam::{Quat, Vec3};
use roomview_common::Transform;
use roomview_scene::{MeshData, NodeTemplate};

use crate::AssetError;

/// A loaded model: the root nodes of its scene as templates.
#[derive(Debug, Clone, Default)]
pub struct Model {
    pub name: String,
    pub roots: Vec<NodeTemplate>,
}

impl Model {
    pub fn node_count(&self) -> usize {
        self.roots.iter().map(NodeTemplate::node_count).sum()
    }

    /// Wrap the roots under a single group node named after the model.
    pub fn into_template(self) -> NodeTemplate {
        NodeTemplate {
            name: self.name,
            children: self.roots,
            ..NodeTemplate::default()
        }
    }
}

/// Load a .glb/.gltf file.
///
/// Uses the default scene, or the first scene if none is marked default.
/// A node carrying a single-primitive mesh becomes a mesh node. A node
/// whose mesh has several primitives becomes a group with one child per
/// primitive, named after the mesh.
pub fn load_model(path: impl AsRef<Path>) -> Result<Model, AssetError> {
    let path = path.as_ref();
    let (document, buffers, _images) = gltf::import(path)?;

    let scene = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .ok_or(AssetError::NoScene)?;

    let roots = scene
        .nodes()
        .map(|node| import_node(&node, &buffers))
        .collect::<Result<Vec<_>, _>>()?;

    let model = Model {
        name: path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("model")
            .to_string(),
        roots,
    };

    tracing::info!(
        "loaded model {}: {} nodes from {}",
        model.name,
        model.node_count(),
        path.display()
    );
    Ok(model)
}

fn import_node(
    node: &gltf::Node,
    buffers: &[gltf::buffer::Data],
) -> Result<NodeTemplate, AssetError> {
    let (translation, rotation, scale) = node.transform().decomposed();
    let name = node
        .name()
        .map(str::to_string)
        .unwrap_or_else(|| format!("node_{}", node.index()));

    let mut template = NodeTemplate::new(name).with_transform(Transform {
        position: Vec3::from(translation),
        rotation: Quat::from_array(rotation),
        scale: Vec3::from(scale),
    });

    if let Some(mesh) = node.mesh() {
        let mesh_name = mesh
            .name()
            .map(str::to_string)
            .unwrap_or_else(|| template.name.clone());
        let mut parts = Vec::new();
        for primitive in mesh.primitives() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                tracing::debug!("skipping non-triangle primitive in {mesh_name}");
                continue;
            }
            parts.push(import_primitive(&primitive, buffers, &mesh_name)?);
        }

        if parts.len() == 1 {
            template.mesh = parts.pop();
        } else {
            for (i, part) in parts.into_iter().enumerate() {
                let child = NodeTemplate::new(format!("{mesh_name}_{i}")).with_mesh(part);
                template.children.push(child);
            }
        }
    }

    for child in node.children() {
        template.children.push(import_node(&child, buffers)?);
    }

    Ok(template)
}

fn import_primitive(
    primitive: &gltf::Primitive,
    buffers: &[gltf::buffer::Data],
    mesh_name: &str,
) -> Result<MeshData, AssetError> {
    let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|d| &d.0[..]));

    let positions: Vec<Vec3> = reader
        .read_positions()
        .ok_or_else(|| AssetError::MissingPositions(mesh_name.to_string()))?
        .map(Vec3::from)
        .collect();

    let normals: Vec<Vec3> = match reader.read_normals() {
        Some(iter) => iter.map(Vec3::from).collect(),
        None => vec![Vec3::Y; positions.len()],
    };

    let indices: Vec<u32> = match reader.read_indices() {
        Some(read) => read.into_u32().collect(),
        None => (0..positions.len() as u32).collect(),
    };

    let material = primitive.material();
    Ok(MeshData {
        positions,
        normals,
        indices,
        base_color: material.pbr_metallic_roughness().base_color_factor(),
        double_sided: material.double_sided(),
    })
}
