//! Asset pipeline: glTF/GLB import into scene templates.
//!
//! The importer keeps node names, TRS transforms and triangle geometry; it
//! does not decode textures, skins or animations. Loading can run on a
//! worker thread through [`ModelLoader`], which hands back exactly one
//! result.

mod gltf_import;
mod loader;

pub use gltf_import::{Model, load_model};
pub use loader::{LoadStatus, ModelLoader};

/// Errors from asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("glTF error: {0}")]
    Gltf(#[from] gltf::Error),
    #[error("glTF file has no scene")]
    NoScene,
    #[error("missing position data for mesh: {0}")]
    MissingPositions(String),
    #[error("model loader stopped before producing a result")]
    LoaderGone,
}

pub fn crate_info() -> &'static str {
    "roomview-assets v0.1.0"
}
