//! wgpu render backend for the room scene.
//!
//! Draws every mesh node of the scene graph with hemisphere, directional
//! and point lighting plus distance fog. The orbit camera also produces the
//! picking rays used by the control layer.
//!
//! # Invariants
//! - The renderer never mutates the scene graph.
//! - Geometry is uploaded once per bound model; transforms are read every frame.

mod camera;
mod gpu;
mod lighting;
mod shaders;

pub use camera::OrbitCamera;
pub use gpu::SceneRenderer;
pub use lighting::{SceneLighting, hex_to_linear, srgb_to_linear};
