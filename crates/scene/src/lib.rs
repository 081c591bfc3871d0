//! Scene graph: named nodes in an arena, mesh data, ray picking.
//!
//! # Invariants
//! - Node ids are stable for the lifetime of the graph; nodes are never removed.
//! - The root node always exists and has no parent.
//! - Raycast hits are sorted nearest first.

pub mod graph;
pub mod raycast;

pub use graph::{MeshData, Node, NodeId, NodeTemplate, SceneError, SceneGraph};
pub use raycast::{Aabb, Hit, Ray};
