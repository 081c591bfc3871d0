//! Developer tooling: read-only scene inspection for the CLI and the
//! desktop app's logs.
//!
//! # Invariants
//! - Inspection never mutates the scene graph.

mod inspector;

pub use inspector::{BindingReport, NodeInfo, SceneInspector, SceneSummary};
