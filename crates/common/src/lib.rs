//! Shared types for the roomview workspace.

mod types;

pub use types::{Transform, ViewportSize};
