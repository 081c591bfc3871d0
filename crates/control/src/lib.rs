//! Scene interaction: per-frame character control, load-time node binding,
//! and pointer picking.
//!
//! # Invariants
//! - After every frame with a bound character, its height equals the ground value.
//! - Limb pose is a pure function of (moving, walk phase); nothing accumulates.
//! - Without a bound character a frame update touches nothing.

pub mod binding;
pub mod character;
pub mod picking;

pub use binding::{
    CHARACTER_ROOT, INTERACTABLE_MARKERS, LimbNames, ModelBindings, bind_model, bind_subtree,
};
pub use character::{CharacterRig, ControlConfig, Limbs, SceneContext};
pub use picking::{CursorIcon, click, hover, pointer_to_ndc};
