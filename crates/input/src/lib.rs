//! Input: held movement keys and the commands UI widgets may invoke.
//!
//! # Invariants
//! - Only the four movement keys are tracked; anything else is ignored.
//! - UI widgets reach application state only through [`UiCommand`].

pub mod command;
pub mod keys;

pub use command::UiCommand;
pub use keys::{MoveKey, MoveKeys};
