//! Page layer: everything outside the 3D scene that the user sees.
//!
//! Widgets only emit [`UiCommand`](roomview_input::UiCommand)s; the
//! [`PageState`] owns the music controller, the overlay and the cursor and
//! is the single place commands are applied.

mod overlay;
mod page;
pub mod widgets;

pub use overlay::Overlay;
pub use page::PageState;
