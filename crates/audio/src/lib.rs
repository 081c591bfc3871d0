//! Background music: a single track behind a play/pause toggle.
//!
//! # Invariants
//! - A rejected play attempt changes nothing but the log.
//! - Autostart fires at most once per page, on the first click.
//!
//! The track is abstracted by [`MediaTrack`]. [`SilentTrack`] is always
//! available; the `rodio` feature adds a device-backed track.

mod controller;
#[cfg(feature = "rodio")]
mod rodio_track;
mod track;

pub use controller::{AutoStart, ButtonLook, DEFAULT_VOLUME, MusicController, ToggleOutcome};
#[cfg(feature = "rodio")]
pub use rodio_track::RodioTrack;
pub use track::{MediaTrack, PlaybackError, SilentTrack};

pub fn crate_info() -> &'static str {
    "roomview-audio v0.1.0"
}
