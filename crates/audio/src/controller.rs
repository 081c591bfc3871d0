use crate::track::MediaTrack;

/// Volume applied when a controller is created.
pub const DEFAULT_VOLUME: f32 = 0.3;

/// Appearance of the music button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonLook {
    pub label: &'static str,
    /// sRGB text color.
    pub color: [u8; 3],
    /// Neon glow around the label.
    pub glow: bool,
}

impl ButtonLook {
    /// Shown while the track is paused.
    pub const PAUSED: Self = Self {
        label: "PLAY",
        color: [0xff, 0xff, 0xff],
        glow: false,
    };

    /// Shown while the track is playing.
    pub const PLAYING: Self = Self {
        label: "PAUSE",
        color: [0x00, 0xf3, 0xff],
        glow: true,
    };
}

/// Result of a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Playing,
    Paused,
    /// Play was refused; nothing changed.
    Rejected,
}

/// Play/pause toggle over one track, with the button look kept in step.
#[derive(Debug)]
pub struct MusicController<M> {
    track: M,
    button: ButtonLook,
}

impl<M: MediaTrack> MusicController<M> {
    pub fn new(mut track: M) -> Self {
        track.set_volume(DEFAULT_VOLUME);
        Self {
            track,
            button: ButtonLook::PAUSED,
        }
    }

    /// Play if paused, pause if playing.
    ///
    /// A refused play is logged and otherwise ignored; the user can retry
    /// with the button.
    pub fn toggle(&mut self) -> ToggleOutcome {
        if self.track.is_paused() {
            match self.track.play() {
                Ok(()) => {
                    self.button = ButtonLook::PLAYING;
                    tracing::debug!("music playing");
                    ToggleOutcome::Playing
                }
                Err(e) => {
                    tracing::warn!("music needs user interaction to start: {e}");
                    ToggleOutcome::Rejected
                }
            }
        } else {
            self.track.pause();
            self.button = ButtonLook::PAUSED;
            tracing::debug!("music paused");
            ToggleOutcome::Paused
        }
    }

    pub fn set_volume(&mut self, level: f32) {
        self.track.set_volume(level);
    }

    pub fn volume(&self) -> f32 {
        self.track.volume()
    }

    pub fn button(&self) -> ButtonLook {
        self.button
    }

    pub fn is_playing(&self) -> bool {
        !self.track.is_paused()
    }

    pub fn track(&self) -> &M {
        &self.track
    }

    pub fn track_mut(&mut self) -> &mut M {
        &mut self.track
    }
}

/// Single-use trigger that starts the music on the first page click.
#[derive(Debug, Clone)]
pub struct AutoStart {
    armed: bool,
}

impl Default for AutoStart {
    fn default() -> Self {
        Self { armed: true }
    }
}

impl AutoStart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Handle a page click. Only the first call can toggle, and only when the
    /// track is paused and the button still offers "PLAY". Returns whether a
    /// toggle was issued.
    pub fn on_page_click<M: MediaTrack>(&mut self, music: &mut MusicController<M>) -> bool {
        if !std::mem::replace(&mut self.armed, false) {
            return false;
        }
        if music.track().is_paused() && music.button().label.contains("PLAY") {
            music.toggle();
            true
        } else {
            false
        }
    }
}
