/// A command a UI widget can issue against the page state.
///
/// Widgets never touch the music track or overlay directly; they emit one of
/// these and the host dispatches it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UiCommand {
    /// Play if paused, pause if playing.
    ToggleMusic,
    /// Set playback volume. The level is forwarded as-is.
    SetVolume(f32),
    /// Show the computer-screen overlay.
    OpenOverlay,
    /// Hide the computer-screen overlay.
    CloseOverlay,
}

impl UiCommand {
    /// Stable name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ToggleMusic => "toggle-music",
            Self::SetVolume(_) => "set-volume",
            Self::OpenOverlay => "open-overlay",
            Self::CloseOverlay => "close-overlay",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_names_are_distinct() {
        let names = [
            UiCommand::ToggleMusic.name(),
            UiCommand::SetVolume(0.5).name(),
            UiCommand::OpenOverlay.name(),
            UiCommand::CloseOverlay.name(),
        ];
        for (i, a) in names.iter().enumerate() {
            for b in &names[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn set_volume_carries_level() {
        assert_eq!(UiCommand::SetVolume(0.75), UiCommand::SetVolume(0.75));
        let UiCommand::SetVolume(level) = UiCommand::SetVolume(0.2) else {
            panic!("volume command changed variant");
        };
        assert_eq!(level, 0.2);
    }
}
