use roomview_audio::{AutoStart, MediaTrack, MusicController};
use roomview_control::CursorIcon;
use roomview_input::UiCommand;

use crate::overlay::Overlay;

/// Page-level state shared by the widgets and the scene click handler.
#[derive(Debug)]
pub struct PageState<M> {
    pub music: MusicController<M>,
    pub overlay: Overlay,
    pub cursor: CursorIcon,
    autostart: AutoStart,
    pending_click: bool,
}

impl<M: MediaTrack> PageState<M> {
    pub fn new(track: M) -> Self {
        Self {
            music: MusicController::new(track),
            overlay: Overlay::default(),
            cursor: CursorIcon::Default,
            autostart: AutoStart::new(),
            pending_click: false,
        }
    }

    /// Apply one command.
    pub fn dispatch(&mut self, command: UiCommand) {
        tracing::debug!(command = command.name(), "dispatch");
        match command {
            UiCommand::ToggleMusic => {
                self.music.toggle();
            }
            UiCommand::SetVolume(level) => self.music.set_volume(level),
            UiCommand::OpenOverlay => self.overlay.open(),
            UiCommand::CloseOverlay => self.overlay.close(),
        }
    }

    /// Record a click anywhere on the page. It is handled at the end of the
    /// frame, after widget commands, so a click on the music button is seen
    /// by the button first.
    pub fn note_page_click(&mut self) {
        self.pending_click = true;
    }

    /// Apply this frame's widget commands, then any pending page click.
    pub fn end_frame(&mut self, commands: impl IntoIterator<Item = UiCommand>) {
        for command in commands {
            self.dispatch(command);
        }
        let clicked = std::mem::take(&mut self.pending_click);
        if clicked && self.autostart.on_page_click(&mut self.music) {
            tracing::info!("music autostarted on first click");
        }
    }

    pub fn autostart_armed(&self) -> bool {
        self.autostart.is_armed()
    }
}
