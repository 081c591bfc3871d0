/// Errors from starting playback.
#[derive(Debug, thiserror::Error)]
pub enum PlaybackError {
    #[error("playback blocked: {0}")]
    Blocked(String),
    #[error("audio device error: {0}")]
    Device(String),
    #[error("could not decode track: {0}")]
    Decode(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A single playable media track.
pub trait MediaTrack {
    fn is_paused(&self) -> bool;

    /// Start or resume playback. May be refused.
    fn play(&mut self) -> Result<(), PlaybackError>;

    fn pause(&mut self);

    /// Volume is forwarded unchecked; callers pass 0.0..=1.0.
    fn set_volume(&mut self, level: f32);

    fn volume(&self) -> f32;
}

impl<T: MediaTrack + ?Sized> MediaTrack for Box<T> {
    fn is_paused(&self) -> bool {
        (**self).is_paused()
    }

    fn play(&mut self) -> Result<(), PlaybackError> {
        (**self).play()
    }

    fn pause(&mut self) {
        (**self).pause()
    }

    fn set_volume(&mut self, level: f32) {
        (**self).set_volume(level)
    }

    fn volume(&self) -> f32 {
        (**self).volume()
    }
}

/// In-memory track with no audio output.
///
/// Used when no music file or audio device is available, and in tests.
/// A rejecting track refuses every play attempt.
#[derive(Debug, Clone)]
pub struct SilentTrack {
    paused: bool,
    volume: f32,
    reject_play: bool,
}

impl Default for SilentTrack {
    fn default() -> Self {
        Self {
            paused: true,
            volume: 1.0,
            reject_play: false,
        }
    }
}

impl SilentTrack {
    pub fn new() -> Self {
        Self::default()
    }

    /// A track whose `play` always fails.
    pub fn rejecting() -> Self {
        Self {
            reject_play: true,
            ..Self::default()
        }
    }

    pub fn set_reject_play(&mut self, reject: bool) {
        self.reject_play = reject;
    }
}

impl MediaTrack for SilentTrack {
    fn is_paused(&self) -> bool {
        self.paused
    }

    fn play(&mut self) -> Result<(), PlaybackError> {
        if self.reject_play {
            return Err(PlaybackError::Blocked("no audio output".into()));
        }
        self.paused = false;
        Ok(())
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn set_volume(&mut self, level: f32) {
        self.volume = level;
    }

    fn volume(&self) -> f32 {
        self.volume
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silent_track_starts_paused() {
        let track = SilentTrack::new();
        assert!(track.is_paused());
        assert_eq!(track.volume(), 1.0);
    }

    #[test]
    fn rejecting_track_stays_paused() {
        let mut track = SilentTrack::rejecting();
        assert!(matches!(track.play(), Err(PlaybackError::Blocked(_))));
        assert!(track.is_paused());

        track.set_reject_play(false);
        track.play().unwrap();
        assert!(!track.is_paused());
    }

    #[test]
    fn boxed_track_forwards() {
        let mut track: Box<dyn MediaTrack> = Box::new(SilentTrack::new());
        track.set_volume(0.5);
        track.play().unwrap();
        assert!(!track.is_paused());
        assert_eq!(track.volume(), 0.5);
    }
}
