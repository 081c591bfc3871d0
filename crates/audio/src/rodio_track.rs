use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use rodio::{Decoder, OutputStream, Sink, Source};

use crate::track::{MediaTrack, PlaybackError};

/// A looping music file played through the default output device.
///
/// The output stream must outlive the sink, so both are kept together.
pub struct RodioTrack {
    _stream: OutputStream,
    sink: Sink,
}

impl RodioTrack {
    /// Open the default device and queue `path` on repeat, paused.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PlaybackError> {
        let path = path.as_ref();
        let (stream, handle) =
            OutputStream::try_default().map_err(|e| PlaybackError::Device(e.to_string()))?;
        let sink = Sink::try_new(&handle).map_err(|e| PlaybackError::Device(e.to_string()))?;

        let file = File::open(path)?;
        let source =
            Decoder::new(BufReader::new(file)).map_err(|e| PlaybackError::Decode(e.to_string()))?;
        sink.append(source.repeat_infinite());
        sink.pause();

        tracing::info!("music track ready: {}", path.display());
        Ok(Self {
            _stream: stream,
            sink,
        })
    }
}

impl MediaTrack for RodioTrack {
    fn is_paused(&self) -> bool {
        self.sink.is_paused()
    }

    fn play(&mut self) -> Result<(), PlaybackError> {
        self.sink.play();
        Ok(())
    }

    fn pause(&mut self) {
        self.sink.pause();
    }

    fn set_volume(&mut self, level: f32) {
        self.sink.set_volume(level);
    }

    fn volume(&self) -> f32 {
        self.sink.volume()
    }
}
