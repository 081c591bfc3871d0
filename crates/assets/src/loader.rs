use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use crate::{AssetError, Model, load_model};

/// Progress of a background model load.
#[derive(Debug)]
pub enum LoadStatus {
    /// The worker has not finished yet.
    Pending,
    /// The single result of the load. Returned once.
    Ready(Result<Model, AssetError>),
    /// The result was already taken.
    Consumed,
}

/// Loads one model on a worker thread and delivers the result once.
///
/// The host polls once per frame; nothing blocks the UI thread.
#[derive(Debug)]
pub struct ModelLoader {
    path: PathBuf,
    receiver: Option<Receiver<Result<Model, AssetError>>>,
}

impl ModelLoader {
    /// Start loading `path` in the background.
    pub fn spawn(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let (sender, receiver) = mpsc::channel();

        let worker_path = path.clone();
        let worker_sender = sender.clone();
        let spawned = thread::Builder::new()
            .name("model-loader".into())
            .spawn(move || {
                let result = load_model(&worker_path);
                // The receiver may already be gone if the host shut down.
                let _ = worker_sender.send(result);
            });

        if let Err(e) = spawned {
            tracing::error!("failed to start model loader thread: {e}");
            let _ = sender.send(Err(AssetError::Io(e)));
        }

        tracing::debug!("model load started: {}", path.display());
        Self {
            path,
            receiver: Some(receiver),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Non-blocking check for the result.
    pub fn poll(&mut self) -> LoadStatus {
        let Some(receiver) = &self.receiver else {
            return LoadStatus::Consumed;
        };
        match receiver.try_recv() {
            Ok(result) => {
                self.receiver = None;
                LoadStatus::Ready(result)
            }
            Err(TryRecvError::Empty) => LoadStatus::Pending,
            Err(TryRecvError::Disconnected) => {
                self.receiver = None;
                LoadStatus::Ready(Err(AssetError::LoaderGone))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use std::time::{Duration, Instant};

    fn poll_until_ready(loader: &mut ModelLoader) -> Result<Model, AssetError> {
        let deadline = Instant::now() + Duration::from_secs(10);
        loop {
            match loader.poll() {
                LoadStatus::Ready(result) => return result,
                LoadStatus::Pending => {
                    assert!(Instant::now() < deadline, "loader timed out");
                    thread::sleep(Duration::from_millis(5));
                }
                LoadStatus::Consumed => panic!("result consumed before it was seen"),
            }
        }
    }

    #[test]
    fn delivers_result_once() {
        let file = fixtures::write_room();
        let mut loader = ModelLoader::spawn(file.path());
        assert_eq!(loader.path(), file.path());
        let model = poll_until_ready(&mut loader).unwrap();
        assert_eq!(model.roots[0].name, "Room");
        assert_eq!(model.node_count(), 10);
        assert!(matches!(loader.poll(), LoadStatus::Consumed));
    }

    #[test]
    fn failure_is_an_explicit_result() {
        let mut loader = ModelLoader::spawn("/definitely/not/here/setup_gamer.glb");
        assert!(poll_until_ready(&mut loader).is_err());
        assert!(matches!(loader.poll(), LoadStatus::Consumed));
    }
}
