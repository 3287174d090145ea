//! The relay loop: file changes in, presence updates out.
//!
//! The loop owns the session and awaits each update before looking at the
//! next change event, which is what keeps session calls serialized.

use std::future::Future;
use std::path::PathBuf;

use tokio::sync::mpsc;

use crate::error::Result;
use crate::presence::PresenceSession;
use crate::source::{read_now_playing, DisplayProfile, NowPlaying};
use crate::transport::Connector;

/// Relays now-playing changes into a presence session.
pub struct Relay<C: Connector> {
    session: PresenceSession<C>,
    profile: DisplayProfile,
    path: PathBuf,
    current: Option<NowPlaying>,
}

impl<C: Connector> Relay<C> {
    pub fn new(session: PresenceSession<C>, profile: DisplayProfile, path: impl Into<PathBuf>) -> Self {
        Self {
            session,
            profile,
            path: path.into(),
            current: None,
        }
    }

    /// Access the session.
    pub fn session(&self) -> &PresenceSession<C> {
        &self.session
    }

    /// Apply the file's content as it is at startup.
    pub async fn prime(&mut self) {
        self.on_file_changed().await;
    }

    /// Re-read the file and push it to the session if it changed.
    ///
    /// Returns `true` when an update was attempted. Update failures are
    /// logged, not returned; the next change retries.
    pub async fn on_file_changed(&mut self) -> bool {
        let now_playing = match read_now_playing(&self.path).await {
            Ok(now_playing) => now_playing,
            Err(e) => {
                tracing::warn!("Cannot read {}: {}", self.path.display(), e);
                return false;
            }
        };
        if self.current.as_ref() == Some(&now_playing) {
            return false;
        }

        let Some(state) = self.profile.interpret(&now_playing) else {
            tracing::debug!("Empty status line, waiting for the next write");
            return false;
        };
        if let Err(e) = self.session.update(&state).await {
            tracing::error!("Error while updating the presence: {}", e);
        }
        self.current = Some(now_playing);
        true
    }

    /// Process change events until `shutdown` resolves or the watcher stops,
    /// then shut the session down once.
    pub async fn run<F>(mut self, mut events: mpsc::Receiver<()>, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("Shutdown requested");
                    break;
                }
                event = events.recv() => match event {
                    Some(()) => {
                        self.on_file_changed().await;
                    }
                    None => {
                        tracing::warn!("File watcher stopped");
                        break;
                    }
                },
            }
        }
        self.session.shutdown().await
    }
}
