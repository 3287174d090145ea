//! Platform-specific pipe/socket connection.
//!
//! - Unix: Unix Domain Socket
//! - Windows: Named Pipe
//!
//! # Example
//!
//! ```ignore
//! use presence_relay::transport::{Connector, IpcConnector, SocketLocator};
//!
//! let connector = IpcConnector::new(SocketLocator::new());
//! let stream = connector.connect().await?;
//! ```

use std::future::Future;
use std::path::{Path, PathBuf};

use tokio::io::{AsyncRead, AsyncWrite};

use super::locator::SocketLocator;
use crate::error::{PresenceError, Result};

/// Default socket name prefix; slots are appended as `0`..`9`.
pub const DEFAULT_PIPE_PREFIX: &str = "discord-ipc-";

/// Number of numbered sockets the host may listen on.
pub const DEFAULT_PIPE_SLOTS: u8 = 10;

/// Opens a channel to the presence host.
///
/// The transport owns whatever stream this returns and drops it on close.
pub trait Connector: Send {
    /// Connected, bidirectional byte stream.
    type Stream: AsyncRead + AsyncWrite + Unpin + Send;

    /// Open a new connection to the peer.
    fn connect(&self) -> impl Future<Output = Result<Self::Stream>> + Send;
}

/// Connects to the host's numbered IPC sockets.
#[derive(Debug, Clone)]
pub struct IpcConnector {
    locator: SocketLocator,
    pipe_prefix: String,
    slots: u8,
}

impl IpcConnector {
    /// Connector searching the directory `locator` resolves.
    pub fn new(locator: SocketLocator) -> Self {
        Self {
            locator,
            pipe_prefix: DEFAULT_PIPE_PREFIX.to_string(),
            slots: DEFAULT_PIPE_SLOTS,
        }
    }

    /// Override the socket name prefix.
    pub fn pipe_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.pipe_prefix = prefix.into();
        self
    }

    /// Override how many numbered sockets are tried.
    pub fn slots(mut self, slots: u8) -> Self {
        self.slots = slots;
        self
    }

    /// Candidate socket paths inside `dir`, in the order they are tried.
    pub fn candidates(&self, dir: &Path) -> Vec<PathBuf> {
        (0..self.slots)
            .map(|slot| dir.join(format!("{}{}", self.pipe_prefix, slot)))
            .collect()
    }
}

impl Connector for IpcConnector {
    type Stream = PipeStream;

    fn connect(&self) -> impl Future<Output = Result<Self::Stream>> + Send {
        async move {
            let dir = self.locator.locate();
            let mut last_error = None;

            for path in self.candidates(&dir) {
                match open_pipe(&path).await {
                    Ok(stream) => {
                        tracing::debug!("Connected to presence host at {}", path.display());
                        return Ok(stream);
                    }
                    Err(e) => {
                        tracing::trace!("No presence host at {}: {}", path.display(), e);
                        last_error = Some(e);
                    }
                }
            }

            Err(PresenceError::Connect {
                path: dir,
                source: last_error.unwrap_or_else(|| {
                    std::io::Error::new(std::io::ErrorKind::NotFound, "no socket slots configured")
                }),
            })
        }
    }
}

// ============================================================================
// Unix Implementation
// ============================================================================

#[cfg(unix)]
mod unix_impl {
    use std::path::Path;
    use tokio::net::UnixStream;

    /// Unix Domain Socket stream (connected).
    pub type PipeStream = UnixStream;

    pub async fn open_pipe(path: &Path) -> std::io::Result<PipeStream> {
        UnixStream::connect(path).await
    }
}

// ============================================================================
// Windows Implementation
// ============================================================================

#[cfg(windows)]
mod windows_impl {
    use std::path::Path;
    use tokio::net::windows::named_pipe::{ClientOptions, NamedPipeClient};

    /// Windows Named Pipe client (connected).
    pub type PipeStream = NamedPipeClient;

    pub async fn open_pipe(path: &Path) -> std::io::Result<PipeStream> {
        ClientOptions::new().open(path)
    }
}

// ============================================================================
// Platform-independent re-exports
// ============================================================================

#[cfg(unix)]
pub use unix_impl::PipeStream;
#[cfg(unix)]
use unix_impl::open_pipe;

#[cfg(windows)]
pub use windows_impl::PipeStream;
#[cfg(windows)]
use windows_impl::open_pipe;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidates_are_numbered_in_order() {
        let connector = IpcConnector::new(SocketLocator::fixed("/run/ipc"));
        let candidates = connector.candidates(Path::new("/run/ipc"));

        assert_eq!(candidates.len(), 10);
        assert_eq!(candidates[0], PathBuf::from("/run/ipc/discord-ipc-0"));
        assert_eq!(candidates[9], PathBuf::from("/run/ipc/discord-ipc-9"));
    }

    #[test]
    fn test_custom_prefix_and_slots() {
        let connector = IpcConnector::new(SocketLocator::fixed("/x"))
            .pipe_prefix("test-ipc-")
            .slots(2);
        let candidates = connector.candidates(Path::new("/x"));

        assert_eq!(
            candidates,
            vec![PathBuf::from("/x/test-ipc-0"), PathBuf::from("/x/test-ipc-1")]
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_connect_without_listener_fails_with_dir() {
        let dir = tempfile::tempdir().unwrap();
        let connector = IpcConnector::new(SocketLocator::fixed(dir.path())).slots(3);

        let err = connector.connect().await.unwrap_err();
        match err {
            PresenceError::Connect { path, .. } => assert_eq!(path, dir.path()),
            other => panic!("expected connect error, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_connect_picks_first_listening_slot() {
        let dir = tempfile::tempdir().unwrap();
        // Only slot 2 is listening.
        let _listener = tokio::net::UnixListener::bind(dir.path().join("discord-ipc-2")).unwrap();
        let connector = IpcConnector::new(SocketLocator::fixed(dir.path()));

        let stream = connector.connect().await.unwrap();
        let peer = stream.peer_addr().unwrap();
        assert_eq!(
            peer.as_pathname(),
            Some(dir.path().join("discord-ipc-2").as_path())
        );
    }
}
