//! File-change notifications for the now-playing file.
//!
//! Players often replace the file instead of writing in place, so the
//! watcher observes the parent directory and filters by file name. Events
//! are coalesced: the receiver only learns that the file changed, and a
//! full channel drops the duplicate notification.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::error::{PresenceError, Result};

const CHANNEL_CAPACITY: usize = 16;

/// Keeps the OS watch alive; dropping it stops notifications.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
    path: PathBuf,
}

impl FileWatcher {
    /// Start watching `path`. Each create/modify of the file yields `()`.
    pub fn new(path: &Path) -> Result<(Self, mpsc::Receiver<()>)> {
        let file_name = path
            .file_name()
            .ok_or_else(|| PresenceError::Config(format!("{} is not a file path", path.display())))?
            .to_os_string();
        let parent = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if is_relevant(&event, &file_name) {
                    let _ = tx.try_send(());
                }
            }
            Err(e) => tracing::warn!("Watcher error: {}", e),
        })?;
        watcher.watch(&parent, RecursiveMode::NonRecursive)?;
        tracing::debug!("Watching {} for changes", parent.display());

        Ok((
            Self {
                _watcher: watcher,
                path: path.to_path_buf(),
            },
            rx,
        ))
    }

    /// The watched file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn is_relevant(event: &Event, file_name: &OsString) -> bool {
    matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_))
        && event
            .paths
            .iter()
            .any(|p| p.file_name() == Some(file_name.as_os_str()))
}
