//! Now-playing file reading and interpretation.
//!
//! The media player writes a small text file: a status line such as
//! `Playing: Artist - Title`, optionally followed by a second line. When the
//! player exits it writes a fixed sentinel (`Stopped Running` by default).

use std::path::Path;

use crate::error::Result;
use crate::presence::{Activity, Assets, PresenceState};

/// The parts of the now-playing file the relay cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NowPlaying {
    /// First line, trimmed. Empty if the file was empty.
    pub status: String,
    /// Second line, trimmed, if present and non-empty.
    pub details: Option<String>,
}

impl NowPlaying {
    /// Parse file content.
    pub fn parse(content: &str) -> Self {
        let mut lines = content.lines().map(str::trim);
        let status = lines.next().unwrap_or_default().to_string();
        let details = lines
            .next()
            .filter(|line| !line.is_empty())
            .map(str::to_string);
        Self { status, details }
    }
}

/// Read and parse the now-playing file.
pub async fn read_now_playing(path: &Path) -> Result<NowPlaying> {
    let content = tokio::fs::read_to_string(path).await?;
    Ok(NowPlaying::parse(&content))
}

/// Play state derived from the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Playback {
    Playing,
    Paused,
}

impl Playback {
    /// Detect the play state from a status prefix, ignoring case.
    pub fn detect(status: &str) -> Option<Self> {
        let lower = status.to_ascii_lowercase();
        if lower.starts_with("paused") {
            Some(Playback::Paused)
        } else if lower.starts_with("playing") {
            Some(Playback::Playing)
        } else {
            None
        }
    }
}

/// How file content is turned into presence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayProfile {
    pub stop_sentinel: String,
    pub large_image: String,
    pub large_text: String,
    pub playing_icon: String,
    pub paused_icon: String,
}

impl DisplayProfile {
    /// Map now-playing content to a presence state.
    ///
    /// Returns `None` for an empty status line, which players produce
    /// briefly while rewriting the file.
    pub fn interpret(&self, now_playing: &NowPlaying) -> Option<PresenceState> {
        if now_playing.status.is_empty() {
            return None;
        }
        if now_playing.status == self.stop_sentinel {
            return Some(PresenceState::Stopped);
        }

        let (small_image, small_text) = match Playback::detect(&now_playing.status) {
            Some(Playback::Playing) => (Some(self.playing_icon.clone()), Some("Playing".to_string())),
            Some(Playback::Paused) => (Some(self.paused_icon.clone()), Some("Paused".to_string())),
            None => (None, None),
        };

        let mut activity = Activity::new(now_playing.status.clone()).assets(Assets {
            large_image: non_empty(&self.large_image),
            large_text: non_empty(&self.large_text),
            small_image,
            small_text,
        });
        if let Some(details) = &now_playing.details {
            activity = activity.details(details.clone());
        }
        Some(PresenceState::Active(activity))
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}
