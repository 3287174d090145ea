//! Relay configuration.
//!
//! Values come from a TOML file; every field is optional and falls back to
//! the defaults below. The binary layers command-line flags on top.
//!
//! ```toml
//! client_id = "1393213730786906273"
//! now_playing_path = "/home/me/Documents/nowplaying.txt"
//! stop_sentinel = "Stopped Running"
//! socket_dir = "/run/user/1000"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PresenceError, Result};
use crate::source::DisplayProfile;
use crate::transport::{IpcConnector, SocketLocator, DEFAULT_PIPE_PREFIX};

/// Application id registered with the presence host.
pub const DEFAULT_CLIENT_ID: &str = "1393213730786906273";

/// Status line the player writes when it exits.
pub const DEFAULT_STOP_SENTINEL: &str = "Stopped Running";

/// File name under the user config dir.
const CONFIG_FILE: &str = "presence-relay/config.toml";

/// Relay configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub client_id: String,
    pub now_playing_path: PathBuf,
    pub stop_sentinel: String,
    pub large_image: String,
    pub large_text: String,
    pub playing_icon: String,
    pub paused_icon: String,
    /// Pin the socket directory instead of searching for it.
    pub socket_dir: Option<PathBuf>,
    pub pipe_prefix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            client_id: DEFAULT_CLIENT_ID.to_string(),
            now_playing_path: default_now_playing_path(),
            stop_sentinel: DEFAULT_STOP_SENTINEL.to_string(),
            large_image: "foobar2000".to_string(),
            large_text: "www.foobar2000.org".to_string(),
            playing_icon: "play".to_string(),
            paused_icon: "pause".to_string(),
            socket_dir: None,
            pipe_prefix: DEFAULT_PIPE_PREFIX.to_string(),
        }
    }
}

impl Config {
    /// Parse a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, the per-user config file is
    /// used when present, and defaults otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path().filter(|p| p.is_file()) {
                Some(path) => path,
                None => {
                    tracing::debug!("No config file found, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        let text = std::fs::read_to_string(&path).map_err(|e| {
            PresenceError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Per-user config file location, if the platform has one.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_FILE))
    }

    /// Reject values the relay cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.client_id.trim().is_empty() {
            return Err(PresenceError::Config("client_id must not be empty".to_string()));
        }
        if self.stop_sentinel.trim().is_empty() {
            return Err(PresenceError::Config("stop_sentinel must not be empty".to_string()));
        }
        if self.pipe_prefix.is_empty() {
            return Err(PresenceError::Config("pipe_prefix must not be empty".to_string()));
        }
        Ok(())
    }

    /// How file content maps to presence.
    pub fn display_profile(&self) -> DisplayProfile {
        DisplayProfile {
            stop_sentinel: self.stop_sentinel.clone(),
            large_image: self.large_image.clone(),
            large_text: self.large_text.clone(),
            playing_icon: self.playing_icon.clone(),
            paused_icon: self.paused_icon.clone(),
        }
    }

    /// Connector honoring `socket_dir` and `pipe_prefix`.
    pub fn connector(&self) -> IpcConnector {
        let locator = match &self.socket_dir {
            Some(dir) => SocketLocator::fixed(dir),
            None => SocketLocator::new(),
        };
        IpcConnector::new(locator).pipe_prefix(self.pipe_prefix.clone())
    }
}

fn default_now_playing_path() -> PathBuf {
    dirs::document_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_default()
        .join("nowplaying.txt")
}
