//! Error types for presence-relay.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for all relay operations.
#[derive(Debug, Error)]
pub enum PresenceError {
    /// I/O error outside the IPC channel (files, config).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error (frame payloads).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// No peer is listening in the resolved socket directory.
    #[error("no presence host listening in {}: {source}", path.display())]
    Connect {
        /// Directory that was searched for peer sockets.
        path: PathBuf,
        /// Error from the last connection attempt.
        #[source]
        source: std::io::Error,
    },

    /// The channel rejected a write (peer gone, broken pipe).
    #[error("write to presence host failed: {0}")]
    Write(#[source] std::io::Error),

    /// An operation needed an open connection and there was none.
    #[error("not connected to presence host")]
    NotConnected,

    /// Protocol error (oversized frame, malformed header, etc.).
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// The peer answered the handshake with a close frame.
    #[error("handshake rejected ({code}): {message}")]
    HandshakeRejected { code: i64, message: String },

    /// The peer closed the channel in reply to a command.
    #[error("presence host closed the connection ({code}): {message}")]
    PeerClosed { code: i64, message: String },

    /// Invalid configuration value.
    #[error("Config error: {0}")]
    Config(String),

    /// Config file could not be parsed.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// File watcher failure.
    #[error("Watch error: {0}")]
    Watch(#[from] notify::Error),
}

impl PresenceError {
    /// Whether this error means the channel itself went bad.
    ///
    /// Only these are worth a reopen-and-retry.
    pub fn is_write_failure(&self) -> bool {
        matches!(self, PresenceError::Write(_))
    }
}

/// Result type alias using PresenceError.
pub type Result<T> = std::result::Result<T, PresenceError>;
