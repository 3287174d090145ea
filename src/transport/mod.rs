//! Transport module - locating, opening and framing the IPC channel.
//!
//! Provides abstraction over:
//! - Unix Domain Sockets (Linux/macOS)
//! - Named Pipes (Windows)
//!
//! Layers, bottom up: [`SocketLocator`] finds the directory,
//! [`IpcConnector`] opens a numbered socket in it, [`Transport`] owns the
//! single connection and moves frames, and [`ReconnectingTransport`] heals a
//! stale connection once per send.

mod connection;
mod locator;
mod pipe;
mod reconnect;

#[cfg(test)]
pub(crate) mod testing;

pub use connection::Transport;
pub use locator::{SocketLocator, FALLBACK_DIR, RUNTIME_DIR_VARS};
pub use pipe::{Connector, IpcConnector, PipeStream, DEFAULT_PIPE_PREFIX, DEFAULT_PIPE_SLOTS};
pub use reconnect::ReconnectingTransport;
