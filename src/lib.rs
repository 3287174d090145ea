//! # presence-relay
//!
//! Relays a media player's "now playing" file into a chat client's rich
//! presence display over the client's local IPC channel.
//!
//! ## Architecture
//!
//! - **Transport** (Unix socket / named pipe): locating the host's socket,
//!   owning the single connection, reopening it once when a write fails
//! - **Protocol**: 8-byte little-endian `opcode · length` header + JSON payload
//! - **Presence**: handshake/update/teardown state machine
//! - **Relay**: file watcher driving the session
//!
//! ## Example
//!
//! ```ignore
//! use presence_relay::presence::{Activity, PresenceSession, PresenceState};
//! use presence_relay::transport::{IpcConnector, SocketLocator};
//!
//! #[tokio::main]
//! async fn main() -> presence_relay::Result<()> {
//!     let connector = IpcConnector::new(SocketLocator::new());
//!     let mut session = PresenceSession::new(connector, "1393213730786906273");
//!
//!     session
//!         .update(&PresenceState::Active(Activity::new("Playing: Artist - Title")))
//!         .await?;
//!     session.shutdown().await
//! }
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod logging;
pub mod presence;
pub mod protocol;
pub mod relay;
pub mod shutdown;
pub mod source;
pub mod transport;
pub mod watch;

pub use config::Config;
pub use error::{PresenceError, Result};
pub use presence::{PresenceSession, PresenceState, SessionState};
pub use relay::Relay;
