//! Presence session state machine.
//!
//! ```text
//!                 update(Active) / handshake ok
//!   Disconnected ─────────────────────────────► Connected
//!        ▲                                          │
//!        │  update(Stopped) | shutdown()            │
//!        │  update(Active) fails (forced logout)    │
//!        └──────────────────────────────────────────┘
//! ```
//!
//! Every operation takes `&mut self`, so calls are serialized by
//! construction. A failed presence update always ends in `Disconnected`,
//! which makes the next update re-run the handshake instead of writing
//! into a connection that is known to be bad.

use super::activity::{Activity, CloseReason, Command, Handshake, PresenceState, RpcMessage};
use crate::codec::JsonCodec;
use crate::error::{PresenceError, Result};
use crate::protocol::{Frame, Opcode, Response, MAX_PAYLOAD_SIZE};
use crate::transport::{Connector, ReconnectingTransport};

/// Connection state as seen by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Connected,
}

/// Drives the handshake, presence updates and teardown.
pub struct PresenceSession<C: Connector> {
    link: ReconnectingTransport<C>,
    client_id: String,
    state: SessionState,
}

impl<C: Connector> PresenceSession<C> {
    /// Create a disconnected session for the given application id.
    pub fn new(connector: C, client_id: impl Into<String>) -> Self {
        Self {
            link: ReconnectingTransport::new(connector),
            client_id: client_id.into(),
            state: SessionState::Disconnected,
        }
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == SessionState::Connected
    }

    /// Access the reconnecting transport.
    pub fn link(&self) -> &ReconnectingTransport<C> {
        &self.link
    }

    /// Apply a logical state change.
    ///
    /// `Stopped` hides the presence (no traffic if already hidden). `Active`
    /// logs in when needed and then sends the activity. Any failure while
    /// sending the activity forces a logout before the error is returned.
    pub async fn update(&mut self, presence: &PresenceState) -> Result<()> {
        match presence {
            PresenceState::Stopped => {
                if self.is_connected() {
                    self.logout().await;
                    tracing::info!("Source stopped, presence hidden");
                }
                Ok(())
            }
            PresenceState::Active(activity) => {
                if !self.is_connected() {
                    self.login().await?;
                }
                if let Err(e) = self.set_activity(activity).await {
                    tracing::warn!("Presence update failed, dropping connection: {}", e);
                    self.logout().await;
                    return Err(e);
                }
                Ok(())
            }
        }
    }

    /// Tear down the session from either state.
    ///
    /// The connection is released whatever state the session was in.
    pub async fn shutdown(&mut self) -> Result<()> {
        if self.is_connected() {
            self.logout().await;
        }
        self.link.close().await;
        Ok(())
    }

    async fn login(&mut self) -> Result<()> {
        tracing::info!("Source is active, starting rich presence");
        let frame = Frame::json(Opcode::Handshake, &Handshake::new(&self.client_id))?;

        let outcome = match self.link.send_frame(&frame).await {
            Ok(response) => check_handshake(&response),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(()) => {
                self.state = SessionState::Connected;
                tracing::debug!("Handshake accepted");
                Ok(())
            }
            Err(e) => {
                self.link.close().await;
                Err(e)
            }
        }
    }

    async fn set_activity(&mut self, activity: &Activity) -> Result<()> {
        let frame = activity_frame(activity)?;
        let response = self.link.send_frame(&frame).await?;

        if response.is_close() {
            let reason = close_reason(&response);
            return Err(PresenceError::PeerClosed {
                code: reason.code,
                message: reason.message,
            });
        }
        if let Some(message) = JsonCodec::decode_lenient::<RpcMessage>(response.body()) {
            if message.is_error() {
                tracing::warn!(
                    "Presence host rejected the activity: {}",
                    message.error_message().unwrap_or("unknown error")
                );
            }
        }
        Ok(())
    }

    /// Send one best-effort close frame and release the connection.
    async fn logout(&mut self) {
        if self.link.is_open() {
            match Frame::new(Opcode::Close, &b"{}"[..]) {
                Ok(frame) => {
                    if let Err(e) = self.link.send_once(&frame).await {
                        tracing::debug!("Close frame not delivered: {}", e);
                    }
                }
                Err(e) => tracing::debug!("Close frame not built: {}", e),
            }
        }
        self.link.close().await;
        self.state = SessionState::Disconnected;
    }
}

/// Build the `SET_ACTIVITY` frame, shortening the text lines until the
/// command fits one host read.
fn activity_frame(activity: &Activity) -> Result<Frame> {
    let mut activity = activity.clone();
    loop {
        let payload = JsonCodec::encode(&Command::set_activity(&activity))?;
        if payload.len() <= MAX_PAYLOAD_SIZE {
            return Frame::new(Opcode::Frame, payload);
        }
        let excess = payload.len() - MAX_PAYLOAD_SIZE;
        if !activity.shed_bytes(excess) {
            // Nothing left to shorten; let framing report the size.
            return Frame::new(Opcode::Frame, payload);
        }
        tracing::debug!("Activity {} bytes over the frame limit, shortened", excess);
    }
}

fn check_handshake(response: &Response) -> Result<()> {
    if response.is_close() {
        let reason = close_reason(response);
        return Err(PresenceError::HandshakeRejected {
            code: reason.code,
            message: reason.message,
        });
    }
    Ok(())
}

fn close_reason(response: &Response) -> CloseReason {
    JsonCodec::decode_lenient(response.body()).unwrap_or_default()
}
