//! Retry-once reconnect policy.
//!
//! The presence host is a desktop application that users restart at will.
//! When that happens the socket we hold goes stale and the next write fails
//! with a broken pipe. [`ReconnectingTransport::send`] absorbs exactly one
//! such failure by reopening the channel and repeating the write. A second
//! consecutive failure is returned to the caller; the next send starts over.
//!
//! ```text
//! send ─► open? ─► write ──ok──► read ─► Response
//!                    │
//!                  Write err
//!                    ▼
//!          close ─► open ─► write ──ok──► read ─► Response
//!                    │        │
//!                   err      err ─► close ─► Err
//! ```

use super::{Connector, Transport};
use crate::error::Result;
use crate::protocol::{Frame, Opcode, Response};

/// Transport wrapper that reopens a stale connection once per send.
pub struct ReconnectingTransport<C: Connector> {
    transport: Transport<C>,
    reconnects: u64,
}

impl<C: Connector> ReconnectingTransport<C> {
    pub fn new(connector: C) -> Self {
        Self {
            transport: Transport::new(connector),
            reconnects: 0,
        }
    }

    /// Check if a connection is currently held.
    pub fn is_open(&self) -> bool {
        self.transport.is_open()
    }

    /// Number of reopen attempts made after failed writes.
    pub fn reconnects(&self) -> u64 {
        self.reconnects
    }

    /// Send one frame and return the peer's reply.
    ///
    /// Opens the connection if none is held. A failed write triggers one
    /// close/reopen/rewrite cycle; any other error is returned as is.
    pub async fn send(&mut self, opcode: Opcode, payload: impl Into<bytes::Bytes>) -> Result<Response> {
        let frame = Frame::new(opcode, payload)?;
        self.send_frame(&frame).await
    }

    /// Like [`send`](Self::send) for a prebuilt frame.
    pub async fn send_frame(&mut self, frame: &Frame) -> Result<Response> {
        if !self.transport.is_open() {
            if let Err(e) = self.transport.open().await {
                tracing::warn!("Unable to establish IPC connection: {}", e);
                return Err(e);
            }
        }

        match self.transport.write(frame).await {
            Ok(()) => return Ok(self.transport.read().await),
            Err(e) if e.is_write_failure() => {
                tracing::warn!("Write failed, attempting to reopen connection: {}", e);
            }
            Err(e) => return Err(e),
        }

        self.transport.close().await;
        self.reconnects += 1;
        if let Err(e) = self.transport.open().await {
            tracing::warn!("Reopen failed: {}", e);
            return Err(e);
        }
        if let Err(e) = self.transport.write(frame).await {
            tracing::warn!("Write after reopen failed: {}", e);
            self.transport.close().await;
            return Err(e);
        }

        tracing::info!("Reconnected to presence host");
        Ok(self.transport.read().await)
    }

    /// Write a frame once, without reconnecting or reading a reply.
    ///
    /// Used for teardown, where a dead channel needs no repair.
    pub async fn send_once(&mut self, frame: &Frame) -> Result<()> {
        self.transport.write(frame).await
    }

    /// Release the connection. Idempotent.
    pub async fn close(&mut self) {
        self.transport.close().await;
    }
}
