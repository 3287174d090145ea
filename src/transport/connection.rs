//! Framed transport over a single owned connection.
//!
//! [`Transport`] holds at most one stream. Opening replaces the previous
//! handle, so two live connections can never coexist.

use tokio::io::{AsyncReadExt, AsyncWriteExt};

use super::Connector;
use crate::error::{PresenceError, Result};
use crate::protocol::{Frame, ReadFailure, Response, READ_BUFFER_SIZE};

/// Owns the connection to the presence host and moves frames over it.
pub struct Transport<C: Connector> {
    connector: C,
    stream: Option<C::Stream>,
    read_buffer_size: usize,
}

impl<C: Connector> Transport<C> {
    /// Create a closed transport.
    pub fn new(connector: C) -> Self {
        Self {
            connector,
            stream: None,
            read_buffer_size: READ_BUFFER_SIZE,
        }
    }

    /// Check if a connection is currently held.
    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    /// Connect to the peer, closing any connection held before.
    pub async fn open(&mut self) -> Result<()> {
        self.close().await;
        let stream = self.connector.connect().await?;
        self.stream = Some(stream);
        Ok(())
    }

    /// Write one frame in a single operation.
    pub async fn write(&mut self, frame: &Frame) -> Result<()> {
        let stream = self.stream.as_mut().ok_or(PresenceError::NotConnected)?;
        let bytes = frame.to_bytes();
        stream.write_all(&bytes).await.map_err(PresenceError::Write)?;
        stream.flush().await.map_err(PresenceError::Write)?;
        tracing::trace!("Wrote frame opcode={} len={}", frame.opcode(), frame.payload_len());
        Ok(())
    }

    /// Perform one bounded read and strip the frame header.
    ///
    /// Never fails; see [`Response`].
    pub async fn read(&mut self) -> Response {
        let Some(stream) = self.stream.as_mut() else {
            return Response::Missing(ReadFailure::NotConnected);
        };

        let mut buf = vec![0u8; self.read_buffer_size];
        match stream.read(&mut buf).await {
            Ok(n) => {
                let response = Response::from_read(&buf[..n]);
                if let Response::Missing(reason) = &response {
                    tracing::debug!("No reply from presence host: {:?}", reason);
                }
                response
            }
            Err(e) => {
                tracing::debug!("Read from presence host failed: {}", e);
                Response::Missing(ReadFailure::Io(e.kind()))
            }
        }
    }

    /// Release the connection. Closing a closed transport is a no-op.
    pub async fn close(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            if let Err(e) = stream.shutdown().await {
                tracing::trace!("Shutdown of stale connection failed: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Opcode;
    use crate::transport::testing::{ScriptedConnector, READY_REPLY};

    #[tokio::test]
    async fn test_open_write_read() {
        let connector = ScriptedConnector::new();
        let mut transport = Transport::new(connector.clone());

        transport.open().await.unwrap();
        assert!(transport.is_open());

        let frame = Frame::new(Opcode::Handshake, &br#"{"v":1}"#[..]).unwrap();
        transport.write(&frame).await.unwrap();
        let response = transport.read().await;

        assert_eq!(connector.opcodes(), vec![0]);
        assert_eq!(connector.payloads(), vec![r#"{"v":1}"#.to_string()]);
        assert_eq!(response.opcode(), Some(1));
        assert_eq!(response.body(), READY_REPLY);
    }

    #[tokio::test]
    async fn test_open_refused_leaves_transport_closed() {
        let connector = ScriptedConnector::new();
        connector.script().refuse_connects = 1;
        let mut transport = Transport::new(connector.clone());

        let err = transport.open().await.unwrap_err();
        assert!(matches!(err, PresenceError::Connect { .. }));
        assert!(!transport.is_open());
    }

    #[tokio::test]
    async fn test_reopen_closes_previous_handle() {
        let connector = ScriptedConnector::new();
        let mut transport = Transport::new(connector.clone());

        transport.open().await.unwrap();
        transport.open().await.unwrap();

        let script = connector.script();
        assert_eq!(script.connects, 2);
        assert_eq!(script.shutdowns, 1);
    }

    #[tokio::test]
    async fn test_write_without_connection() {
        let mut transport = Transport::new(ScriptedConnector::new());
        let frame = Frame::new(Opcode::Frame, &b"{}"[..]).unwrap();

        let err = transport.write(&frame).await.unwrap_err();
        assert!(matches!(err, PresenceError::NotConnected));
    }

    #[tokio::test]
    async fn test_broken_write_is_write_error() {
        let connector = ScriptedConnector::new();
        let mut transport = Transport::new(connector.clone());
        transport.open().await.unwrap();
        connector.script().break_writes = 1;

        let frame = Frame::new(Opcode::Frame, &b"{}"[..]).unwrap();
        let err = transport.write(&frame).await.unwrap_err();
        assert!(err.is_write_failure());
        assert!(connector.opcodes().is_empty());
    }

    #[tokio::test]
    async fn test_read_end_of_stream_is_missing() {
        let connector = ScriptedConnector::new();
        connector.script().silent = true;
        let mut transport = Transport::new(connector);
        transport.open().await.unwrap();

        let response = transport.read().await;
        assert_eq!(response, Response::Missing(ReadFailure::Closed));
        assert!(response.body().is_empty());
    }

    #[tokio::test]
    async fn test_read_without_connection_is_missing() {
        let mut transport = Transport::new(ScriptedConnector::new());
        assert_eq!(
            transport.read().await,
            Response::Missing(ReadFailure::NotConnected)
        );
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let connector = ScriptedConnector::new();
        let mut transport = Transport::new(connector.clone());

        transport.close().await;
        transport.open().await.unwrap();
        transport.close().await;
        transport.close().await;

        assert!(!transport.is_open());
        assert_eq!(connector.script().shutdowns, 1);
    }
}
