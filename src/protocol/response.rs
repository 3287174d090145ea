//! Best-effort response returned by a single read.
//!
//! The peer's reply content is never required for correctness, so a read
//! that fails is not an error. It is reported as [`Response::Missing`]
//! instead, which keeps "peer said nothing" distinguishable from "peer
//! replied with an empty payload" for callers that care.

use bytes::Bytes;

use super::wire_format::{Header, HEADER_SIZE};

/// Why a read produced no reply frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadFailure {
    /// The peer closed the channel (zero-byte read).
    Closed,
    /// Fewer than [`HEADER_SIZE`] bytes arrived.
    ShortHeader(usize),
    /// The read itself failed.
    Io(std::io::ErrorKind),
    /// There was no connection to read from.
    NotConnected,
}

/// Outcome of one read from the peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// A reply frame arrived. The payload may be empty.
    Reply { opcode: i32, payload: Bytes },
    /// No reply frame could be read.
    Missing(ReadFailure),
}

impl Response {
    /// Parse the bytes of one read.
    ///
    /// The header is stripped. The payload is what follows it, bounded by the
    /// length field when the read carried more than one frame and by the
    /// bytes actually read when the reply was truncated.
    pub fn from_read(buf: &[u8]) -> Self {
        if buf.is_empty() {
            return Response::Missing(ReadFailure::Closed);
        }
        let Some(header) = Header::decode(buf) else {
            return Response::Missing(ReadFailure::ShortHeader(buf.len()));
        };
        let available = &buf[HEADER_SIZE..];
        let len = header.payload_len().min(available.len());
        Response::Reply {
            opcode: header.opcode,
            payload: Bytes::copy_from_slice(&available[..len]),
        }
    }

    /// Payload bytes, empty when nothing was read.
    pub fn body(&self) -> &[u8] {
        match self {
            Response::Reply { payload, .. } => payload,
            Response::Missing(_) => &[],
        }
    }

    /// Reply opcode, if a reply arrived.
    pub fn opcode(&self) -> Option<i32> {
        match self {
            Response::Reply { opcode, .. } => Some(*opcode),
            Response::Missing(_) => None,
        }
    }

    /// Check if no reply frame was read.
    pub fn is_missing(&self) -> bool {
        matches!(self, Response::Missing(_))
    }

    /// Check if the peer replied with a close frame.
    pub fn is_close(&self) -> bool {
        self.opcode() == Some(super::Opcode::Close.as_i32())
    }
}
