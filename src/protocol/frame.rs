//! Frame struct with typed accessors.
//!
//! Represents a complete protocol frame with header and payload.
//! Uses `bytes::Bytes` for zero-copy payload sharing.
//!
//! # Example
//!
//! ```
//! use presence_relay::protocol::{Frame, Opcode};
//!
//! let frame = Frame::new(Opcode::Frame, &b"hello"[..]).unwrap();
//!
//! assert_eq!(frame.opcode(), 1);
//! assert_eq!(frame.payload(), b"hello");
//! assert_eq!(frame.to_bytes().len(), 8 + 5);
//! ```

use bytes::Bytes;

use super::wire_format::{Header, Opcode, HEADER_SIZE, MAX_PAYLOAD_SIZE};
use crate::error::Result;

/// A complete protocol frame.
///
/// The header is always derived from the payload, so the length field
/// matches the payload byte count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    header: Header,
    payload: Bytes,
}

impl Frame {
    /// Create a frame, rejecting payloads over [`MAX_PAYLOAD_SIZE`].
    pub fn new(opcode: Opcode, payload: impl Into<Bytes>) -> Result<Self> {
        Self::with_max_payload(opcode, payload, MAX_PAYLOAD_SIZE)
    }

    /// Create a frame with a custom payload ceiling.
    pub fn with_max_payload(
        opcode: Opcode,
        payload: impl Into<Bytes>,
        max_payload_size: usize,
    ) -> Result<Self> {
        let payload = payload.into();
        let header = Header::for_payload(opcode, payload.len(), max_payload_size)?;
        Ok(Self { header, payload })
    }

    /// Create a frame whose payload is the JSON encoding of `value`.
    pub fn json<T: serde::Serialize>(opcode: Opcode, value: &T) -> Result<Self> {
        let payload = crate::codec::JsonCodec::encode(value)?;
        Self::new(opcode, payload)
    }

    /// Get the header.
    #[inline]
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Get the raw opcode.
    #[inline]
    pub fn opcode(&self) -> i32 {
        self.header.opcode
    }

    /// Get a reference to the payload bytes.
    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Get the payload length.
    #[inline]
    pub fn payload_len(&self) -> usize {
        self.payload.len()
    }

    /// Serialize header and payload into one contiguous buffer.
    pub fn to_bytes(&self) -> Vec<u8> {
        build_frame(&self.header, &self.payload)
    }
}

/// Build a complete frame as a single byte vector.
///
/// Encodes header and appends payload into a contiguous buffer, so the
/// transport can hand it to the channel in one write.
///
/// # Example
///
/// ```
/// use presence_relay::protocol::{build_frame, Header, Opcode};
///
/// let header = Header::new(Opcode::Handshake, 2);
/// let bytes = build_frame(&header, b"{}");
/// assert_eq!(bytes, [0, 0, 0, 0, 2, 0, 0, 0, b'{', b'}']);
/// ```
pub fn build_frame(header: &Header, payload: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(HEADER_SIZE + payload.len());
    buf.extend_from_slice(&header.encode());
    buf.extend_from_slice(payload);
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_creation() {
        let frame = Frame::new(Opcode::Frame, Bytes::from_static(b"hello")).unwrap();

        assert_eq!(frame.opcode(), 1);
        assert_eq!(frame.header().payload_length, 5);
        assert_eq!(frame.payload(), b"hello");
        assert_eq!(frame.payload_len(), 5);
    }

    #[test]
    fn test_frame_empty_payload() {
        let frame = Frame::new(Opcode::Close, Bytes::new()).unwrap();

        assert_eq!(frame.payload_len(), 0);
        assert_eq!(frame.to_bytes(), [2, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_frame_rejects_oversized_payload() {
        let payload = vec![b'x'; 33];
        let result = Frame::with_max_payload(Opcode::Frame, payload, 32);
        assert!(result.is_err());
    }

    #[test]
    fn test_frame_json_payload() {
        let frame = Frame::json(Opcode::Handshake, &serde_json::json!({ "v": 1 })).unwrap();

        assert_eq!(frame.opcode(), 0);
        assert_eq!(frame.payload(), br#"{"v":1}"#);
        assert_eq!(frame.header().payload_length, 7);
    }

    #[test]
    fn test_build_frame_layout() {
        let frame = Frame::new(Opcode::Frame, &b"Paused: Track A"[..]).unwrap();
        let bytes = frame.to_bytes();

        assert_eq!(bytes.len(), HEADER_SIZE + 15);
        let parsed = Header::decode(&bytes[..HEADER_SIZE]).unwrap();
        assert_eq!(parsed.opcode, 1);
        assert_eq!(parsed.payload_len(), 15);
        assert_eq!(&bytes[HEADER_SIZE..], b"Paused: Track A");
    }

    #[test]
    fn test_length_field_matches_multibyte_payload() {
        // Length counts bytes, not characters.
        let frame = Frame::new(Opcode::Frame, "Björk – Jóga".to_string()).unwrap();
        assert_eq!(frame.header().payload_len(), "Björk – Jóga".len());
        assert_ne!(frame.header().payload_len(), "Björk – Jóga".chars().count());
    }
}
