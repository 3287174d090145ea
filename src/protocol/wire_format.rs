//! Wire format encoding and decoding.
//!
//! Implements the 8-byte header format:
//! ```text
//! ┌──────────┬──────────┬─────────────────┐
//! │ Opcode   │ Length   │ Payload         │
//! │ 4 bytes  │ 4 bytes  │ `Length` bytes  │
//! │ int32 LE │ int32 LE │ UTF-8 JSON      │
//! └──────────┴──────────┴─────────────────┘
//! ```
//!
//! All multi-byte integers are Little Endian. The length counts payload
//! bytes only.

use crate::error::{PresenceError, Result};

/// Header size in bytes (fixed, exactly 8).
pub const HEADER_SIZE: usize = 8;

/// Size of the buffer a single read fills. The host reads with the same size.
pub const READ_BUFFER_SIZE: usize = 512;

/// Largest outbound payload: a whole frame must fit one host read, and
/// frames are never chunked.
pub const MAX_PAYLOAD_SIZE: usize = READ_BUFFER_SIZE - HEADER_SIZE;

/// Opcodes defined by the presence host protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum Opcode {
    /// Client hello carrying the application id.
    Handshake = 0,
    /// Regular command or event.
    Frame = 1,
    /// Orderly teardown; the peer also uses it to reject a client.
    Close = 2,
    Ping = 3,
    Pong = 4,
}

impl Opcode {
    /// Map a raw wire value to a known opcode.
    pub fn from_i32(raw: i32) -> Option<Self> {
        match raw {
            0 => Some(Opcode::Handshake),
            1 => Some(Opcode::Frame),
            2 => Some(Opcode::Close),
            3 => Some(Opcode::Ping),
            4 => Some(Opcode::Pong),
            _ => None,
        }
    }

    /// Raw wire value.
    #[inline]
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl From<Opcode> for i32 {
    fn from(opcode: Opcode) -> Self {
        opcode.as_i32()
    }
}

/// Decoded header from wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Raw opcode; peers may send values this crate does not name.
    pub opcode: i32,
    /// Payload length in bytes, as carried on the wire.
    pub payload_length: i32,
}

impl Header {
    /// Create a new header.
    pub fn new(opcode: impl Into<i32>, payload_length: i32) -> Self {
        Self {
            opcode: opcode.into(),
            payload_length,
        }
    }

    /// Create the header for a payload of `len` bytes.
    ///
    /// Fails if `len` does not fit the wire's signed length field or exceeds
    /// `max_payload_size`.
    pub fn for_payload(opcode: impl Into<i32>, len: usize, max_payload_size: usize) -> Result<Self> {
        if len > max_payload_size {
            return Err(PresenceError::Protocol(format!(
                "Payload size {} exceeds maximum {}",
                len, max_payload_size
            )));
        }
        let payload_length = i32::try_from(len).map_err(|_| {
            PresenceError::Protocol(format!("Payload size {} does not fit the length field", len))
        })?;
        Ok(Self::new(opcode, payload_length))
    }

    /// Encode header to bytes (Little Endian).
    ///
    /// # Example
    ///
    /// ```
    /// use presence_relay::protocol::{Header, Opcode};
    ///
    /// let header = Header::new(Opcode::Frame, 5);
    /// assert_eq!(header.encode(), [1, 0, 0, 0, 5, 0, 0, 0]);
    /// ```
    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        buf[0..4].copy_from_slice(&self.opcode.to_le_bytes());
        buf[4..8].copy_from_slice(&self.payload_length.to_le_bytes());
        buf
    }

    /// Decode header from bytes (Little Endian).
    ///
    /// Returns `None` if buffer is too short.
    ///
    /// # Example
    ///
    /// ```
    /// use presence_relay::protocol::Header;
    ///
    /// let header = Header::decode(&[2, 0, 0, 0, 42, 0, 0, 0]).unwrap();
    /// assert_eq!(header.opcode, 2);
    /// assert_eq!(header.payload_length, 42);
    /// ```
    pub fn decode(buf: &[u8]) -> Option<Self> {
        if buf.len() < HEADER_SIZE {
            return None;
        }
        Some(Self {
            opcode: i32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]),
            payload_length: i32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]),
        })
    }

    /// Known opcode, if the raw value is one.
    #[inline]
    pub fn known_opcode(&self) -> Option<Opcode> {
        Opcode::from_i32(self.opcode)
    }

    /// Payload length as a byte count.
    ///
    /// Negative lengths from a misbehaving peer read as zero.
    #[inline]
    pub fn payload_len(&self) -> usize {
        usize::try_from(self.payload_length).unwrap_or(0)
    }

    /// Check if this is a close frame.
    #[inline]
    pub fn is_close(&self) -> bool {
        self.opcode == Opcode::Close.as_i32()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_encode_decode_roundtrip() {
        for (opcode, len) in [(0, 0), (1, 27), (2, 511), (4, i32::MAX)] {
            let original = Header::new(opcode, len);
            let decoded = Header::decode(&original.encode()).unwrap();
            assert_eq!(original, decoded);
        }
    }

    #[test]
    fn test_header_little_endian_byte_order() {
        let header = Header::new(0x0102_0304, 0x0506_0708);
        let bytes = header.encode();

        assert_eq!(&bytes[0..4], &[0x04, 0x03, 0x02, 0x01]);
        assert_eq!(&bytes[4..8], &[0x08, 0x07, 0x06, 0x05]);
    }

    #[test]
    fn test_header_size_is_exactly_8() {
        assert_eq!(HEADER_SIZE, 8);
        assert_eq!(Header::new(Opcode::Handshake, 0).encode().len(), 8);
    }

    #[test]
    fn test_decode_too_short_buffer() {
        let buf = [0u8; 7];
        assert!(Header::decode(&buf).is_none());
    }

    #[test]
    fn test_for_payload_counts_bytes() {
        let header = Header::for_payload(Opcode::Frame, 17, MAX_PAYLOAD_SIZE).unwrap();
        assert_eq!(header.opcode, 1);
        assert_eq!(header.payload_length, 17);
    }

    #[test]
    fn test_max_frame_fits_one_read() {
        assert_eq!(MAX_PAYLOAD_SIZE + HEADER_SIZE, READ_BUFFER_SIZE);
        assert!(Header::for_payload(Opcode::Frame, MAX_PAYLOAD_SIZE, MAX_PAYLOAD_SIZE).is_ok());
        assert!(Header::for_payload(Opcode::Frame, MAX_PAYLOAD_SIZE + 1, MAX_PAYLOAD_SIZE).is_err());
    }

    #[test]
    fn test_for_payload_too_large() {
        let result = Header::for_payload(Opcode::Frame, 101, 100);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("exceeds maximum"));
    }

    #[test]
    fn test_negative_length_reads_as_zero() {
        let header = Header::decode(&[1, 0, 0, 0, 0xFF, 0xFF, 0xFF, 0xFF]).unwrap();
        assert_eq!(header.payload_length, -1);
        assert_eq!(header.payload_len(), 0);
    }

    #[test]
    fn test_opcode_mapping() {
        assert_eq!(Opcode::from_i32(0), Some(Opcode::Handshake));
        assert_eq!(Opcode::from_i32(2), Some(Opcode::Close));
        assert_eq!(Opcode::from_i32(4), Some(Opcode::Pong));
        assert_eq!(Opcode::from_i32(5), None);
        assert_eq!(i32::from(Opcode::Frame), 1);
    }

    #[test]
    fn test_header_accessors() {
        let close = Header::new(Opcode::Close, 0);
        assert!(close.is_close());
        assert_eq!(close.known_opcode(), Some(Opcode::Close));

        let unknown = Header::new(99, 0);
        assert!(!unknown.is_close());
        assert_eq!(unknown.known_opcode(), None);
    }
}
