//! Protocol module - wire format, framing, and responses.
//!
//! This module implements the binary protocol spoken with the presence host:
//! - 8-byte little-endian header encoding/decoding
//! - Frame struct with a header always derived from its payload
//! - Best-effort [`Response`] produced by one read

mod frame;
mod response;
mod wire_format;

pub use frame::{build_frame, Frame};
pub use response::{ReadFailure, Response};
pub use wire_format::{Header, Opcode, HEADER_SIZE, MAX_PAYLOAD_SIZE, READ_BUFFER_SIZE};
