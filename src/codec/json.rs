//! JSON codec using `serde_json`.
//!
//! Every payload the presence host accepts or emits is a UTF-8 JSON object.
//! Outbound values are encoded compactly; the host rejects nothing for
//! whitespace, but compact output keeps frames well under the read buffer.
//!
//! # Example
//!
//! ```
//! use presence_relay::codec::JsonCodec;
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Hello {
//!     v: u32,
//!     client_id: String,
//! }
//!
//! let msg = Hello { v: 1, client_id: "42".to_string() };
//! let encoded = JsonCodec::encode(&msg).unwrap();
//! assert_eq!(&encoded[..], br#"{"v":1,"client_id":"42"}"#);
//! let decoded: Hello = JsonCodec::decode(&encoded).unwrap();
//! assert_eq!(decoded, msg);
//! ```

use bytes::Bytes;

use crate::error::Result;

/// JSON codec for frame payloads.
pub struct JsonCodec;

impl JsonCodec {
    /// Encode a value to compact JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns error if the value cannot be serialized.
    #[inline]
    pub fn encode<T: serde::Serialize>(value: &T) -> Result<Bytes> {
        Ok(Bytes::from(serde_json::to_vec(value)?))
    }

    /// Decode JSON bytes to a value.
    ///
    /// # Errors
    ///
    /// Returns error if the bytes are not valid JSON for type T.
    #[inline]
    pub fn decode<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Decode a reply leniently.
    ///
    /// Replies are advisory, so unparseable or truncated bodies yield `None`.
    #[inline]
    pub fn decode_lenient<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Option<T> {
        if bytes.is_empty() {
            return None;
        }
        serde_json::from_slice(bytes).ok()
    }
}
