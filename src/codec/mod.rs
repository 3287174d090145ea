//! Codec module - serialization/deserialization for payloads.
//!
//! - [`JsonCodec`] - compact JSON using `serde_json`, the only payload
//!   encoding the presence host understands
//!
//! # Design
//!
//! Codecs are marker structs with static methods rather than trait objects,
//! so the encoding is fixed at compile time.

mod json;

pub use json::JsonCodec;
