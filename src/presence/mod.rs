//! Presence module - payload types and the session state machine.
//!
//! [`PresenceSession`] is the only surface the relay loop talks to:
//! `update(&PresenceState)` and `shutdown()`.

mod activity;
mod session;

pub use activity::{
    Activity, Assets, CloseReason, PresenceState, RpcMessage, HANDSHAKE_VERSION, MAX_FIELD_CHARS,
};
pub use session::{PresenceSession, SessionState};
