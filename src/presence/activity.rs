//! Presence payloads and the JSON commands that carry them.
//!
//! The transport treats these as opaque bytes; only the session knows how
//! to wrap an [`Activity`] into a `SET_ACTIVITY` command.

use serde::{Deserialize, Serialize};

/// Longest text the host displays in a single activity field.
pub const MAX_FIELD_CHARS: usize = 128;

/// Version number sent in the handshake.
pub const HANDSHAKE_VERSION: u32 = 1;

/// What the presence display should show.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    /// Status line, e.g. `Playing: Artist - Title`.
    pub state: String,
    /// Optional second line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assets: Option<Assets>,
}

impl Activity {
    /// Activity with just a status line.
    pub fn new(state: impl Into<String>) -> Self {
        Self {
            state: truncate_chars(state.into(), MAX_FIELD_CHARS),
            details: None,
            assets: None,
        }
    }

    /// Set the second line.
    pub fn details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(truncate_chars(details.into(), MAX_FIELD_CHARS));
        self
    }

    /// Set the image assets.
    pub fn assets(mut self, assets: Assets) -> Self {
        self.assets = Some(assets);
        self
    }

    /// Drop at least `excess` bytes from the end of the text lines,
    /// details first.
    ///
    /// Returns `false` when there was no text left to drop.
    pub(crate) fn shed_bytes(&mut self, excess: usize) -> bool {
        let mut dropped = 0;
        if let Some(details) = &mut self.details {
            dropped += drop_tail(details, excess);
            if details.is_empty() {
                self.details = None;
            }
        }
        dropped += drop_tail(&mut self.state, excess.saturating_sub(dropped));
        dropped > 0
    }
}

/// Image keys and hover texts uploaded with the application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assets {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub large_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub large_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub small_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub small_text: Option<String>,
}

/// Logical state handed to [`PresenceSession::update`](super::PresenceSession::update).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenceState {
    /// The source stopped; the presence should be hidden.
    Stopped,
    /// The source has content to show.
    Active(Activity),
}

/// Handshake payload (opcode 0).
#[derive(Debug, Serialize)]
pub(crate) struct Handshake<'a> {
    pub v: u32,
    pub client_id: &'a str,
}

impl<'a> Handshake<'a> {
    pub fn new(client_id: &'a str) -> Self {
        Self {
            v: HANDSHAKE_VERSION,
            client_id,
        }
    }
}

/// Command payload (opcode 1).
#[derive(Debug, Serialize)]
pub(crate) struct Command<'a> {
    pub cmd: &'static str,
    pub args: SetActivityArgs<'a>,
    pub nonce: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct SetActivityArgs<'a> {
    pub pid: u32,
    pub activity: &'a Activity,
}

impl<'a> Command<'a> {
    pub fn set_activity(activity: &'a Activity) -> Self {
        Self {
            cmd: "SET_ACTIVITY",
            args: SetActivityArgs {
                pid: std::process::id(),
                activity,
            },
            nonce: uuid::Uuid::new_v4().to_string(),
        }
    }
}

/// Any message the host sends back. All fields are optional so partial
/// or truncated replies still decode as far as they go.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RpcMessage {
    pub cmd: Option<String>,
    pub evt: Option<String>,
    pub data: Option<serde_json::Value>,
    pub nonce: Option<String>,
}

impl RpcMessage {
    /// Check if the host reported a command error.
    pub fn is_error(&self) -> bool {
        self.evt.as_deref() == Some("ERROR")
    }

    /// Error message carried in `data.message`, if any.
    pub fn error_message(&self) -> Option<&str> {
        self.data.as_ref()?.get("message")?.as_str()
    }
}

/// Body of a close frame sent by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CloseReason {
    pub code: i64,
    pub message: String,
}

fn truncate_chars(mut text: String, max: usize) -> String {
    if let Some((idx, _)) = text.char_indices().nth(max) {
        text.truncate(idx);
    }
    text
}

/// Cut at least `bytes` from the end of `text` on a char boundary.
fn drop_tail(text: &mut String, bytes: usize) -> usize {
    if bytes == 0 {
        return 0;
    }
    let len = text.len();
    let mut cut = len.saturating_sub(bytes);
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }
    text.truncate(cut);
    len - cut
}
