//! WebSocket message types.
//!
//! Every frame is a JSON object `{"event": <name>, "data": <payload>}`;
//! `data` is omitted for events without a payload.
//!
//! ## Versioning Policy
//!
//! - New variants can be added at the end (forward compatible)
//! - Renaming variants is a breaking change
//! - Unknown client events deserialize to `Unknown` for forward compatibility

use serde::{de, Deserialize, Deserializer, Serialize};

use crate::dto::{ChatReplyData, ChatRequest, ErrorData, PetStateData};

// =============================================================================
// Client Messages (browser → backend)
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Talk to the pet; handled exactly like `POST /api/chat`
    ChatMessage(ChatRequest),
    /// Keep-alive, answered with `pong`
    Heartbeat,
    /// Unknown event type for forward compatibility
    Unknown,
}

/// Envelope read before dispatching on `event`. Only `chat_message` looks at
/// `data`; every other event accepts and drops whatever payload it carries.
#[derive(Deserialize)]
struct ClientFrame {
    event: String,
    #[serde(default)]
    data: Option<serde_json::Value>,
}

impl<'de> Deserialize<'de> for ClientMessage {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let frame = ClientFrame::deserialize(deserializer)?;
        match frame.event.as_str() {
            "chat_message" => {
                let data = frame.data.ok_or_else(|| de::Error::missing_field("data"))?;
                ChatRequest::deserialize(data)
                    .map(ClientMessage::ChatMessage)
                    .map_err(de::Error::custom)
            }
            "heartbeat" => Ok(ClientMessage::Heartbeat),
            _ => Ok(ClientMessage::Unknown),
        }
    }
}

// =============================================================================
// Server Messages (backend → browser)
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Current state, sent once when a connection opens
    CatState(PetStateData),
    /// Result of a chat turn, broadcast to every subscriber
    CatResponse(ChatReplyData),
    Pong,
    Error(ErrorData),
}

impl ServerMessage {
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        ServerMessage::Error(ErrorData {
            code: code.into(),
            message: message.into(),
        })
    }

    /// Event name as it appears on the wire.
    pub fn event_name(&self) -> &'static str {
        match self {
            ServerMessage::CatState(_) => "cat_state",
            ServerMessage::CatResponse(_) => "cat_response",
            ServerMessage::Pong => "pong",
            ServerMessage::Error(_) => "error",
        }
    }
}
