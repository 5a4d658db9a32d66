//! Wire-format DTOs shared by the HTTP API and the websocket.
//!
//! `ChatReplyData` is both the `POST /api/chat` response body and the
//! payload of the `cat_response` broadcast, so the two can never drift.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use whiskers_domain::{Action, Mood, PetState, Position, StructuredReply};

/// `{x, y}` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionData {
    pub x: f64,
    pub y: f64,
}

impl From<Position> for PositionData {
    fn from(position: Position) -> Self {
        Self {
            x: position.x,
            y: position.y,
        }
    }
}

/// Snapshot of the pet as clients see it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetStateData {
    pub position: PositionData,
    pub mood: Mood,
    pub action: Action,
    pub thought: String,
    /// RFC 3339 timestamp
    pub last_interaction: DateTime<Utc>,
}

impl From<&PetState> for PetStateData {
    fn from(state: &PetState) -> Self {
        Self {
            position: state.position().into(),
            mood: state.mood(),
            action: state.action(),
            thought: state.thought().to_string(),
            last_interaction: state.last_interaction(),
        }
    }
}

/// Body of `POST /api/chat`, and payload of the `chat_message` client event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub text: String,
}

/// Result of one chat turn: the reply plus the state after the fold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReplyData {
    pub text: String,
    pub action: Action,
    pub thought: String,
    pub mood: Mood,
    /// Serialized as `null` when the pet stayed put
    pub new_position: Option<PositionData>,
    pub state: PetStateData,
}

impl ChatReplyData {
    pub fn new(reply: &StructuredReply, state: &PetState) -> Self {
        Self {
            text: reply.text.clone(),
            action: reply.action,
            thought: reply.thought.clone(),
            mood: reply.mood,
            new_position: reply.new_position.map(PositionData::from),
            state: state.into(),
        }
    }
}

/// Health check body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthData {
    pub message: String,
}

/// Payload of the websocket `error` event. HTTP errors use a plain
/// `{"error": message}` body instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorData {
    pub code: String,
    pub message: String,
}
