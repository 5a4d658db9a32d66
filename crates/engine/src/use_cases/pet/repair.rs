//! Turning raw model output into a valid [`StructuredReply`].
//!
//! Two stages:
//! 1. [`extract_structured`] strips formatting fences and parses JSON into a
//!    [`RawReply`], where every field is optional and loosely typed. This is
//!    the only stage that can fail.
//! 2. [`validate_and_repair`] maps the raw fields onto the domain vocabulary,
//!    clamps the position and fills defaults. It never fails.

use serde_json::Value;
use thiserror::Error;

use whiskers_domain::{Action, Mood, Position, PositionBounds, StructuredReply};

pub const DEFAULT_TEXT: &str = "Meow! I'm here for you!";
pub const DEFAULT_THOUGHT: &str = "I love my human!";

const FENCE: &str = "```";

/// Content could not be read as a reply object.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplyParseError {
    #[error("reply is not valid JSON: {0}")]
    NotJson(String),
    #[error("reply JSON is not an object")]
    NotAnObject,
}

/// Model output after parsing, before validation.
///
/// A field holding the wrong JSON type is read as absent. `new_position`
/// is present only when both coordinates are numeric.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawReply {
    pub text: Option<String>,
    pub action: Option<String>,
    pub thought: Option<String>,
    pub mood: Option<String>,
    pub new_position: Option<Position>,
}

impl RawReply {
    fn from_value(value: &Value) -> Result<Self, ReplyParseError> {
        let object = value.as_object().ok_or(ReplyParseError::NotAnObject)?;
        let string = |key: &str| object.get(key).and_then(Value::as_str).map(str::to_string);

        let new_position = object.get("new_position").and_then(|pos| {
            let x = pos.get("x").and_then(loose_number)?;
            let y = pos.get("y").and_then(loose_number)?;
            Some(Position::new(x, y))
        });

        Ok(Self {
            text: string("text"),
            action: string("action"),
            thought: string("thought"),
            mood: string("mood"),
            new_position,
        })
    }
}

/// Numbers, or strings holding numbers ("42").
fn loose_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Remove markdown code fences when the content starts with one.
///
/// The opening fence may carry a `json` tag. Every fence marker is removed,
/// not just the first and last.
pub fn strip_fences(raw: &str) -> String {
    let trimmed = raw.trim();
    let Some(after_open) = trimmed.strip_prefix(FENCE) else {
        return trimmed.to_string();
    };

    let body = match after_open.get(..4) {
        Some(tag) if tag.eq_ignore_ascii_case("json") => &after_open[4..],
        _ => after_open,
    };

    body.replace(FENCE, "").trim().to_string()
}

/// Parse model content into a [`RawReply`].
pub fn extract_structured(raw: &str) -> Result<RawReply, ReplyParseError> {
    let body = strip_fences(raw);

    let value: Value = serde_json::from_str(&body).map_err(|e| {
        tracing::warn!(error = %e, content = %raw, "Failed to parse model reply as JSON");
        ReplyParseError::NotJson(e.to_string())
    })?;

    RawReply::from_value(&value).inspect_err(|e| {
        tracing::warn!(error = %e, content = %raw, "Model reply has the wrong shape");
    })
}

/// Map a [`RawReply`] onto the domain, repairing whatever is out of range.
pub fn validate_and_repair(raw: RawReply) -> StructuredReply {
    let raw_action = raw.action.as_deref().unwrap_or(Action::default().as_str());
    let action = Action::repair(raw_action);
    if action.as_str() != raw_action {
        tracing::debug!(raw = %raw_action, repaired = %action, "Repaired reply action");
    }

    let raw_mood = raw.mood.as_deref().unwrap_or(Mood::default().as_str());
    let mood = Mood::repair(raw_mood);
    if mood.as_str() != raw_mood {
        tracing::debug!(raw = %raw_mood, repaired = %mood, "Repaired reply mood");
    }

    let new_position = raw.new_position.map(|pos| {
        let clamped = pos.clamped(PositionBounds::MODEL);
        if clamped != pos {
            tracing::debug!(
                raw_x = pos.x,
                raw_y = pos.y,
                x = clamped.x,
                y = clamped.y,
                "Clamped reply position"
            );
        }
        clamped
    });

    StructuredReply {
        text: raw.text.unwrap_or_else(|| DEFAULT_TEXT.to_string()),
        action,
        thought: raw.thought.unwrap_or_else(|| DEFAULT_THOUGHT.to_string()),
        new_position,
        mood,
    }
}
