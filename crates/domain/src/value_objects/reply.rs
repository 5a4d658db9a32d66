//! The structured reply produced once per chat turn.

use serde::{Deserialize, Serialize};

use super::{Action, Mood, Position};

/// A fully-valid reply, ready to be folded into [`crate::PetState`].
///
/// Produced either from repaired model output or synthesized locally.
/// `new_position` is `None` when the pet should stay where it is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredReply {
    pub text: String,
    pub action: Action,
    pub thought: String,
    pub new_position: Option<Position>,
    pub mood: Mood,
}

impl StructuredReply {
    pub fn new(text: impl Into<String>, thought: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            action: Action::default(),
            thought: thought.into(),
            new_position: None,
            mood: Mood::default(),
        }
    }

    pub fn with_action(mut self, action: Action) -> Self {
        self.action = action;
        self
    }

    pub fn with_mood(mut self, mood: Mood) -> Self {
        self.mood = mood;
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.new_position = Some(position);
        self
    }
}
