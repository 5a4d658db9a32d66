//! Pet action vocabulary.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::DomainError;

/// What the pet is currently doing; drives the client animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Walking,
    #[default]
    Sitting,
    Sleeping,
    Playing,
    Grooming,
    Stretching,
}

const ACTION_SYNONYMS: &[(&str, Action)] = &[
    ("pawing_at_nothing", Action::Playing),
    ("pouncing", Action::Playing),
    ("meowing", Action::Sitting),
    ("purring", Action::Sitting),
    ("hunting", Action::Playing),
    ("exploring", Action::Walking),
    ("resting", Action::Sitting),
    ("lounging", Action::Sitting),
];

impl Action {
    pub fn all() -> &'static [Action] {
        &[
            Action::Walking,
            Action::Sitting,
            Action::Sleeping,
            Action::Playing,
            Action::Grooming,
            Action::Stretching,
        ]
    }

    /// Actions the fallback responder picks from.
    pub fn idle_choices() -> &'static [Action] {
        &[
            Action::Sitting,
            Action::Walking,
            Action::Playing,
            Action::Stretching,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Walking => "walking",
            Action::Sitting => "sitting",
            Action::Sleeping => "sleeping",
            Action::Playing => "playing",
            Action::Grooming => "grooming",
            Action::Stretching => "stretching",
        }
    }

    pub fn from_synonym(raw: &str) -> Option<Action> {
        let key = raw.trim().to_lowercase();
        ACTION_SYNONYMS
            .iter()
            .find(|(synonym, _)| *synonym == key)
            .map(|(_, action)| *action)
    }

    /// Map any string onto the vocabulary, defaulting to sitting.
    pub fn repair(raw: &str) -> Action {
        raw.parse()
            .ok()
            .or_else(|| Self::from_synonym(raw))
            .unwrap_or_default()
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Action {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "walking" => Ok(Action::Walking),
            "sitting" => Ok(Action::Sitting),
            "sleeping" => Ok(Action::Sleeping),
            "playing" => Ok(Action::Playing),
            "grooming" => Ok(Action::Grooming),
            "stretching" => Ok(Action::Stretching),
            _ => Err(DomainError::parse(format!("Unknown action: {}", s))),
        }
    }
}
