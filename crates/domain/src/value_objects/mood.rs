//! Pet mood vocabulary.
//!
//! The set is closed: anything the model invents is mapped back into it
//! through [`Mood::repair`].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::DomainError;

/// Emotional state shown next to the pet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Sleepy,
    #[default]
    Playful,
    Curious,
    Aloof,
    Hungry,
}

/// Out-of-vocabulary moods models commonly produce, and what they mean here.
const MOOD_SYNONYMS: &[(&str, Mood)] = &[
    ("excited", Mood::Playful),
    ("happy", Mood::Playful),
    ("content", Mood::Curious),
    ("relaxed", Mood::Sleepy),
    ("energetic", Mood::Playful),
    ("calm", Mood::Curious),
];

impl Mood {
    pub fn all() -> &'static [Mood] {
        &[
            Mood::Sleepy,
            Mood::Playful,
            Mood::Curious,
            Mood::Aloof,
            Mood::Hungry,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Sleepy => "sleepy",
            Mood::Playful => "playful",
            Mood::Curious => "curious",
            Mood::Aloof => "aloof",
            Mood::Hungry => "hungry",
        }
    }

    /// Look up a synonym from the fixed table.
    pub fn from_synonym(raw: &str) -> Option<Mood> {
        let key = raw.trim().to_lowercase();
        MOOD_SYNONYMS
            .iter()
            .find(|(synonym, _)| *synonym == key)
            .map(|(_, mood)| *mood)
    }

    /// Map any string onto the vocabulary: members pass through, synonyms are
    /// translated, everything else becomes the default mood.
    pub fn repair(raw: &str) -> Mood {
        raw.parse()
            .ok()
            .or_else(|| Self::from_synonym(raw))
            .unwrap_or_default()
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Mood {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sleepy" => Ok(Mood::Sleepy),
            "playful" => Ok(Mood::Playful),
            "curious" => Ok(Mood::Curious),
            "aloof" => Ok(Mood::Aloof),
            "hungry" => Ok(Mood::Hungry),
            _ => Err(DomainError::parse(format!("Unknown mood: {}", s))),
        }
    }
}
