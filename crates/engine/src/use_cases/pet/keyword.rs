//! Offline responder for simple mode.
//!
//! Matches the message against a few keyword groups, first hit wins.
//! Keywords match whole words only, so "hi" does not fire on "this".

use std::sync::Arc;

use async_trait::async_trait;

use whiskers_domain::{Action, Mood, PetState, Position, PositionBounds, StructuredReply};

use super::responder::{PetResponder, FALLBACK_PHRASES};
use crate::infrastructure::ports::RandomPort;

pub const KEYWORD_THOUGHT: &str = "I love chatting with my human!";

/// Per-axis step for directional moves and play wander.
const STEP: i32 = 20;

/// Range for a move with no direction.
const ROAM_MIN: i32 = 30;
const ROAM_MAX: i32 = 70;

const GREETINGS: &[&str] = &["hello", "hi", "hey"];
const WELLBEING_QUESTIONS: &[&str] = &["how are you", "how's it going", "how do you feel"];
const COME_WORDS: &[&str] = &["come", "here", "over"];
const SIT_WORDS: &[&str] = &["sit", "stay", "down"];
const PLAY_WORDS: &[&str] = &["play", "fun", "toy"];
const MOVE_WORDS: &[&str] = &["move", "walk", "go"];

const WELLBEING_PHRASES: &[&str] = &[
    "I'm doing great! Thank you for asking! *purrs happily*",
    "I'm wonderful! Just enjoying life as a digital cat! *stretches contentedly*",
    "I'm fantastic! Ready to play or chat whenever you want! *tail swishes*",
    "I'm doing purr-fectly! How are you doing, human?",
    "I'm feeling great! Thanks for caring about me! *rubs against screen*",
];
const GREETING_PHRASES: &[&str] = &[
    "Hello human!",
    "Hi there!",
    "Meow hello!",
    "Purr! Hi!",
    "Greetings! *wave paw*",
];
const COMING_PHRASES: &[&str] = &[
    "Coming right away!",
    "On my way!",
    "Here I come!",
    "Yes, master!",
];
const SITTING_PHRASES: &[&str] = &[
    "Sitting pretty!",
    "I'm sitting!",
    "Good cat position!",
    "Sitting like a good kitty!",
];
const PLAY_PHRASES: &[&str] = &["Let's play!", "Playtime!", "I love playing!", "Yay, games!"];
const ROAM_PHRASES: &[&str] = &[
    "Moving as requested!",
    "Going where you want!",
    "Walking around!",
    "On the move!",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    const ALL: [Direction; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    fn word(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    /// Screen coordinates: y grows downwards.
    fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -STEP),
            Self::Down => (0, STEP),
            Self::Left => (-STEP, 0),
            Self::Right => (STEP, 0),
        }
    }

    fn phrases(self) -> &'static [&'static str] {
        match self {
            Self::Up => &["Moving up!", "Going up as requested!", "Upward bound!"],
            Self::Down => &["Moving down!", "Going down as requested!", "Downward bound!"],
            Self::Left => &["Moving left!", "Going left as requested!", "Leftward bound!"],
            Self::Right => &["Moving right!", "Going right as requested!", "Rightward bound!"],
        }
    }
}

/// Lowercased words of a message. Apostrophes stay inside words.
struct Words(Vec<String>);

impl Words {
    fn new(message: &str) -> Self {
        Self(
            message
                .to_lowercase()
                .split(|c: char| !(c.is_alphanumeric() || c == '\''))
                .filter(|w| !w.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    /// True when `phrase` occurs as a run of whole words.
    fn has_phrase(&self, phrase: &str) -> bool {
        let needle: Vec<&str> = phrase.split_whitespace().collect();
        if needle.is_empty() || needle.len() > self.0.len() {
            return false;
        }
        self.0
            .windows(needle.len())
            .any(|window| window.iter().zip(&needle).all(|(w, n)| w == n))
    }

    fn has_any(&self, phrases: &[&str]) -> bool {
        phrases.iter().any(|p| self.has_phrase(p))
    }
}

/// Responder that never leaves the process.
pub struct KeywordPetResponder {
    random: Arc<dyn RandomPort>,
}

impl KeywordPetResponder {
    pub fn new(random: Arc<dyn RandomPort>) -> Self {
        Self { random }
    }

    fn pick(&self, phrases: &[&str]) -> String {
        phrases[self.random.gen_index(phrases.len())].to_string()
    }

    fn reply(&self, message: &str, state: &PetState) -> StructuredReply {
        let words = Words::new(message);
        let here = state.position();

        let (text, action, position) = if words.has_any(GREETINGS) {
            let phrases = if words.has_any(WELLBEING_QUESTIONS) {
                WELLBEING_PHRASES
            } else {
                GREETING_PHRASES
            };
            (self.pick(phrases), Action::Sitting, here)
        } else if words.has_any(COME_WORDS) {
            (self.pick(COMING_PHRASES), Action::Walking, Position::CENTER)
        } else if words.has_any(SIT_WORDS) {
            (self.pick(SITTING_PHRASES), Action::Sitting, here)
        } else if words.has_any(PLAY_WORDS) {
            let dx = self.random.gen_range(-STEP, STEP);
            let dy = self.random.gen_range(-STEP, STEP);
            let position = here.offset(f64::from(dx), f64::from(dy), PositionBounds::FALLBACK);
            (self.pick(PLAY_PHRASES), Action::Playing, position)
        } else if words.has_any(MOVE_WORDS) {
            match Direction::ALL.into_iter().find(|d| words.has_phrase(d.word())) {
                Some(direction) => {
                    let (dx, dy) = direction.delta();
                    let position =
                        here.offset(f64::from(dx), f64::from(dy), PositionBounds::FALLBACK);
                    (self.pick(direction.phrases()), Action::Walking, position)
                }
                None => {
                    let x = self.random.gen_range(ROAM_MIN, ROAM_MAX);
                    let y = self.random.gen_range(ROAM_MIN, ROAM_MAX);
                    let position = Position::new(f64::from(x), f64::from(y))
                        .clamped(PositionBounds::FALLBACK);
                    (self.pick(ROAM_PHRASES), Action::Walking, position)
                }
            }
        } else {
            (self.pick(FALLBACK_PHRASES), Action::Sitting, here)
        };

        StructuredReply::new(text, KEYWORD_THOUGHT)
            .with_action(action)
            .with_mood(Mood::Playful)
            .with_position(position)
    }
}

#[async_trait]
impl PetResponder for KeywordPetResponder {
    async fn respond(&self, message: &str, state: &PetState) -> StructuredReply {
        let reply = self.reply(message, state);
        tracing::debug!(action = %reply.action, text = %reply.text, "Keyword reply");
        reply
    }
}
