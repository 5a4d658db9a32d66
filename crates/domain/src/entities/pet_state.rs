//! The shared pet.

use chrono::{DateTime, Duration, Utc};

use crate::value_objects::{Action, Mood, Position, PositionBounds, StructuredReply};

/// Thought shown before anyone has talked to the pet.
pub const INITIAL_THOUGHT: &str = "Hello! I'm ready to play!";

/// Current state of the one pet a process manages.
///
/// # Invariants
///
/// - `position` lies within [`PositionBounds::PLAYFIELD`] on both axes
/// - `last_interaction` strictly increases with every fold
///
/// [`PetState::apply_reply`] is the only mutator; fields are read-only
/// outside this module.
#[derive(Debug, Clone, PartialEq)]
pub struct PetState {
    position: Position,
    mood: Mood,
    action: Action,
    thought: String,
    last_interaction: DateTime<Utc>,
}

impl PetState {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            position: Position::CENTER,
            mood: Mood::default(),
            action: Action::default(),
            thought: INITIAL_THOUGHT.to_string(),
            last_interaction: now,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn mood(&self) -> Mood {
        self.mood
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn thought(&self) -> &str {
        &self.thought
    }

    pub fn last_interaction(&self) -> DateTime<Utc> {
        self.last_interaction
    }

    /// Fold a reply into the state.
    ///
    /// Replaces the position only when the reply carries one. Action, mood
    /// and thought are always replaced. If `now` does not advance past the
    /// previous interaction (coarse or skewed clocks), the timestamp is
    /// bumped by one microsecond instead.
    pub fn apply_reply(&mut self, reply: &StructuredReply, now: DateTime<Utc>) {
        if let Some(position) = reply.new_position {
            self.position = position.clamped(PositionBounds::PLAYFIELD);
        }
        self.action = reply.action;
        self.mood = reply.mood;
        self.thought = reply.thought.clone();
        self.last_interaction = if now > self.last_interaction {
            now
        } else {
            self.last_interaction + Duration::microseconds(1)
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    #[test]
    fn test_new_state_defaults() {
        let state = PetState::new(t0());
        assert_eq!(state.position(), Position::new(50.0, 50.0));
        assert_eq!(state.mood(), Mood::Playful);
        assert_eq!(state.action(), Action::Sitting);
        assert_eq!(state.thought(), INITIAL_THOUGHT);
        assert_eq!(state.last_interaction(), t0());
    }

    #[test]
    fn test_fold_without_position_keeps_position() {
        let mut state = PetState::new(t0());
        let reply = StructuredReply::new("Purr", "Nap time")
            .with_action(Action::Sleeping)
            .with_mood(Mood::Sleepy);

        state.apply_reply(&reply, t0() + Duration::seconds(5));

        assert_eq!(state.position(), Position::new(50.0, 50.0));
        assert_eq!(state.action(), Action::Sleeping);
        assert_eq!(state.mood(), Mood::Sleepy);
        assert_eq!(state.thought(), "Nap time");
        assert!(state.last_interaction() > t0());
    }

    #[test]
    fn test_fold_with_position_replaces_exactly() {
        let mut state = PetState::new(t0());
        let reply =
            StructuredReply::new("Zoom", "Over there").with_position(Position::new(30.0, 40.0));

        state.apply_reply(&reply, t0() + Duration::seconds(1));

        assert_eq!(state.position(), Position::new(30.0, 40.0));
    }

    #[test]
    fn test_fold_clamps_into_playfield() {
        let mut state = PetState::new(t0());
        let reply = StructuredReply::new("Wheee", "Off the edge")
            .with_position(Position::new(-5.0, 140.0));

        state.apply_reply(&reply, t0() + Duration::seconds(1));

        assert!(PositionBounds::PLAYFIELD.contains(state.position()));
        assert_eq!(state.position(), Position::new(0.0, 100.0));
    }

    #[test]
    fn test_last_interaction_strictly_increases_with_stalled_clock() {
        let mut state = PetState::new(t0());
        let reply = StructuredReply::new("Meow", "Hmm");

        state.apply_reply(&reply, t0());
        let first = state.last_interaction();
        assert!(first > t0());

        state.apply_reply(&reply, t0() - Duration::seconds(10));
        assert!(state.last_interaction() > first);
    }
}
