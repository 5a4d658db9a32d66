//! The pet service: owns the shared state and runs chat turns.

mod keyword;
mod repair;
mod responder;

pub use keyword::{KeywordPetResponder, KEYWORD_THOUGHT};
pub use repair::{
    extract_structured, strip_fences, validate_and_repair, RawReply, ReplyParseError,
    DEFAULT_TEXT, DEFAULT_THOUGHT,
};
pub use responder::{
    build_prompt, fallback_reply, LlmPetResponder, PetResponder, CHAT_MAX_TOKENS,
    CHAT_TEMPERATURE, FALLBACK_PHRASES,
};

use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::Mutex;

use whiskers_domain::{PetState, StructuredReply};

use crate::infrastructure::ports::ClockPort;

/// Result of one chat turn.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatOutcome {
    pub reply: StructuredReply,
    /// State right after this turn's fold.
    pub state: PetState,
}

/// Owner of the single pet.
///
/// Chat turns are serialized through `chat_gate`, which stays held across
/// the responder call, so each prompt sees the previous turn's fold. The
/// state lock is only taken for the snapshot and the fold, so readers never
/// wait on the model.
pub struct PetService {
    responder: Arc<dyn PetResponder>,
    clock: Arc<dyn ClockPort>,
    chat_gate: Mutex<()>,
    state: RwLock<PetState>,
}

impl PetService {
    pub fn new(responder: Arc<dyn PetResponder>, clock: Arc<dyn ClockPort>) -> Self {
        let state = PetState::new(clock.now());
        Self {
            responder,
            clock,
            chat_gate: Mutex::new(()),
            state: RwLock::new(state),
        }
    }

    /// Snapshot of the current state.
    pub fn get_state(&self) -> PetState {
        // A fold cannot leave the state half-written, so a poisoned lock is
        // still safe to read.
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Run one chat turn: ask the responder, then fold its reply.
    pub async fn handle_chat(&self, message: &str) -> ChatOutcome {
        let _turn = self.chat_gate.lock().await;

        let snapshot = self.get_state();
        tracing::info!(message = %message, "Handling chat message");

        let reply = self.responder.respond(message, &snapshot).await;

        let state = {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            state.apply_reply(&reply, self.clock.now());
            state.clone()
        };

        tracing::info!(
            action = %reply.action,
            mood = %reply.mood,
            x = state.position().x,
            y = state.position().y,
            "Chat turn complete"
        );

        ChatOutcome { reply, state }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::{FixedClock, SystemClock, SystemRandom};
    use crate::infrastructure::ports::{LlmResponse, MockClockPort, MockLlmPort};
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use std::time::Duration;
    use whiskers_domain::{Action, Mood, Position, INITIAL_THOUGHT};

    fn service_with_llm(llm: MockLlmPort) -> PetService {
        let responder = LlmPetResponder::new(Arc::new(llm), Arc::new(SystemRandom::new()));
        PetService::new(Arc::new(responder), Arc::new(SystemClock::new()))
    }

    #[test]
    fn test_initial_state() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).single().expect("valid date");
        let service = PetService::new(
            Arc::new(KeywordPetResponder::new(Arc::new(SystemRandom::new()))),
            Arc::new(FixedClock(now)),
        );

        let state = service.get_state();
        assert_eq!(state.position(), Position::CENTER);
        assert_eq!(state.mood(), Mood::Playful);
        assert_eq!(state.action(), Action::Sitting);
        assert_eq!(state.thought(), INITIAL_THOUGHT);
        assert_eq!(state.last_interaction(), now);
    }

    #[tokio::test]
    async fn test_move_up_end_to_end() {
        let mut llm = MockLlmPort::new();
        llm.expect_generate()
            .withf(|req| req.messages[0].content.contains("Current position: x=50, y=50"))
            .times(1)
            .returning(|_| {
                Ok(LlmResponse::text(
                    "```json\n{\"text\":\"Up I go!\",\"action\":\"walking\",\"thought\":\"...\",\"new_position\":{\"x\":50,\"y\":30},\"mood\":\"playful\"}\n```",
                ))
            });
        let service = service_with_llm(llm);
        let before = service.get_state().last_interaction();

        let outcome = service.handle_chat("move up").await;

        assert_eq!(outcome.reply.text, "Up I go!");
        assert_eq!(outcome.state.position(), Position::new(50.0, 30.0));
        assert_eq!(outcome.state.action(), Action::Walking);
        assert_eq!(outcome.state.mood(), Mood::Playful);
        assert_eq!(outcome.state.thought(), "...");
        assert!(outcome.state.last_interaction() > before);
        assert_eq!(service.get_state(), outcome.state);
    }

    #[tokio::test]
    async fn test_reply_without_position_keeps_position() {
        let mut llm = MockLlmPort::new();
        llm.expect_generate()
            .times(1)
            .returning(|_| Ok(LlmResponse::text(r#"{"text":"Purr","action":"grooming"}"#)));
        let service = service_with_llm(llm);

        let outcome = service.handle_chat("good kitty").await;
        assert_eq!(outcome.reply.new_position, None);
        assert_eq!(outcome.state.position(), Position::CENTER);
        assert_eq!(outcome.state.action(), Action::Grooming);
    }

    #[tokio::test]
    async fn test_last_interaction_increases_with_frozen_clock() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).single().expect("valid date");
        let mut clock = MockClockPort::new();
        clock.expect_now().return_const(now);
        let service = PetService::new(
            Arc::new(KeywordPetResponder::new(Arc::new(SystemRandom::new()))),
            Arc::new(clock),
        );

        let first = service.handle_chat("sit").await.state.last_interaction();
        let second = service.handle_chat("sit").await.state.last_interaction();
        assert!(first > now);
        assert!(second > first);
    }

    /// Records the position each call observed, then answers after a pause
    /// with a fixed position.
    struct SlowRecordingResponder {
        seen: std::sync::Mutex<Vec<Position>>,
    }

    #[async_trait]
    impl PetResponder for SlowRecordingResponder {
        async fn respond(&self, message: &str, state: &PetState) -> StructuredReply {
            self.seen
                .lock()
                .expect("recorder lock")
                .push(state.position());
            tokio::time::sleep(Duration::from_millis(50)).await;
            let position = if message == "first" {
                Position::new(20.0, 20.0)
            } else {
                Position::new(70.0, 70.0)
            };
            StructuredReply::new(message, "").with_position(position)
        }
    }

    #[tokio::test]
    async fn test_concurrent_chats_are_serialized() {
        let responder = Arc::new(SlowRecordingResponder {
            seen: std::sync::Mutex::new(Vec::new()),
        });
        let service = Arc::new(PetService::new(
            responder.clone(),
            Arc::new(SystemClock::new()),
        ));

        let (a, b) = tokio::join!(service.handle_chat("first"), service.handle_chat("second"));

        let final_position = service.get_state().position();
        assert!(
            final_position == a.state.position() || final_position == b.state.position(),
            "final state must come from one of the turns"
        );

        // Whichever turn ran second saw the first turn's fold.
        let seen = responder.seen.lock().expect("recorder lock").clone();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], Position::CENTER);
        let first_folded = if a.state.last_interaction() < b.state.last_interaction() {
            a.state.position()
        } else {
            b.state.position()
        };
        assert_eq!(seen[1], first_folded);
    }

    #[tokio::test]
    async fn test_state_readable_while_model_is_thinking() {
        let responder = Arc::new(SlowRecordingResponder {
            seen: std::sync::Mutex::new(Vec::new()),
        });
        let service = Arc::new(PetService::new(responder, Arc::new(SystemClock::new())));

        let chat = {
            let service = service.clone();
            tokio::spawn(async move { service.handle_chat("first").await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;

        // The turn is still in flight: the read returns the old state at once.
        assert_eq!(service.get_state().position(), Position::CENTER);

        let outcome = chat.await.expect("chat task");
        assert_eq!(outcome.state.position(), Position::new(20.0, 20.0));
    }
}
