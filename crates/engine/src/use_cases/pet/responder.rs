//! Producing a reply for a chat message.
//!
//! [`LlmPetResponder`] asks the model and repairs what comes back. Every
//! failure on that path (transport, status, envelope, unparseable content)
//! ends in [`fallback_reply`], so callers always get a valid reply.

use std::sync::Arc;

use async_trait::async_trait;

use whiskers_domain::{Action, Mood, PetState, PositionBounds, StructuredReply};

use super::repair::{extract_structured, validate_and_repair, DEFAULT_THOUGHT};
use crate::infrastructure::ports::{ChatMessage, FinishReason, LlmPort, LlmRequest, RandomPort};

/// Sampling temperature for chat replies.
pub const CHAT_TEMPERATURE: f32 = 0.5;

/// Cap on reply length. The JSON template fits comfortably.
pub const CHAT_MAX_TOKENS: u32 = 150;

/// Largest per-axis wander of a fallback reply.
pub const FALLBACK_WANDER: i32 = 15;

pub const FALLBACK_PHRASES: &[&str] = &[
    "Meow!",
    "Yes human!",
    "I hear you!",
    "What can I do?",
    "At your service!",
];

/// Produces the pet's reply to one chat message.
///
/// Implementations must not fail: degraded paths return a synthesized reply.
#[async_trait]
pub trait PetResponder: Send + Sync {
    async fn respond(&self, message: &str, state: &PetState) -> StructuredReply;
}

/// Responder backed by the language model.
pub struct LlmPetResponder {
    llm: Arc<dyn LlmPort>,
    random: Arc<dyn RandomPort>,
}

impl LlmPetResponder {
    pub fn new(llm: Arc<dyn LlmPort>, random: Arc<dyn RandomPort>) -> Self {
        Self { llm, random }
    }
}

#[async_trait]
impl PetResponder for LlmPetResponder {
    async fn respond(&self, message: &str, state: &PetState) -> StructuredReply {
        let request = LlmRequest::new(vec![ChatMessage::user(build_prompt(message, state))])
            .with_temperature(CHAT_TEMPERATURE)
            .with_max_tokens(Some(CHAT_MAX_TOKENS));

        let response = match self.llm.generate(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "Model call failed, using fallback reply");
                return fallback_reply(state, self.random.as_ref());
            }
        };

        if response.finish_reason == FinishReason::Length {
            tracing::warn!(
                max_tokens = CHAT_MAX_TOKENS,
                "Model reply hit the token cap and may be truncated"
            );
        }
        tracing::debug!(content = %response.content, "Model reply content");

        match extract_structured(&response.content) {
            Ok(raw) => validate_and_repair(raw),
            Err(e) => {
                tracing::warn!(error = %e, "Unusable model reply, using fallback reply");
                fallback_reply(state, self.random.as_ref())
            }
        }
    }
}

/// Prompt for one chat turn.
///
/// Embeds the current position so movement commands can be resolved by the
/// model, and pre-fills the answer template with it so "no movement" is the
/// easy default.
pub fn build_prompt(message: &str, state: &PetState) -> String {
    let pos = state.position();
    let actions = quoted_list(Action::all().iter().map(Action::as_str));
    let moods = quoted_list(Mood::all().iter().map(Mood::as_str));

    format!(
        r#"You are a cat. User says: "{message}"

Current position: x={x}, y={y}

Rules:
- If user says "come here" or "come", move to x:50, y:50
- If user says "move up", decrease y by 20
- If user says "move down", increase y by 20
- If user says "move left", decrease x by 20
- If user says "move right", increase x by 20
- If no movement command, keep current position
- action MUST be: {actions}
- mood MUST be: {moods}

Respond with JSON only:
{{"text": "short cat response", "action": "sitting", "thought": "brief thought", "new_position": {{"x": {x}, "y": {y}}}, "mood": "playful"}}"#,
        message = message,
        x = pos.x,
        y = pos.y,
        actions = actions,
        moods = moods,
    )
}

fn quoted_list<'a>(items: impl Iterator<Item = &'a str>) -> String {
    let quoted: Vec<String> = items.map(|s| format!("\"{}\"", s)).collect();
    match quoted.split_last() {
        Some((last, rest)) if !rest.is_empty() => format!("{}, or {}", rest.join(", "), last),
        Some((last, _)) => last.clone(),
        None => String::new(),
    }
}

/// Locally synthesized reply used whenever the model path fails.
///
/// The pet wanders a little from where it is, staying inside
/// [`PositionBounds::FALLBACK`].
pub fn fallback_reply(state: &PetState, random: &dyn RandomPort) -> StructuredReply {
    let text = FALLBACK_PHRASES[random.gen_index(FALLBACK_PHRASES.len())];
    let choices = Action::idle_choices();
    let action = choices[random.gen_index(choices.len())];

    let dx = random.gen_range(-FALLBACK_WANDER, FALLBACK_WANDER);
    let dy = random.gen_range(-FALLBACK_WANDER, FALLBACK_WANDER);
    let position = state
        .position()
        .offset(f64::from(dx), f64::from(dy), PositionBounds::FALLBACK);

    StructuredReply::new(text, DEFAULT_THOUGHT)
        .with_action(action)
        .with_mood(Mood::Playful)
        .with_position(position)
}
