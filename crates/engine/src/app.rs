//! Application state and composition.

use std::sync::Arc;

use tokio::sync::mpsc;
use uuid::Uuid;
use whiskers_shared::{ChatReplyData, PetStateData, ServerMessage};

use crate::api::ConnectionManager;
use crate::infrastructure::{
    clock::{SystemClock, SystemRandom},
    config::{AppConfig, ResponderConfig},
    mistral::MistralClient,
    ports::{ClockPort, RandomPort},
};
use crate::use_cases::pet::{KeywordPetResponder, LlmPetResponder, PetResponder};
use crate::use_cases::PetService;

/// Main application state.
///
/// Passed to HTTP/WebSocket handlers via Axum state.
pub struct App {
    pub pet: Arc<PetService>,
    pub connections: Arc<ConnectionManager>,
}

impl App {
    /// Wire the production dependencies described by `config`.
    pub fn new(config: &AppConfig) -> Self {
        let random: Arc<dyn RandomPort> = Arc::new(SystemRandom::new());

        let responder: Arc<dyn PetResponder> = match &config.responder {
            ResponderConfig::Llm(llm) => {
                tracing::info!(
                    model = %llm.model,
                    endpoint = %llm.base_url,
                    timeout_secs = llm.timeout.as_secs(),
                    "Using model responder"
                );
                let client = Arc::new(MistralClient::from_config(llm));
                Arc::new(LlmPetResponder::new(client, random))
            }
            ResponderConfig::Simple => {
                tracing::info!("Simple mode: using offline keyword responder");
                Arc::new(KeywordPetResponder::new(random))
            }
        };

        Self::with_responder(responder, Arc::new(SystemClock::new()))
    }

    pub fn with_responder(responder: Arc<dyn PetResponder>, clock: Arc<dyn ClockPort>) -> Self {
        Self {
            pet: Arc::new(PetService::new(responder, clock)),
            connections: Arc::new(ConnectionManager::new()),
        }
    }

    /// Add a websocket subscriber. Its first message is a `cat_state`
    /// snapshot taken atomically with the registration, so no `cat_response`
    /// can fall between the two.
    pub async fn subscribe(&self, connection_id: Uuid, sender: mpsc::Sender<ServerMessage>) {
        self.connections
            .register(connection_id, sender, || {
                ServerMessage::CatState(PetStateData::from(&self.pet.get_state()))
            })
            .await;
    }

    /// Run a chat turn and broadcast the result to every subscriber.
    ///
    /// Shared by `POST /api/chat` and the websocket `chat_message` event.
    pub async fn chat(&self, text: &str) -> ChatReplyData {
        let outcome = self.pet.handle_chat(text).await;
        let data = ChatReplyData::new(&outcome.reply, &outcome.state);
        self.connections
            .broadcast(ServerMessage::CatResponse(data.clone()))
            .await;
        data
    }
}
