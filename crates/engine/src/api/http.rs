//! HTTP routes.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;

use whiskers_shared::{ChatReplyData, ChatRequest, HealthData, PetStateData};

use crate::app::App;

pub const HEALTH_MESSAGE: &str = "Whiskers backend";

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/api", get(health))
        .route("/api/", get(health))
        .route("/api/cat/state", get(get_state))
        .route("/api/chat", post(chat))
}

async fn health() -> Json<HealthData> {
    Json(HealthData {
        message: HEALTH_MESSAGE.to_string(),
    })
}

async fn get_state(State(app): State<Arc<App>>) -> Json<PetStateData> {
    Json(PetStateData::from(&app.pet.get_state()))
}

async fn chat(
    State(app): State<Arc<App>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatReplyData>, ApiError> {
    if request.text.trim().is_empty() {
        return Err(ApiError::BadRequest("text must not be empty".to_string()));
    }
    Ok(Json(app.chat(&request.text).await))
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
