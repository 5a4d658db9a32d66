//! Mistral LLM client (OpenAI-compatible chat completions API)

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::infrastructure::config::LlmConfig;
use crate::infrastructure::ports::{
    FinishReason, LlmError, LlmPort, LlmRequest, LlmResponse, MessageRole,
};

/// Client for Mistral's chat completions endpoint.
///
/// `endpoint` is the full completions URL, so any OpenAI-compatible
/// provider can be pointed at without code changes.
#[derive(Clone)]
pub struct MistralClient {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
}

/// Default chat completions endpoint.
pub const DEFAULT_MISTRAL_BASE_URL: &str = "https://api.mistral.ai/v1/chat/completions";

/// Default model.
pub const DEFAULT_MISTRAL_MODEL: &str = "mistral-medium-2508";

/// Default request timeout.
pub const DEFAULT_LLM_TIMEOUT_SECS: u64 = 15;

impl MistralClient {
    pub fn new(endpoint: &str, api_key: &str, model: &str, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }

    pub fn from_config(config: &LlmConfig) -> Self {
        Self::new(
            &config.base_url,
            &config.api_key,
            &config.model,
            config.timeout,
        )
    }
}

#[async_trait]
impl LlmPort for MistralClient {
    async fn generate(&self, request: LlmRequest) -> Result<LlmResponse, LlmError> {
        let api_request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: build_messages(&request),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        tracing::debug!(
            model = %self.model,
            endpoint = %self.endpoint,
            "Sending chat completion request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&api_request)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        tracing::debug!(status = %status, "Chat completion response received");

        if !status.is_success() {
            let body = response.text().await.map_err(map_transport_error)?;
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let api_response: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        convert_response(api_response)
    }
}

fn map_transport_error(e: reqwest::Error) -> LlmError {
    if e.is_timeout() {
        LlmError::Timeout
    } else {
        LlmError::RequestFailed(e.to_string())
    }
}

fn build_messages(request: &LlmRequest) -> Vec<ApiMessage> {
    request
        .messages
        .iter()
        .map(|msg| ApiMessage {
            role: match msg.role {
                MessageRole::User => "user",
                MessageRole::Assistant => "assistant",
                MessageRole::System => "system",
            }
            .to_string(),
            content: Some(msg.content.clone()),
        })
        .collect()
}

fn convert_response(response: ChatCompletionResponse) -> Result<LlmResponse, LlmError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::InvalidResponse("No choices in LLM response".to_string()))?;

    let content = choice
        .message
        .content
        .ok_or_else(|| LlmError::InvalidResponse("Choice has no message content".to_string()))?;

    let finish_reason = match choice.finish_reason.as_deref() {
        Some("stop") | None => FinishReason::Stop,
        Some("length") | Some("model_length") => FinishReason::Length,
        Some("content_filter") => FinishReason::ContentFilter,
        Some(_) => FinishReason::Unknown,
    };

    Ok(LlmResponse {
        content,
        finish_reason,
    })
}

// =============================================================================
// Chat completions API types
// =============================================================================

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ApiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ApiMessage {
    role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ApiChoice>,
}

#[derive(Debug, Deserialize, Default)]
struct ApiChoice {
    message: ApiMessage,
    finish_reason: Option<String>,
}
