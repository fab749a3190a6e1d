// expert_llm/src/lib.rs

//! OpenAI-compatible chat completion client.

use async_trait::async_trait;
use common_utils::LlmSettings;
use expert_core::{ChatBackend, ChatMessage, ExpertError, ExternalFailureKind};
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Model every request is sent to.
pub const MODEL_NAME: &str = "gpt-3.5-turbo";
/// Sampling temperature; zero asks the provider for its most deterministic output.
pub const TEMPERATURE: f32 = 0.0;

const MAX_ERROR_BODY_CHARS: usize = 500;

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
}

#[derive(Deserialize)] struct ChatChoice { message: ChatMessageContent }
#[derive(Deserialize)] struct ChatMessageContent { content: Option<String> }
#[derive(Deserialize)] struct ChatCompletionResponse { choices: Vec<ChatChoice> }

// Provider error envelope: {"error": {"message": "...", ...}}
#[derive(Deserialize)] struct ProviderErrorBody { error: ProviderError }
#[derive(Deserialize)] struct ProviderError { message: String }

pub struct OpenAiChatClient {
    client: Client,
    chat_url: String,
    auth_header: HeaderValue,
}

impl OpenAiChatClient {
    /// Builds the client. Fails with a configuration error when the key is
    /// unusable or the HTTP client cannot be constructed.
    pub fn new(settings: &LlmSettings) -> Result<Self, ExpertError> {
        let api_key = settings.api_key.trim();
        if api_key.is_empty() {
            return Err(ExpertError::configuration("API key is empty"));
        }

        let mut auth_header = HeaderValue::from_str(&format!("Bearer {}", api_key)).map_err(|_| {
            ExpertError::configuration("API key contains characters that cannot be sent in an HTTP header")
        })?;
        auth_header.set_sensitive(true);

        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| ExpertError::configuration(format!("failed to build HTTP client: {}", e)))?;

        let chat_url = format!("{}/chat/completions", settings.base_url.trim_end_matches('/'));
        tracing::info!("[LlmClient] Initialized for {} (model {}, timeout {:?})", chat_url, MODEL_NAME, settings.timeout);

        Ok(Self { client, chat_url, auth_header })
    }
}

#[async_trait]
impl ChatBackend for OpenAiChatClient {
    fn name(&self) -> &'static str { "openai" }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ExpertError> {
        let request_body = ChatCompletionRequest {
            model: MODEL_NAME,
            messages,
            temperature: TEMPERATURE,
        };

        tracing::debug!("[LlmClient] POST {} with {} messages", self.chat_url, messages.len());
        let response = self
            .client
            .post(&self.chat_url)
            .header(AUTHORIZATION, self.auth_header.clone())
            .json(&request_body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let response_text = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            tracing::warn!("[LlmClient] Provider returned status {}", status);
            return Err(status_error(status.as_u16(), &response_text));
        }

        let chat_response: ChatCompletionResponse = serde_json::from_str(&response_text).map_err(|e| {
            ExpertError::external(
                ExternalFailureKind::MalformedResponse,
                format!("failed to parse completion: {}. Raw text: {}", e, truncate(&response_text)),
            )
        })?;

        chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                ExpertError::external(ExternalFailureKind::MalformedResponse, "completion contained no message content")
            })
    }
}

fn transport_error(e: reqwest::Error) -> ExpertError {
    let kind = if e.is_timeout() {
        ExternalFailureKind::Timeout
    } else if e.is_decode() {
        ExternalFailureKind::MalformedResponse
    } else {
        ExternalFailureKind::Connection
    };
    ExpertError::external(kind, e.to_string())
}

fn status_error(status: u16, body: &str) -> ExpertError {
    let message = match serde_json::from_str::<ProviderErrorBody>(body) {
        Ok(parsed) => parsed.error.message,
        Err(_) if body.trim().is_empty() => format!("HTTP status {}", status),
        Err(_) => truncate(body),
    };
    ExpertError::external(ExternalFailureKind::from_status(status), message)
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= MAX_ERROR_BODY_CHARS {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(MAX_ERROR_BODY_CHARS).collect();
    cut.push('…');
    cut
}
