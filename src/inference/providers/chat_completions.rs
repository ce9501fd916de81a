//! Provider for endpoints speaking the OpenAI Chat Completions API.
//!
//! OpenAI and DeepSeek both accept the same request shape:
//! POST `{base_url}/chat/completions` with a bearer token and
//! `{"model": ..., "messages": [{"role": ..., "content": ...}]}`.
//! The reply is `choices[0].message.content`.

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::inference::{CompletionClient, CompletionRequest, Message, ProviderError, Role};

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_DEEPSEEK_BASE_URL: &str = "https://api.deepseek.com";

// ============================================================================
// Chat Completions API Types
// ============================================================================

/// A single message in the request array
#[derive(Serialize, Debug)]
struct RequestMessage<'a> {
    role: Role,
    content: &'a str,
}

/// The request body for the Chat Completions API
#[derive(Serialize, Debug)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<RequestMessage<'a>>,
}

#[derive(Deserialize, Debug)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize, Debug)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize, Debug)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

// ============================================================================
// Translation Layer
// ============================================================================

fn messages_to_request(messages: &[Message]) -> Vec<RequestMessage<'_>> {
    messages
        .iter()
        .map(|m| RequestMessage {
            role: m.role(),
            content: m.content(),
        })
        .collect()
}

/// Takes the first choice's content. No choices at all is a failure; a choice
/// with null content is an empty reply string.
fn first_reply(response: ChatResponse) -> Result<String, ProviderError> {
    response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content.unwrap_or_default())
        .ok_or(ProviderError::EmptyReply)
}

// ============================================================================
// Provider Implementation
// ============================================================================

pub struct ChatCompletionsProvider {
    name: &'static str,
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl ChatCompletionsProvider {
    pub fn new(name: &'static str, api_key: String, base_url: String) -> Self {
        Self {
            name,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn openai(api_key: String, base_url: Option<String>) -> Self {
        Self::new(
            "openai",
            api_key,
            base_url.unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
        )
    }

    pub fn deepseek(api_key: String, base_url: Option<String>) -> Self {
        Self::new(
            "deepseek",
            api_key,
            base_url.unwrap_or_else(|| DEFAULT_DEEPSEEK_BASE_URL.to_string()),
        )
    }
}

#[async_trait]
impl CompletionClient for ChatCompletionsProvider {
    fn name(&self) -> &str {
        self.name
    }

    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, ProviderError> {
        let body = ChatRequest {
            model: request.model,
            messages: messages_to_request(request.messages),
        };

        info!(
            "{} chat completion request: model={}, message_count={}",
            self.name,
            request.model,
            body.messages.len()
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status();
        debug!("{} response status: {}", self.name, status);

        if !status.is_success() {
            let err_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("{} API error: {} - {}", self.name, status.as_u16(), err_body);
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: err_body,
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;
        let parsed: ChatResponse =
            serde_json::from_str(&text).map_err(|e| ProviderError::Parse(e.to_string()))?;

        let reply = first_reply(parsed)?;
        info!("{} reply received: {} bytes", self.name, reply.len());
        Ok(reply)
    }
}
