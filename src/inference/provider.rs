use std::fmt;

use async_trait::async_trait;

use super::types::Message;

/// Errors that can occur while asking a provider for a completion.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// Provider misconfigured (missing API key, bad URL).
    Config(String),
    /// Network-level failure (timeout, DNS, connection refused).
    Network(String),
    /// API returned an error response.
    Api { status: u16, message: String },
    /// Failed to parse the provider's response.
    Parse(String),
    /// The response carried no choices to take a reply from.
    EmptyReply,
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Config(msg) => write!(f, "config error: {msg}"),
            ProviderError::Network(msg) => write!(f, "network error: {msg}"),
            ProviderError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            ProviderError::Parse(msg) => write!(f, "parse error: {msg}"),
            ProviderError::EmptyReply => write!(f, "no usable reply from the model"),
        }
    }
}

impl std::error::Error for ProviderError {}

/// Everything a client needs to fulfill a completion request.
#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
    pub messages: &'a [Message],
    pub model: &'a str,
}

/// A remote chat-completion endpoint.
///
/// Implementations return exactly one assistant reply or an error. They hold
/// no per-conversation state; the full history travels with every request.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Returns the name of the provider.
    fn name(&self) -> &str;

    /// Requests a single reply to the given history.
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, ProviderError>;
}
