//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::core::state::{App, Viewport};
use crate::inference::{CompletionClient, CompletionRequest, Message, ProviderError};

/// A client for tests that don't need real API calls. Always fails.
pub struct NoopClient;

#[async_trait]
impl CompletionClient for NoopClient {
    fn name(&self) -> &str {
        "noop"
    }

    async fn complete(&self, _request: CompletionRequest<'_>) -> Result<String, ProviderError> {
        Err(ProviderError::Config("noop client".to_string()))
    }
}

pub fn noop_client() -> Arc<dyn CompletionClient> {
    Arc::new(NoopClient)
}

/// Replays canned results in order and records every request it sees.
#[derive(Default)]
pub struct ScriptedClient {
    results: Mutex<VecDeque<Result<String, ProviderError>>>,
    requests: Mutex<Vec<(Vec<Message>, String)>>,
    delay: Option<Duration>,
}

impl ScriptedClient {
    pub fn new(results: Vec<Result<String, ProviderError>>) -> Self {
        Self {
            results: Mutex::new(results.into()),
            ..Default::default()
        }
    }

    /// Each call sleeps for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn requests(&self) -> Vec<(Vec<Message>, String)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, ProviderError> {
        self.requests
            .lock()
            .unwrap()
            .push((request.messages.to_vec(), request.model.to_string()));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(ProviderError::EmptyReply))
    }
}

/// Creates a test App with a NoopClient and an 80x20 conversation area.
pub fn test_app(system_prompt: Option<&str>) -> App {
    let mut app = App::new(
        noop_client(),
        "test-model".to_string(),
        "Assistant",
        system_prompt.unwrap_or(""),
    );
    app.viewport = Viewport {
        width: 80,
        height: 20,
        scroll: 0,
    };
    app
}
