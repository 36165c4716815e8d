//! LlmClient trait and a scripted mock for tests

use async_trait::async_trait;

use crate::error::{Result, TriprError};
use crate::llm::types::{CompletionRequest, CompletionResponse};

/// Stateless LLM client - each call is independent (fresh context)
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Single completion request (blocking until complete)
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;

    /// Model identifier used for requests without an explicit model
    fn model(&self) -> &str;

    /// Whether the client has credentials and can make requests
    fn is_ready(&self) -> bool;
}

/// Mock client that replays scripted responses in order.
///
/// Used by the agent and planner tests so the whole pipeline runs without
/// network access.
pub struct MockLlmClient {
    responses: std::sync::Mutex<std::collections::VecDeque<CompletionResponse>>,
    requests: std::sync::Mutex<Vec<CompletionRequest>>,
}

impl MockLlmClient {
    pub fn new() -> Self {
        Self {
            responses: std::sync::Mutex::new(std::collections::VecDeque::new()),
            requests: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Queue a response to be returned by the next `complete` call
    pub fn push_response(&self, response: CompletionResponse) {
        self.responses.lock().unwrap().push_back(response);
    }

    /// Requests seen so far, for assertions
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for MockLlmClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| TriprError::Llm("MockLlmClient: no scripted response left".to_string()))
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    fn is_ready(&self) -> bool {
        true
    }
}
