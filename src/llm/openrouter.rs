//! OpenRouter API client implementation
//!
//! This module implements the LlmClient trait for the OpenRouter
//! chat-completions API (OpenAI dialect).

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};

use crate::config::LlmConfig;
use crate::error::{Result, TriprError};
use crate::llm::client::LlmClient;
use crate::llm::types::{CompletionRequest, CompletionResponse, Usage};
use crate::llm::wire;

/// Default OpenRouter base URL
const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Default model to use
const DEFAULT_MODEL: &str = "meta-llama/llama-3-70b-instruct";

/// Default max tokens
const DEFAULT_MAX_TOKENS: u32 = 500;

/// Default sampling temperature
const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Configuration for the OpenRouter client
#[derive(Debug, Clone)]
pub struct OpenRouterConfig {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub timeout: Duration,
    pub base_url: String,
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            timeout: Duration::from_secs(120),
            base_url: OPENROUTER_BASE_URL.to_string(),
        }
    }
}

impl From<&LlmConfig> for OpenRouterConfig {
    fn from(config: &LlmConfig) -> Self {
        Self {
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            timeout: Duration::from_millis(config.timeout_ms),
            base_url: config.base_url.clone(),
        }
    }
}

/// OpenRouter API client
pub struct OpenRouterClient {
    client: Client,
    api_key: String,
    config: OpenRouterConfig,
    usage: Arc<Mutex<Usage>>,
}

impl OpenRouterClient {
    /// Create a new OpenRouter client
    ///
    /// Reads OPENROUTER_API_KEY from environment
    pub fn new(config: OpenRouterConfig) -> Result<Self> {
        let api_key = std::env::var("OPENROUTER_API_KEY")
            .map_err(|_| TriprError::MissingApiKey("OPENROUTER_API_KEY".to_string()))?;

        Self::with_api_key(api_key, config)
    }

    /// Create a client with an explicit API key
    pub fn with_api_key(api_key: String, config: OpenRouterConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| TriprError::Llm(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            config,
            usage: Arc::new(Mutex::new(Usage::default())),
        })
    }

    /// Build the request body for the chat-completions endpoint
    fn build_request(&self, request: &CompletionRequest) -> Value {
        let model = request.model.as_ref().unwrap_or(&self.config.model).clone();
        let max_tokens = request.max_tokens.unwrap_or(self.config.max_tokens);
        let temperature = request.temperature.unwrap_or(self.config.temperature);

        let mut body = json!({
            "model": model,
            "max_tokens": max_tokens,
            "temperature": temperature,
            "messages": request.messages,
        });

        if !request.tools.is_empty() {
            let tools: Vec<Value> = request.tools.iter().map(|t| t.to_openrouter_schema()).collect();
            body["tools"] = json!(tools);
        }

        body
    }

    /// Send a request to the OpenRouter API
    async fn send_request(&self, body: Value) -> Result<Value> {
        let url = format!("{}/chat/completions", self.config.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| TriprError::Llm(format!("Request failed: {}", e)))?;

        let status = response.status();

        // Handle rate limiting
        if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|h| h.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(TriprError::Llm(format!(
                "Rate limited, retry after {} seconds",
                retry_after
            )));
        }

        // Handle other errors
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            return Err(TriprError::Llm(format!("API error {}: {}", status, error_body)));
        }

        response
            .json()
            .await
            .map_err(|e| TriprError::Llm(format!("Failed to parse response: {}", e)))
    }

    /// Get cumulative token usage
    pub fn total_usage(&self) -> Usage {
        self.usage.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for OpenRouterClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let body = self.build_request(&request);
        let raw = self.send_request(body).await?;
        let response = wire::parse_response(&raw)?;

        {
            let mut total = self.usage.lock().unwrap();
            total.add(&response.usage);
        }

        Ok(response)
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    fn is_ready(&self) -> bool {
        !self.api_key.is_empty()
    }
}

impl std::fmt::Debug for OpenRouterClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenRouterClient")
            .field("model", &self.config.model)
            .field("base_url", &self.config.base_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::types::{Message, ToolDefinition};
    use wiremock::matchers::{bearer_token, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str) -> OpenRouterClient {
        let config = OpenRouterConfig {
            base_url: base_url.to_string(),
            ..Default::default()
        };
        OpenRouterClient::with_api_key("test-key".to_string(), config).unwrap()
    }

    #[test]
    fn test_config_default() {
        let config = OpenRouterConfig::default();
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.max_tokens, DEFAULT_MAX_TOKENS);
        assert_eq!(config.base_url, OPENROUTER_BASE_URL);
    }

    #[test]
    fn test_config_from_llm_config() {
        let llm = LlmConfig {
            model: "openai/gpt-4o-mini".to_string(),
            max_tokens: 800,
            temperature: 0.2,
            timeout_ms: 5000,
            base_url: "http://localhost:9000".to_string(),
        };
        let config = OpenRouterConfig::from(&llm);
        assert_eq!(config.model, "openai/gpt-4o-mini");
        assert_eq!(config.timeout, Duration::from_millis(5000));
        assert_eq!(config.base_url, "http://localhost:9000");
    }

    #[test]
    fn test_build_request_basic() {
        let client = test_client(OPENROUTER_BASE_URL);
        let request = CompletionRequest::new("You are a travel assistant").with_user_message("Hello");

        let body = client.build_request(&request);

        assert_eq!(body["model"], DEFAULT_MODEL);
        assert_eq!(body["max_tokens"], DEFAULT_MAX_TOKENS);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "Hello");
        assert!(body.get("tools").is_none());
    }

    #[test]
    fn test_build_request_with_tools() {
        let client = test_client(OPENROUTER_BASE_URL);
        let tool = ToolDefinition::new(
            "search_flights",
            "Search flights",
            json!({
                "type": "object",
                "properties": { "origin": {"type": "string"} },
                "required": ["origin"]
            }),
        );
        let request = CompletionRequest::new("system")
            .with_user_message("Fly me to Chicago")
            .with_tools(vec![tool]);

        let body = client.build_request(&request);

        assert!(body["tools"].is_array());
        assert_eq!(body["tools"][0]["type"], "function");
        assert_eq!(body["tools"][0]["function"]["name"], "search_flights");
    }

    #[test]
    fn test_build_request_custom_model_and_sampling() {
        let client = test_client(OPENROUTER_BASE_URL);
        let mut request = CompletionRequest::without_system()
            .with_user_message("hi")
            .with_max_tokens(64)
            .with_temperature(0.0);
        request.model = Some("anthropic/claude-3-haiku".to_string());

        let body = client.build_request(&request);
        assert_eq!(body["model"], "anthropic/claude-3-haiku");
        assert_eq!(body["max_tokens"], 64);
        assert_eq!(body["temperature"], 0.0);
    }

    #[test]
    fn test_build_request_tool_message_shape() {
        let client = test_client(OPENROUTER_BASE_URL);
        let request = CompletionRequest::without_system()
            .with_message(Message::tool("call_1", "{\"flights\":[]}"));

        let body = client.build_request(&request);
        assert_eq!(body["messages"][0]["role"], "tool");
        assert_eq!(body["messages"][0]["tool_call_id"], "call_1");
    }

    #[tokio::test]
    async fn test_complete_against_mock_server() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(bearer_token("test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{
                    "message": { "role": "assistant", "content": "Bon voyage!" },
                    "finish_reason": "stop"
                }],
                "usage": { "prompt_tokens": 12, "completion_tokens": 3 }
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let response = client
            .complete(CompletionRequest::new("sys").with_user_message("hi"))
            .await
            .unwrap();

        assert_eq!(response.content, "Bon voyage!");
        assert_eq!(client.total_usage().prompt_tokens, 12);
    }

    #[tokio::test]
    async fn test_complete_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client
            .complete(CompletionRequest::new("sys").with_user_message("hi"))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn test_complete_rate_limited() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "17"))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client
            .complete(CompletionRequest::new("sys").with_user_message("hi"))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("17"));
    }

    #[test]
    fn test_debug_impl_hides_api_key() {
        let client = test_client(OPENROUTER_BASE_URL);
        let debug_str = format!("{:?}", client);
        assert!(debug_str.contains("OpenRouterClient"));
        assert!(!debug_str.contains("test-key"));
    }

    #[test]
    fn test_empty_api_key_not_ready() {
        let client = OpenRouterClient::with_api_key(String::new(), OpenRouterConfig::default()).unwrap();
        assert!(!client.is_ready());
    }
}
