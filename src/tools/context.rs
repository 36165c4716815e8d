//! Tool execution context - scoped to a single trip request

use std::time::Duration;

use reqwest::Client;

use crate::collector::Collector;
use crate::config::{Config, Credentials, EndpointsConfig, SearchConfig};
use crate::error::{Result, TriprError};

/// Everything a tool needs to talk to the upstream APIs and report results.
///
/// One context is built per request; clones share the same collector.
#[derive(Debug, Clone)]
pub struct ToolContext {
    /// Shared HTTP client for all upstream calls
    pub http: Client,

    /// Upstream base URLs (config-overridable, which is what tests use)
    pub endpoints: EndpointsConfig,

    /// Credentials read from the environment
    pub credentials: Credentials,

    /// Result limits and filters
    pub search: SearchConfig,

    /// Per-request result sink
    pub collector: Collector,
}

impl ToolContext {
    /// Build a context from config plus env credentials
    pub fn new(config: &Config, credentials: Credentials, collector: Collector) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_millis(config.llm.timeout_ms))
            .build()
            .map_err(|e| TriprError::Tool(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            endpoints: config.endpoints.clone(),
            credentials,
            search: config.search.clone(),
            collector,
        })
    }

    /// Context with explicit parts, used by tests pointing at mock servers
    pub fn with_parts(
        endpoints: EndpointsConfig,
        credentials: Credentials,
        search: SearchConfig,
        collector: Collector,
    ) -> Self {
        Self {
            http: Client::new(),
            endpoints,
            credentials,
            search,
            collector,
        }
    }
}

#[cfg(test)]
pub(crate) fn test_context(base_url: &str) -> ToolContext {
    let endpoints = EndpointsConfig {
        amadeus_base: base_url.to_string(),
        ticketmaster_base: base_url.to_string(),
        google_maps_base: base_url.to_string(),
    };
    let credentials = Credentials {
        openrouter_api_key: "test-or-key".to_string(),
        amadeus_client_id: "test-amadeus-id".to_string(),
        amadeus_client_secret: "test-amadeus-secret".to_string(),
        ticketmaster_api_key: "test-tm-key".to_string(),
        google_api_key: "test-google-key".to_string(),
    };
    ToolContext::with_parts(endpoints, credentials, SearchConfig::default(), Collector::new(6))
}
