//! Tool system for the travel agent
//!
//! Each tool wraps one upstream search API (Amadeus flights/hotels,
//! Ticketmaster events, Google Places attractions), shapes the response into
//! flat records, and writes its section of the request's collector.

mod amadeus;
mod attractions;
pub(crate) mod context;
mod events;
mod executor;
mod flights;
mod hotels;

pub use context::ToolContext;
pub use executor::ToolExecutor;

use async_trait::async_trait;
use serde_json::Value;

pub use crate::llm::ToolDefinition;

/// A tool that can be called by the LLM
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name (matches the LLM tool-call name)
    fn name(&self) -> &'static str;

    /// Human-readable description
    fn description(&self) -> &'static str;

    /// JSON Schema for input parameters
    fn input_schema(&self) -> Value;

    /// Execute the tool
    async fn execute(&self, input: Value, ctx: &ToolContext) -> Result<ToolResult, eyre::Error>;
}

/// Result from tool execution
#[derive(Debug, Clone)]
pub struct ToolResult {
    pub content: String,
    pub is_error: bool,
}

impl ToolResult {
    pub fn success(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_error: false,
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_error: true,
        }
    }
}

// Re-export individual tools for direct access if needed
pub use attractions::AttractionSearchTool;
pub use events::EventSearchTool;
pub use flights::FlightSearchTool;
pub use hotels::HotelSearchTool;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_result_success() {
        let result = ToolResult::success("6 flights found");
        assert_eq!(result.content, "6 flights found");
        assert!(!result.is_error);
    }

    #[test]
    fn test_tool_result_error() {
        let result = ToolResult::error("Amadeus API Error 401");
        assert_eq!(result.content, "Amadeus API Error 401");
        assert!(result.is_error);
    }
}
