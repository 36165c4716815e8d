//! Tool executor - manages tool registration and execution

use std::collections::HashMap;

use super::{AttractionSearchTool, EventSearchTool, FlightSearchTool, HotelSearchTool, Tool, ToolContext, ToolResult};
use crate::llm::{ToolCall, ToolDefinition, wire};

/// Manages tool execution for a trip request
pub struct ToolExecutor {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolExecutor {
    /// Create executor with the four travel search tools
    pub fn standard() -> Self {
        let mut tools: HashMap<String, Box<dyn Tool>> = HashMap::new();

        tools.insert("search_flights".into(), Box::new(FlightSearchTool));
        tools.insert("search_hotels".into(), Box::new(HotelSearchTool));
        tools.insert("search_events".into(), Box::new(EventSearchTool));
        tools.insert("search_attractions".into(), Box::new(AttractionSearchTool));

        Self { tools }
    }

    /// Create an empty executor (for custom tool sets)
    pub fn new() -> Self {
        Self { tools: HashMap::new() }
    }

    /// Add a tool to the executor
    pub fn add_tool(&mut self, tool: Box<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Get tool definitions for the LLM
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .values()
            .map(|t| ToolDefinition {
                name: t.name().to_string(),
                description: t.description().to_string(),
                parameters: t.input_schema(),
            })
            .collect()
    }

    /// Execute a tool call, rejecting inputs that fail the tool's schema
    pub async fn execute(&self, tool_call: &ToolCall, ctx: &ToolContext) -> ToolResult {
        match self.tools.get(&tool_call.name) {
            Some(tool) => {
                let definition = ToolDefinition {
                    name: tool.name().to_string(),
                    description: tool.description().to_string(),
                    parameters: tool.input_schema(),
                };
                if let Err(e) = wire::validate_tool_input(tool_call, &definition) {
                    return ToolResult::error(e.to_string());
                }

                match tool.execute(tool_call.input.clone(), ctx).await {
                    Ok(result) => result,
                    Err(e) => ToolResult::error(format!("Tool error: {}", e)),
                }
            }
            None => ToolResult::error(format!("Unknown tool: {}", tool_call.name)),
        }
    }

    /// Execute multiple tool calls in order
    pub async fn execute_all(&self, tool_calls: &[ToolCall], ctx: &ToolContext) -> Vec<(String, ToolResult)> {
        let mut results = Vec::with_capacity(tool_calls.len());

        for call in tool_calls {
            let result = self.execute(call, ctx).await;
            results.push((call.id.clone(), result));
        }

        results
    }

    /// Check if a tool exists
    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Get the list of tool names
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.keys().map(|s| s.as_str()).collect()
    }
}

impl Default for ToolExecutor {
    fn default() -> Self {
        Self::standard()
    }
}
