//! LLM Client Layer - OpenRouter chat-completions integration
//!
//! This module provides:
//! - Message types for LLM communication
//! - LlmClient trait for API abstraction
//! - OpenRouterClient implementation
//! - Wire-format parsing for responses and tool calls

pub mod client;
pub mod openrouter;
pub mod types;
pub mod wire;

pub use client::{LlmClient, MockLlmClient};
pub use openrouter::{OpenRouterClient, OpenRouterConfig};
pub use types::{
    CompletionRequest, CompletionResponse, FinishReason, Message, Role, ToolCall, ToolDefinition, Usage, WireToolCall,
};
pub use wire::{parse_response, validate_tool_input};
