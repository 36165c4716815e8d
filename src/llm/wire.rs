//! Wire parsing for OpenRouter chat-completions responses
//!
//! This module provides utilities for parsing `choices[0].message` payloads
//! (text plus `tool_calls` entries) and validating tool call inputs.

use crate::error::{Result, TriprError};
use crate::llm::types::{CompletionResponse, FinishReason, ToolCall, ToolDefinition, Usage};
use serde_json::Value;

/// Parse a raw chat-completions response body into a CompletionResponse
///
/// A 200 response can still carry an `error` object instead of `choices`;
/// that is surfaced as an LLM error.
pub fn parse_response(response: &Value) -> Result<CompletionResponse> {
    if response.get("choices").is_none() {
        let message = response
            .pointer("/error/message")
            .and_then(|m| m.as_str())
            .unwrap_or("response has no choices");
        return Err(TriprError::Llm(message.to_string()));
    }

    let choice = response
        .pointer("/choices/0")
        .ok_or_else(|| TriprError::Llm("empty choices array".to_string()))?;

    let message = choice
        .get("message")
        .ok_or_else(|| TriprError::Llm("choice has no message".to_string()))?;

    let content = message
        .get("content")
        .and_then(|c| c.as_str())
        .unwrap_or_default()
        .to_string();

    let mut tool_calls = Vec::new();
    if let Some(calls) = message.get("tool_calls").and_then(|c| c.as_array()) {
        for call in calls {
            if let Some(parsed) = parse_tool_call(call) {
                tool_calls.push(parsed);
            }
        }
    }

    let finish_reason = choice
        .get("finish_reason")
        .and_then(|s| s.as_str())
        .map(parse_finish_reason)
        .unwrap_or_default();

    let usage = response.get("usage").map(parse_usage).unwrap_or_default();

    Ok(CompletionResponse {
        content,
        tool_calls,
        finish_reason,
        usage,
    })
}

/// Parse a single wire tool call; arguments arrive as a JSON string
fn parse_tool_call(call: &Value) -> Option<ToolCall> {
    let id = call.get("id").and_then(|v| v.as_str())?.to_string();
    let name = call.pointer("/function/name").and_then(|v| v.as_str())?.to_string();

    let arguments = call
        .pointer("/function/arguments")
        .and_then(|v| v.as_str())
        .unwrap_or("{}");

    let input = serde_json::from_str(arguments).unwrap_or_else(|e| {
        log::warn!("Tool call {} has malformed arguments: {}", name, e);
        Value::Object(Default::default())
    });

    Some(ToolCall { id, name, input })
}

/// Parse finish reason string into FinishReason enum
fn parse_finish_reason(reason: &str) -> FinishReason {
    match reason {
        "stop" => FinishReason::Stop,
        "tool_calls" => FinishReason::ToolCalls,
        "length" => FinishReason::Length,
        _ => FinishReason::Other,
    }
}

/// Parse usage object from response
fn parse_usage(usage: &Value) -> Usage {
    Usage {
        prompt_tokens: usage.get("prompt_tokens").and_then(|v| v.as_u64()).unwrap_or(0),
        completion_tokens: usage.get("completion_tokens").and_then(|v| v.as_u64()).unwrap_or(0),
    }
}

/// Validate a tool call's input against a tool definition's schema
///
/// Checks that all required fields are present in the input.
pub fn validate_tool_input(call: &ToolCall, definition: &ToolDefinition) -> Result<()> {
    let schema = &definition.parameters;

    if let Some(required) = schema.get("required").and_then(|r| r.as_array()) {
        for req in required {
            if let Some(field_name) = req.as_str()
                && call.input.get(field_name).is_none()
            {
                return Err(TriprError::InvalidToolInput(format!(
                    "Tool '{}' missing required field: {}",
                    call.name, field_name
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_text_response() {
        let body = json!({
            "choices": [{
                "message": { "role": "assistant", "content": "Enjoy Chicago!" },
                "finish_reason": "stop"
            }],
            "usage": { "prompt_tokens": 42, "completion_tokens": 7 }
        });

        let response = parse_response(&body).unwrap();
        assert_eq!(response.content, "Enjoy Chicago!");
        assert!(response.tool_calls.is_empty());
        assert_eq!(response.finish_reason, FinishReason::Stop);
        assert_eq!(response.usage.prompt_tokens, 42);
        assert_eq!(response.usage.completion_tokens, 7);
    }

    #[test]
    fn test_parse_tool_call_response() {
        let body = json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_abc",
                        "type": "function",
                        "function": {
                            "name": "search_flights",
                            "arguments": "{\"origin\":\"BOS\",\"destination\":\"ORD\",\"date\":\"2026-09-01\"}"
                        }
                    }]
                },
                "finish_reason": "tool_calls"
            }]
        });

        let response = parse_response(&body).unwrap();
        assert!(response.content.is_empty());
        assert_eq!(response.tool_calls.len(), 1);
        assert_eq!(response.tool_calls[0].id, "call_abc");
        assert_eq!(response.tool_calls[0].name, "search_flights");
        assert_eq!(response.tool_calls[0].input["origin"], "BOS");
        assert!(response.finish_reason.needs_tool_execution());
    }

    #[test]
    fn test_parse_multiple_tool_calls() {
        let body = json!({
            "choices": [{
                "message": {
                    "content": "Searching now",
                    "tool_calls": [
                        {"id": "c1", "type": "function", "function": {"name": "search_events", "arguments": "{\"location\":\"Boston\",\"date\":\"2026-09-01\"}"}},
                        {"id": "c2", "type": "function", "function": {"name": "search_attractions", "arguments": "{\"location\":\"Boston\"}"}}
                    ]
                },
                "finish_reason": "tool_calls"
            }]
        });

        let response = parse_response(&body).unwrap();
        assert_eq!(response.content, "Searching now");
        assert_eq!(response.tool_calls.len(), 2);
        assert_eq!(response.tool_calls[1].name, "search_attractions");
    }

    #[test]
    fn test_parse_malformed_arguments_fall_back_to_empty() {
        let body = json!({
            "choices": [{
                "message": {
                    "tool_calls": [
                        {"id": "c1", "type": "function", "function": {"name": "search_hotels", "arguments": "{not json"}}
                    ]
                },
                "finish_reason": "tool_calls"
            }]
        });

        let response = parse_response(&body).unwrap();
        assert_eq!(response.tool_calls.len(), 1);
        assert!(response.tool_calls[0].input.as_object().unwrap().is_empty());
    }

    #[test]
    fn test_parse_error_payload() {
        let body = json!({
            "error": { "message": "Invalid model id", "code": 400 }
        });

        let err = parse_response(&body).unwrap_err();
        assert!(err.to_string().contains("Invalid model id"));
    }

    #[test]
    fn test_parse_finish_reasons() {
        let cases = vec![
            ("stop", FinishReason::Stop),
            ("tool_calls", FinishReason::ToolCalls),
            ("length", FinishReason::Length),
            ("content_filter", FinishReason::Other),
        ];

        for (reason, expected) in cases {
            let body = json!({
                "choices": [{ "message": { "content": "" }, "finish_reason": reason }]
            });
            assert_eq!(parse_response(&body).unwrap().finish_reason, expected);
        }
    }

    #[test]
    fn test_validate_tool_input_ok() {
        let definition = ToolDefinition::new(
            "search_events",
            "Search events",
            json!({
                "type": "object",
                "properties": { "location": {"type": "string"}, "date": {"type": "string"} },
                "required": ["location", "date"]
            }),
        );
        let call = ToolCall::new("c1", "search_events", json!({"location": "Boston", "date": "2026-09-01"}));
        assert!(validate_tool_input(&call, &definition).is_ok());
    }

    #[test]
    fn test_validate_tool_input_missing_field() {
        let definition = ToolDefinition::new(
            "search_events",
            "Search events",
            json!({ "required": ["location", "date"] }),
        );
        let call = ToolCall::new("c1", "search_events", json!({"location": "Boston"}));
        let err = validate_tool_input(&call, &definition).unwrap_err();
        assert!(err.to_string().contains("date"));
    }

}
