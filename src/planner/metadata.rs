//! Destination/date extraction from the free-text trip request

use serde_json::Value;

use crate::collector::TripMetadata;
use crate::config::Config;
use crate::error::Result;
use crate::llm::{CompletionRequest, LlmClient};

fn extraction_prompt(prompt: &str) -> String {
    format!(
        "Extract the travel destination city and the travel date from the user input below. \
         Reply with JSON only, for example: {{\"city\": \"Chicago\", \"date\": \"2026-05-09\"}}. \
         If the city or the date cannot be determined, return an empty string for that field.\n\n\
         User input: {prompt}"
    )
}

/// Strip a Markdown code fence if the model wrapped its JSON in one
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

/// Parse the extraction reply, falling back to "unknown" for anything
/// missing or malformed
fn parse_metadata(content: &str) -> TripMetadata {
    let parsed: Option<Value> = serde_json::from_str(strip_code_fence(content)).ok();

    let field = |name: &str| {
        parsed
            .as_ref()
            .and_then(|v| v.get(name))
            .and_then(|v| v.as_str())
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.to_string())
            .unwrap_or_else(|| "unknown".to_string())
    };

    TripMetadata {
        destination: field("city"),
        date: field("date"),
    }
}

/// Ask the LLM for the trip's destination and date.
///
/// This runs before the agent loop so the collector carries metadata even
/// when a tool never fires.
pub async fn extract_metadata(llm: &dyn LlmClient, config: &Config, prompt: &str) -> Result<TripMetadata> {
    let request = CompletionRequest::without_system()
        .with_user_message(extraction_prompt(prompt))
        .with_max_tokens(config.llm.max_tokens)
        .with_temperature(config.llm.temperature);

    let response = llm.complete(request).await?;
    let metadata = parse_metadata(&response.content);
    log::info!("Extracted metadata: {} on {}", metadata.destination, metadata.date);
    Ok(metadata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{CompletionResponse, MockLlmClient};

    fn scripted(content: &str) -> MockLlmClient {
        let llm = MockLlmClient::new();
        llm.push_response(CompletionResponse {
            content: content.to_string(),
            ..Default::default()
        });
        llm
    }

    #[test]
    fn test_parse_metadata_plain_json() {
        let metadata = parse_metadata(r#"{"city": "Chicago", "date": "2026-05-09"}"#);
        assert_eq!(metadata.destination, "Chicago");
        assert_eq!(metadata.date, "2026-05-09");
    }

    #[test]
    fn test_parse_metadata_code_fenced() {
        let metadata = parse_metadata("```json\n{\"city\": \"Paris\", \"date\": \"2026-07-01\"}\n```");
        assert_eq!(metadata.destination, "Paris");
        assert_eq!(metadata.date, "2026-07-01");
    }

    #[test]
    fn test_parse_metadata_empty_fields_become_unknown() {
        let metadata = parse_metadata(r#"{"city": "", "date": "2026-05-09"}"#);
        assert_eq!(metadata.destination, "unknown");
        assert_eq!(metadata.date, "2026-05-09");
    }

    #[test]
    fn test_parse_metadata_garbage_becomes_unknown() {
        let metadata = parse_metadata("Sure! The city is Chicago.");
        assert_eq!(metadata.destination, "unknown");
        assert_eq!(metadata.date, "unknown");
    }

    #[tokio::test]
    async fn test_extract_metadata_sends_prompt_without_system() {
        let llm = scripted(r#"{"city": "Denver", "date": "2026-10-01"}"#);
        let config = Config::default();

        let metadata = extract_metadata(&llm, &config, "ski trip to Denver Oct 1")
            .await
            .unwrap();
        assert_eq!(metadata.destination, "Denver");

        let requests = llm.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].messages.len(), 1);
        assert!(requests[0].messages[0].content.as_deref().unwrap().contains("ski trip"));
        assert!(requests[0].tools.is_empty());
    }
}
