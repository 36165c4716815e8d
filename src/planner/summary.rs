//! Condensing collected results and asking the LLM for the itinerary text

use crate::collector::CollectedResults;
use crate::config::Config;
use crate::error::Result;
use crate::llm::{CompletionRequest, LlmClient};

const SUMMARY_SYSTEM_PROMPT: &str =
    "You are a travel assistant. Based on the trip data, summarize a natural-language itinerary \
     suggestion in 3 to 4 sentences.";

/// Condense the collected results into a compact prompt block.
///
/// Each section is capped at `summary_items` lines so the summary call stays
/// well under the token budget. Empty sections are skipped entirely.
pub fn condense(collected: &CollectedResults, summary_items: usize) -> String {
    let flights: Vec<String> = collected
        .flights
        .iter()
        .take(summary_items)
        .map(|f| {
            format!(
                "{} · {}→{} · {} → {} · ${}",
                f.airline, f.origin, f.destination, f.departure_time, f.arrival_time, f.price
            )
        })
        .collect();

    let hotels: Vec<String> = collected.hotels.iter().take(summary_items).map(|h| h.name.clone()).collect();

    let attractions: Vec<String> = collected
        .attractions
        .iter()
        .take(summary_items)
        .map(|a| format!("{} ({} stars · {} reviews)", a.name, a.rating, a.reviews))
        .collect();

    let events: Vec<String> = collected
        .events
        .iter()
        .take(summary_items)
        .map(|e| format!("{} · {} @ {}", e.name, e.date, e.venue))
        .collect();

    let sections = [
        ("Flights", flights),
        ("Hotels", hotels),
        ("Attractions", attractions),
        ("Events", events),
    ];

    sections
        .iter()
        .filter(|(_, items)| !items.is_empty())
        .map(|(title, items)| {
            let lines: Vec<String> = items.iter().map(|i| format!("- {}", i)).collect();
            format!("{}:\n{}", title, lines.join("\n"))
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Ask the LLM for the natural-language itinerary
pub async fn summarize(llm: &dyn LlmClient, config: &Config, collected: &CollectedResults) -> Result<String> {
    let compact = condense(collected, config.search.summary_items);

    let user_prompt = format!(
        "The user plans to travel to {} on {}.\n\n\
         Here is a summary of the trip data:\n{}\n\n\
         Summarize a fun itinerary in natural language. No JSON.",
        collected.metadata.destination, collected.metadata.date, compact
    );

    let request = CompletionRequest::new(SUMMARY_SYSTEM_PROMPT)
        .with_user_message(user_prompt)
        .with_max_tokens(config.llm.max_tokens)
        .with_temperature(config.llm.temperature);

    let response = llm.complete(request).await?;
    Ok(response.content)
}
