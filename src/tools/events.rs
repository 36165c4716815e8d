//! search_events tool - Ticketmaster Discovery API

use async_trait::async_trait;
use chrono::NaiveDate;
use eyre::eyre;
use serde_json::Value;

use super::{Tool, ToolContext, ToolResult};
use crate::collector::Event;

pub struct EventSearchTool;

/// Shape raw Discovery API events into Event records
fn parse_events(body: &Value) -> Vec<Event> {
    let events = body
        .pointer("/_embedded/events")
        .and_then(|e| e.as_array())
        .cloned()
        .unwrap_or_default();

    events
        .iter()
        .map(|event| {
            let name = event.get("name").and_then(|v| v.as_str()).unwrap_or("Unknown Event");
            let date = event.pointer("/dates/start/localDate").and_then(|v| v.as_str()).unwrap_or("No Date");
            let time = event.pointer("/dates/start/localTime").and_then(|v| v.as_str()).unwrap_or("");
            let venue = event
                .pointer("/_embedded/venues/0/name")
                .and_then(|v| v.as_str())
                .unwrap_or("Unknown Venue");
            let url = event.get("url").and_then(|v| v.as_str()).unwrap_or("#");
            let image = event.pointer("/images/0/url").and_then(|v| v.as_str()).unwrap_or("");

            Event {
                name: name.to_string(),
                date: format!("{} {}", date, time).trim().to_string(),
                venue: venue.to_string(),
                url: url.to_string(),
                image: image.to_string(),
            }
        })
        .collect()
}

#[async_trait]
impl Tool for EventSearchTool {
    fn name(&self) -> &'static str {
        "search_events"
    }

    fn description(&self) -> &'static str {
        "Search Ticketmaster for events in a city on a specific date. Returns name, date, venue, and url."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "location": {
                    "type": "string",
                    "description": "City name (e.g. Boston)"
                },
                "date": {
                    "type": "string",
                    "description": "Date in YYYY-MM-DD format"
                },
                "keyword": {
                    "type": "string",
                    "description": "Optional keyword (e.g. music)"
                }
            },
            "required": ["location", "date"]
        })
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> Result<ToolResult, eyre::Error> {
        let location = input["location"].as_str().ok_or_else(|| eyre!("location is required"))?;
        let date = input["date"].as_str().ok_or_else(|| eyre!("date is required"))?;
        let keyword = input["keyword"].as_str().unwrap_or("");

        if NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
            return Ok(ToolResult::error("Invalid date format. Use YYYY-MM-DD"));
        }

        // Window start at the beginning of that day, US eastern offset
        let start_dt = format!("{}T00:00:00-05:00", date);

        log::info!("Searching events in {} on {}", location, date);

        let url = format!("{}/discovery/v2/events.json", ctx.endpoints.ticketmaster_base);
        let size = ctx.search.event_page_size.to_string();
        let response = ctx
            .http
            .get(&url)
            .query(&[
                ("apikey", ctx.credentials.ticketmaster_api_key.as_str()),
                ("keyword", keyword),
                ("size", size.as_str()),
                ("city", location),
                ("startDateTime", start_dt.as_str()),
                ("sort", "date,asc"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Ok(ToolResult::error(format!("Ticketmaster API Error {}", status.as_u16())));
        }

        let body: Value = response.json().await?;
        let mut events = parse_events(&body);
        events.truncate(ctx.search.max_items);
        ctx.collector.set_events(events.clone());

        log::info!("Collected {} events", events.len());
        Ok(ToolResult::success(serde_json::to_string(&events)?))
    }
}
