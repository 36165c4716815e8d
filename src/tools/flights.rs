//! search_flights tool - Amadeus flight-offers search

use async_trait::async_trait;
use eyre::eyre;
use serde_json::Value;

use super::{Tool, ToolContext, ToolResult, amadeus};
use crate::collector::Flight;

pub struct FlightSearchTool;

/// Map an IATA carrier code to a display name, falling back to the raw code
fn airline_name(code: &str) -> &str {
    match code {
        "AA" => "American Airlines",
        "DL" => "Delta Air Lines",
        "UA" => "United Airlines",
        "B6" => "JetBlue",
        "F9" => "Frontier Airlines",
        "WN" => "Southwest Airlines",
        "NK" => "Spirit Airlines",
        "SY" => "Sun Country Airlines",
        "AS" => "Alaska Airlines",
        "HA" => "Hawaiian Airlines",
        "9K" => "Cape Air",
        other => other,
    }
}

/// Shape raw flight offers into Flight records.
///
/// Offers whose first segment does not depart from the requested origin, or
/// whose last segment does not arrive at the destination, are dropped (these
/// are multi-city artifacts from the upstream search).
fn parse_offers(body: &Value, origin: &str, destination: &str) -> Vec<Flight> {
    let mut flights = Vec::new();

    let offers = body.get("data").and_then(|d| d.as_array()).cloned().unwrap_or_default();
    for offer in &offers {
        let segments = match offer.pointer("/itineraries/0/segments").and_then(|s| s.as_array()) {
            Some(segments) if !segments.is_empty() => segments,
            _ => continue,
        };

        let first = &segments[0];
        let last = &segments[segments.len() - 1];

        let dep_code = first.pointer("/departure/iataCode").and_then(|v| v.as_str()).unwrap_or("");
        let arr_code = last.pointer("/arrival/iataCode").and_then(|v| v.as_str()).unwrap_or("");
        if dep_code != origin || arr_code != destination {
            continue;
        }

        let carrier = first.get("carrierCode").and_then(|v| v.as_str()).unwrap_or("Unknown");
        let price = match offer
            .pointer("/price/total")
            .and_then(|v| v.as_str())
            .and_then(|p| p.parse::<f64>().ok())
        {
            Some(price) => price,
            None => continue,
        };

        flights.push(Flight {
            airline: airline_name(carrier).to_string(),
            origin: dep_code.to_string(),
            destination: arr_code.to_string(),
            departure_time: first.pointer("/departure/at").and_then(|v| v.as_str()).unwrap_or("").to_string(),
            arrival_time: last.pointer("/arrival/at").and_then(|v| v.as_str()).unwrap_or("").to_string(),
            price,
        });
    }

    flights.sort_by(|a, b| a.price.partial_cmp(&b.price).unwrap_or(std::cmp::Ordering::Equal));
    flights
}

async fn search(ctx: &ToolContext, origin: &str, destination: &str, date: &str) -> crate::error::Result<Vec<Flight>> {
    let token = amadeus::fetch_token(ctx).await?;

    let url = format!("{}/v2/shopping/flight-offers", ctx.endpoints.amadeus_base);
    let max = ctx.search.flight_offer_limit.to_string();
    let response = ctx
        .http
        .get(&url)
        .bearer_auth(&token)
        .query(&[
            ("originLocationCode", origin),
            ("destinationLocationCode", destination),
            ("departureDate", date),
            ("adults", "1"),
            ("currencyCode", "USD"),
            ("max", max.as_str()),
        ])
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(crate::error::TriprError::Upstream {
            status: status.as_u16(),
            body,
        });
    }

    let body: Value = response.json().await?;
    Ok(parse_offers(&body, origin, destination))
}

#[async_trait]
impl Tool for FlightSearchTool {
    fn name(&self) -> &'static str {
        "search_flights"
    }

    fn description(&self) -> &'static str {
        "Search flights between two airports on a date. Origin and destination must be IATA codes (e.g. BOS, JFK)."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "origin": {
                    "type": "string",
                    "description": "IATA code of departure airport (e.g. JFK)"
                },
                "destination": {
                    "type": "string",
                    "description": "IATA code of arrival airport (e.g. LAX)"
                },
                "date": {
                    "type": "string",
                    "description": "Departure date (YYYY-MM-DD)"
                }
            },
            "required": ["origin", "destination", "date"]
        })
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> Result<ToolResult, eyre::Error> {
        let origin = input["origin"].as_str().ok_or_else(|| eyre!("origin is required"))?;
        let destination = input["destination"].as_str().ok_or_else(|| eyre!("destination is required"))?;
        let date = input["date"].as_str().ok_or_else(|| eyre!("date is required"))?;

        log::info!("Searching flights {}->{} on {}", origin, destination, date);

        // An upstream failure leaves the flights section empty rather than
        // aborting the agent turn
        let mut flights = match search(ctx, origin, destination, date).await {
            Ok(flights) => flights,
            Err(e) => {
                log::warn!("Flight search failed: {}", e);
                return Ok(ToolResult::success("[]"));
            }
        };

        flights.truncate(ctx.search.max_items);
        ctx.collector.set_flights(flights.clone());

        log::info!("Collected {} flights", flights.len());
        Ok(ToolResult::success(serde_json::to_string(&flights)?))
    }
}
