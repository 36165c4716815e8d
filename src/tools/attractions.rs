//! search_attractions tool - Google Geocoding + Places nearby search

use async_trait::async_trait;
use eyre::eyre;
use serde_json::Value;

use super::{Tool, ToolContext, ToolResult};
use crate::collector::Attraction;
use crate::config::SearchConfig;
use crate::error::{Result, TriprError};

pub struct AttractionSearchTool;

/// Filter nearby-search results down to well-reviewed attractions.
///
/// Places below the rating or review-count floor are dropped, as are places
/// without coordinates or a place_id.
fn filter_places(body: &Value, search: &SearchConfig, google_base: &str, google_key: &str) -> Vec<Attraction> {
    let places = body.get("results").and_then(|r| r.as_array()).cloned().unwrap_or_default();

    let mut attractions = Vec::new();
    for place in &places {
        let rating = place.get("rating").and_then(|v| v.as_f64()).unwrap_or(0.0);
        let reviews = place.get("user_ratings_total").and_then(|v| v.as_u64()).unwrap_or(0);
        if rating < search.min_attraction_rating || reviews < search.min_attraction_reviews {
            continue;
        }

        let (Some(lat), Some(lng)) = (
            place.pointer("/geometry/location/lat").and_then(|v| v.as_f64()),
            place.pointer("/geometry/location/lng").and_then(|v| v.as_f64()),
        ) else {
            continue;
        };
        let Some(place_id) = place.get("place_id").and_then(|v| v.as_str()) else {
            continue;
        };

        let category = place
            .get("types")
            .and_then(|t| t.as_array())
            .map(|types| {
                types
                    .iter()
                    .filter_map(|t| t.as_str())
                    .take(2)
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default();

        let image = place
            .pointer("/photos/0/photo_reference")
            .and_then(|v| v.as_str())
            .map(|photo_ref| {
                format!(
                    "{}/maps/api/place/photo?maxwidth=400&photoreference={}&key={}",
                    google_base, photo_ref, google_key
                )
            });

        attractions.push(Attraction {
            name: place.get("name").and_then(|v| v.as_str()).unwrap_or("").to_string(),
            lat,
            lng,
            rating,
            reviews,
            category,
            image,
            maps_url: format!("https://www.google.com/maps/place/?q=place_id:{}", place_id),
        });
    }

    attractions
}

/// Resolve a city name to coordinates via the Geocoding API
async fn geocode(ctx: &ToolContext, location: &str) -> Result<(f64, f64)> {
    let url = format!("{}/maps/api/geocode/json", ctx.endpoints.google_maps_base);
    let response = ctx
        .http
        .get(&url)
        .query(&[
            ("address", location),
            ("key", ctx.credentials.google_api_key.as_str()),
        ])
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(TriprError::Upstream {
            status: status.as_u16(),
            body,
        });
    }

    let body: Value = response.json().await?;
    let api_status = body.get("status").and_then(|v| v.as_str()).unwrap_or("UNKNOWN");
    if api_status != "OK" {
        return Err(TriprError::Tool(format!("Geocoding failed for {}: {}", location, api_status)));
    }

    let location = body
        .pointer("/results/0/geometry/location")
        .ok_or_else(|| TriprError::Tool("Geocoding response missing location".to_string()))?;

    match (
        location.get("lat").and_then(|v| v.as_f64()),
        location.get("lng").and_then(|v| v.as_f64()),
    ) {
        (Some(lat), Some(lng)) => Ok((lat, lng)),
        _ => Err(TriprError::Tool("Geocoding response missing coordinates".to_string())),
    }
}

async fn nearby_attractions(ctx: &ToolContext, lat: f64, lng: f64) -> Result<Value> {
    let url = format!("{}/maps/api/place/nearbysearch/json", ctx.endpoints.google_maps_base);
    let coords = format!("{},{}", lat, lng);
    let radius = ctx.search.attraction_radius_m.to_string();
    let response = ctx
        .http
        .get(&url)
        .query(&[
            ("location", coords.as_str()),
            ("radius", radius.as_str()),
            ("type", "tourist_attraction"),
            ("key", ctx.credentials.google_api_key.as_str()),
        ])
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(TriprError::Upstream {
            status: status.as_u16(),
            body,
        });
    }

    let body: Value = response.json().await?;
    let api_status = body.get("status").and_then(|v| v.as_str()).unwrap_or("UNKNOWN");
    if api_status != "OK" && api_status != "ZERO_RESULTS" {
        return Err(TriprError::Tool(format!("Places API Error: {}", api_status)));
    }

    Ok(body)
}

#[async_trait]
impl Tool for AttractionSearchTool {
    fn name(&self) -> &'static str {
        "search_attractions"
    }

    fn description(&self) -> &'static str {
        "Find top-rated tourist attractions near a city. Returns name, rating, review count, category, and a maps link."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "location": {
                    "type": "string",
                    "description": "City name (e.g. Los Angeles)"
                }
            },
            "required": ["location"]
        })
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> std::result::Result<ToolResult, eyre::Error> {
        let location = input["location"].as_str().ok_or_else(|| eyre!("location is required"))?;

        log::info!("Searching attractions near {}", location);

        let (lat, lng) = match geocode(ctx, location).await {
            Ok(coords) => coords,
            Err(e) => {
                log::warn!("Geocoding failed: {}", e);
                return Ok(ToolResult::error(format!("Could not determine coordinates for {}", location)));
            }
        };

        let body = nearby_attractions(ctx, lat, lng).await?;
        let mut attractions = filter_places(
            &body,
            &ctx.search,
            &ctx.endpoints.google_maps_base,
            &ctx.credentials.google_api_key,
        );
        attractions.truncate(ctx.search.max_items);
        ctx.collector.set_attractions(attractions.clone());

        log::info!("Collected {} attractions", attractions.len());
        Ok(ToolResult::success(serde_json::to_string(&attractions)?))
    }
}
