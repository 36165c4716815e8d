//! search_hotels tool - Amadeus hotel offers enriched with Google Places

use async_trait::async_trait;
use eyre::eyre;
use serde_json::Value;

use super::{Tool, ToolContext, ToolResult, amadeus};
use crate::collector::Hotel;
use crate::error::{Result, TriprError};

pub struct HotelSearchTool;

/// Drop sandbox placeholder properties and duplicates, keeping offer order
fn clean_names(offers: &Value) -> Vec<String> {
    let mut names = Vec::new();

    let data = offers.get("data").and_then(|d| d.as_array()).cloned().unwrap_or_default();
    for entry in &data {
        let name = entry
            .pointer("/hotel/name")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .trim()
            .to_string();
        if name.is_empty() {
            continue;
        }

        let lower = name.to_lowercase();
        if lower.contains("test") || lower.contains("demo") {
            continue;
        }
        if names.contains(&name) {
            continue;
        }

        names.push(name);
    }

    names
}

async fn hotel_ids(ctx: &ToolContext, token: &str, city_code: &str) -> Result<Vec<String>> {
    let url = format!("{}/v1/reference-data/locations/hotels/by-city", ctx.endpoints.amadeus_base);
    let radius = ctx.search.hotel_radius_km.to_string();
    let response = ctx
        .http
        .get(&url)
        .bearer_auth(token)
        .query(&[
            ("cityCode", city_code),
            ("radius", radius.as_str()),
            ("radiusUnit", "KM"),
            ("hotelSource", "ALL"),
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
    let ids = body
        .get("data")
        .and_then(|d| d.as_array())
        .map(|hotels| {
            hotels
                .iter()
                .filter_map(|h| h.get("hotelId").and_then(|v| v.as_str()))
                .take(ctx.search.hotel_id_limit)
                .map(|s| s.to_string())
                .collect()
        })
        .unwrap_or_default();

    Ok(ids)
}

async fn hotel_offers(ctx: &ToolContext, token: &str, ids: &[String], check_in: &str) -> Result<Value> {
    let url = format!("{}/v3/shopping/hotel-offers", ctx.endpoints.amadeus_base);
    let joined = ids.join(",");
    let response = ctx
        .http
        .get(&url)
        .bearer_auth(token)
        .query(&[
            ("hotelIds", joined.as_str()),
            ("checkInDate", check_in),
            ("adults", "1"),
            ("roomQuantity", "1"),
            ("bestRateOnly", "true"),
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

    Ok(response.json().await?)
}

/// Look up a hotel on Google Places for a photo and a maps link.
///
/// Enrichment is best-effort: a lookup failure yields a Hotel with just the
/// name.
async fn enrich(ctx: &ToolContext, name: &str, city: &str) -> Hotel {
    let url = format!("{}/maps/api/place/findplacefromtext/json", ctx.endpoints.google_maps_base);
    let query_input = format!("{} {}", name, city);

    let response = ctx
        .http
        .get(&url)
        .query(&[
            ("input", query_input.as_str()),
            ("inputtype", "textquery"),
            ("fields", "place_id,photos,name,formatted_address"),
            ("key", ctx.credentials.google_api_key.as_str()),
        ])
        .send()
        .await;

    let candidate = match response {
        Ok(resp) => resp
            .json::<Value>()
            .await
            .ok()
            .and_then(|body| body.pointer("/candidates/0").cloned()),
        Err(e) => {
            log::warn!("Places lookup failed for {}: {}", name, e);
            None
        }
    };

    let Some(candidate) = candidate else {
        return Hotel {
            name: name.to_string(),
            image: None,
            url: None,
        };
    };

    let image = candidate
        .pointer("/photos/0/photo_reference")
        .and_then(|v| v.as_str())
        .map(|photo_ref| {
            format!(
                "{}/maps/api/place/photo?maxwidth=400&photoreference={}&key={}",
                ctx.endpoints.google_maps_base, photo_ref, ctx.credentials.google_api_key
            )
        });
    let url = candidate
        .get("place_id")
        .and_then(|v| v.as_str())
        .map(|place_id| format!("https://www.google.com/maps/place/?q=place_id:{}", place_id));

    Hotel {
        name: name.to_string(),
        image,
        url,
    }
}

#[async_trait]
impl Tool for HotelSearchTool {
    fn name(&self) -> &'static str {
        "search_hotels"
    }

    fn description(&self) -> &'static str {
        "Search hotels in a city for a check-in date. City code must be an IATA city code (e.g. BOS, NYC)."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "city_code": {
                    "type": "string",
                    "description": "IATA city code (e.g. PAR for Paris)"
                },
                "check_in": {
                    "type": "string",
                    "description": "Check-in date (YYYY-MM-DD)"
                },
                "city_name": {
                    "type": "string",
                    "description": "Full city name, used to disambiguate hotel lookups"
                }
            },
            "required": ["city_code", "check_in"]
        })
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> std::result::Result<ToolResult, eyre::Error> {
        let city_code = input["city_code"].as_str().ok_or_else(|| eyre!("city_code is required"))?;
        let check_in = input["check_in"].as_str().ok_or_else(|| eyre!("check_in is required"))?;
        let city_name = input["city_name"].as_str().unwrap_or(city_code);

        log::info!("Searching hotels in {} from {}", city_code, check_in);

        let token = amadeus::fetch_token(ctx).await?;

        let ids = hotel_ids(ctx, &token, city_code).await?;
        if ids.is_empty() {
            return Ok(ToolResult::error(format!("No hotels found for city code {}", city_code)));
        }

        let offers = hotel_offers(ctx, &token, &ids, check_in).await?;
        let names = clean_names(&offers);

        let mut hotels = Vec::new();
        for name in names.iter().take(ctx.search.max_items) {
            hotels.push(enrich(ctx, name, city_name).await);
        }
        ctx.collector.set_hotels(hotels.clone());

        log::info!("Collected {} hotels", hotels.len());
        Ok(ToolResult::success(serde_json::to_string(&hotels)?))
    }
}
