//! Request-scoped result collector
//!
//! Tools write their shaped results here as the agent runs; the summarization
//! step reads the whole thing back. One collector is created per trip request,
//! and each tool overwrites its own section (capped at `max_items`).

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

/// One flight offer, cheapest-first after collection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Flight {
    pub airline: String,
    #[serde(rename = "from")]
    pub origin: String,
    #[serde(rename = "to")]
    pub destination: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub price: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Hotel {
    pub name: String,
    pub image: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Event {
    pub name: String,
    pub date: String,
    pub venue: String,
    pub url: String,
    pub image: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Attraction {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub rating: f64,
    pub reviews: u64,
    pub category: String,
    pub image: Option<String>,
    pub maps_url: String,
}

/// Destination and date extracted from the user's prompt
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TripMetadata {
    pub destination: String,
    pub date: String,
}

impl Default for TripMetadata {
    fn default() -> Self {
        Self {
            destination: "unknown".to_string(),
            date: "unknown".to_string(),
        }
    }
}

/// Snapshot of everything collected during one request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectedResults {
    pub metadata: TripMetadata,
    pub flights: Vec<Flight>,
    pub hotels: Vec<Hotel>,
    pub events: Vec<Event>,
    pub attractions: Vec<Attraction>,
}

/// Shared handle to the per-request results.
///
/// Clones share the same underlying state, which is how the tools and the
/// planner communicate without threading return values through the agent loop.
#[derive(Debug, Clone)]
pub struct Collector {
    inner: Arc<Mutex<CollectedResults>>,
    max_items: usize,
}

impl Collector {
    /// Create an empty collector capped at `max_items` per section
    pub fn new(max_items: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(CollectedResults::default())),
            max_items,
        }
    }

    pub fn set_metadata(&self, metadata: TripMetadata) {
        self.inner.lock().unwrap().metadata = metadata;
    }

    pub fn set_flights(&self, mut flights: Vec<Flight>) {
        flights.truncate(self.max_items);
        self.inner.lock().unwrap().flights = flights;
    }

    pub fn set_hotels(&self, mut hotels: Vec<Hotel>) {
        hotels.truncate(self.max_items);
        self.inner.lock().unwrap().hotels = hotels;
    }

    pub fn set_events(&self, mut events: Vec<Event>) {
        events.truncate(self.max_items);
        self.inner.lock().unwrap().events = events;
    }

    pub fn set_attractions(&self, mut attractions: Vec<Attraction>) {
        attractions.truncate(self.max_items);
        self.inner.lock().unwrap().attractions = attractions;
    }

    /// Copy out the current state
    pub fn snapshot(&self) -> CollectedResults {
        self.inner.lock().unwrap().clone()
    }
}
