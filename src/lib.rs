//! Tripr - an LLM travel agent over flight, hotel, event, and attraction search.
//!
//! A free-text trip request is handled in three steps: the destination and
//! date are extracted, a tool-calling agent loop runs the four search tools
//! against their upstream APIs, and a second LLM pass condenses whatever was
//! collected into a natural-language itinerary alongside the structured data.

pub mod agent;
pub mod cli;
pub mod collector;
pub mod config;
pub mod error;
pub mod llm;
pub mod planner;
pub mod tools;

pub use error::{Result, TriprError};
