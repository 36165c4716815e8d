//! Trip planning pipeline
//!
//! One call to [`plan_trip`] runs the whole flow: metadata extraction, the
//! tool-calling agent loop, and the final natural-language summary over
//! whatever the tools collected.

pub mod metadata;
pub mod summary;

use serde::{Deserialize, Serialize};

use crate::agent::Agent;
use crate::collector::{CollectedResults, Collector};
use crate::config::{Config, Credentials};
use crate::error::Result;
use crate::llm::LlmClient;
use crate::tools::{ToolContext, ToolExecutor};

pub use metadata::extract_metadata;
pub use summary::{condense, summarize};

/// Final output of a trip request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanResponse {
    /// Natural-language itinerary suggestion
    pub result: String,
    /// Everything the tools collected, by category
    pub structured: CollectedResults,
}

/// Plan a trip from a free-text request.
///
/// Sections whose tool never fired (or failed) come back as empty arrays,
/// never omitted.
pub async fn plan_trip(
    llm: &dyn LlmClient,
    config: &Config,
    credentials: Credentials,
    prompt: &str,
) -> Result<PlanResponse> {
    let collector = Collector::new(config.search.max_items);

    let metadata = extract_metadata(llm, config, prompt).await?;
    collector.set_metadata(metadata);

    let ctx = ToolContext::new(config, credentials, collector.clone())?;
    let executor = ToolExecutor::standard();
    let agent = Agent::new(llm, &executor, config);

    // The agent's own recap is discarded; the summary is built from the
    // collector so it reflects what the tools actually returned
    let _ = agent.run(prompt, &ctx).await?;

    let collected = collector.snapshot();
    let result = summarize(llm, config, &collected).await?;

    Ok(PlanResponse {
        result,
        structured: collected,
    })
}
