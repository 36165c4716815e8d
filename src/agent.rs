//! Tool-calling agent loop
//!
//! Drives the conversation with the LLM: the model is handed the four search
//! tools, every tool call it makes is executed and echoed back as a
//! `role: tool` message, and the loop ends when the model answers in plain
//! text (or the turn cap is hit).

use chrono::{Days, Utc};

use crate::config::Config;
use crate::error::{Result, TriprError};
use crate::llm::{CompletionRequest, LlmClient, Message};
use crate::tools::{ToolContext, ToolExecutor};

pub struct Agent<'a> {
    llm: &'a dyn LlmClient,
    executor: &'a ToolExecutor,
    max_turns: usize,
    max_tokens: u32,
    temperature: f64,
    default_origin: String,
}

/// System prompt anchoring the model to real dates and forcing all four tools
fn system_prompt(default_origin: &str) -> String {
    let today = Utc::now().date_naive();
    let tomorrow = today + Days::new(1);

    format!(
        "Today is {today}. Interpret any date the user mentions (like May 7 or July 1) as the next \
         occurrence of that date unless they name a year, and use the user's dates exactly as given \
         for flight and hotel searches.\n\
         You have four tools: search_flights, search_hotels, search_events, and search_attractions. \
         Call ALL FOUR tools for every request, no matter which part the user emphasizes, even if a \
         tool may return nothing.\n\
         When calling search_flights, convert city names to IATA airport codes (Boston -> BOS, \
         New York -> JFK). When calling search_hotels, use the IATA city code for the destination.\n\
         If the user does not name a departure city, depart from {default_origin}. If the user does \
         not name a travel date, use tomorrow ({tomorrow}).\n\
         When searching attractions, favor the city's best-known landmarks.\n\
         Once you have the tool results, reply with a short plain-text recap of what you found."
    )
}

impl<'a> Agent<'a> {
    pub fn new(llm: &'a dyn LlmClient, executor: &'a ToolExecutor, config: &Config) -> Self {
        Self {
            llm,
            executor,
            max_turns: config.agent.max_turns as usize,
            max_tokens: config.llm.max_tokens,
            temperature: config.llm.temperature,
            default_origin: config.agent.default_origin.clone(),
        }
    }

    /// Run the tool loop for one user prompt.
    ///
    /// Tool failures are fed back to the model as tool results rather than
    /// aborting the run; the model decides whether to retry or move on.
    pub async fn run(&self, prompt: &str, ctx: &ToolContext) -> Result<String> {
        let mut request = CompletionRequest::new(system_prompt(&self.default_origin))
            .with_user_message(prompt)
            .with_tools(self.executor.definitions())
            .with_max_tokens(self.max_tokens)
            .with_temperature(self.temperature);

        for turn in 0..self.max_turns {
            let response = self.llm.complete(request.clone()).await?;

            if !response.finish_reason.needs_tool_execution() || response.tool_calls.is_empty() {
                log::debug!("Agent finished after {} turn(s)", turn + 1);
                return Ok(response.content);
            }

            log::debug!(
                "Turn {}: executing {} tool call(s)",
                turn + 1,
                response.tool_calls.len()
            );

            let content = if response.content.is_empty() {
                None
            } else {
                Some(response.content.clone())
            };
            request = request.with_message(Message::assistant_tool_calls(content, &response.tool_calls));

            for (call_id, result) in self.executor.execute_all(&response.tool_calls, ctx).await {
                if result.is_error {
                    log::warn!("Tool call {} failed: {}", call_id, result.content);
                }
                request = request.with_message(Message::tool(call_id, result.content));
            }
        }

        Err(TriprError::Llm(format!(
            "agent did not finish within {} turns",
            self.max_turns
        )))
    }
}
