use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::PathBuf;

use tripr::cli::{Cli, Commands};
use tripr::config::{Config, Credentials};
use tripr::llm::{LlmClient, OpenRouterClient, OpenRouterConfig};
use tripr::planner::plan_trip;
use tripr::tools::ToolExecutor;

fn setup_logging() -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tripr")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("tripr.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

async fn handle_plan_command(prompt: &str, json: bool, config: &Config) -> Result<()> {
    info!("Planning trip for prompt: {}", prompt);

    let credentials = Credentials::from_env().context("Missing upstream API credentials")?;
    let llm = OpenRouterClient::with_api_key(
        credentials.openrouter_api_key.clone(),
        OpenRouterConfig::from(&config.llm),
    )
    .context("Failed to create OpenRouter client")?;
    eyre::ensure!(llm.is_ready(), "OpenRouter client is not ready: empty API key");

    let response = plan_trip(&llm, config, credentials, prompt)
        .await
        .context("Trip planning failed")?;

    let usage = llm.total_usage();
    info!(
        "LLM usage: {} prompt + {} completion tokens ({} total)",
        usage.prompt_tokens,
        usage.completion_tokens,
        usage.total()
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    println!("{}", "Itinerary".green().bold());
    println!("{}\n", response.result);

    let structured = &response.structured;
    println!(
        "{} {} on {}",
        "Trip:".cyan(),
        structured.metadata.destination,
        structured.metadata.date
    );
    println!(
        "{} {} flights, {} hotels, {} events, {} attractions",
        "Collected:".cyan(),
        structured.flights.len(),
        structured.hotels.len(),
        structured.events.len(),
        structured.attractions.len()
    );

    Ok(())
}

fn handle_tools_command() -> Result<()> {
    let executor = ToolExecutor::standard();
    let mut definitions = executor.definitions();
    definitions.sort_by(|a, b| a.name.cmp(&b.name));

    for definition in definitions {
        println!("{}", definition.name.green().bold());
        println!("  {}", definition.description);
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging()?;

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_ref())?;

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    match &cli.command {
        Commands::Plan { prompt, json } => handle_plan_command(prompt, *json, &config).await,
        Commands::Tools => handle_tools_command(),
    }
}
