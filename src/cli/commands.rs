//! CLI command definitions using clap.
//!
//! Two subcommands:
//! - plan: run the full trip-planning pipeline for a free-text request
//! - tools: list the search tools exposed to the model

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Tripr - an LLM travel agent over flight, hotel, event, and attraction search
#[derive(Parser, Debug)]
#[command(name = "tripr")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Plan a trip from a free-text request
    Plan {
        /// The trip request (e.g. "a weekend in Chicago in early May")
        prompt: String,

        /// Print the full response as JSON instead of formatted text
        #[arg(short, long)]
        json: bool,
    },

    /// List the search tools available to the model
    Tools,
}
