//! CLI argument definitions and parsing structures
//!
//! This module defines the command-line interface structure using clap,
//! including the main `Cli` struct and the subcommand enum.

use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

/// talequiz - Thai story and moral quiz generator
#[derive(Parser)]
#[command(name = "talequiz")]
#[command(about = "Generate Thai story-and-moral quizzes from a local LLM, with a corpus fallback")]
#[command(long_about = r#"
talequiz asks an OpenAI-compatible chat-completions endpoint (LM Studio by
default) for short Thai stories and multiple-choice questions about their
morals. Whenever the endpoint is unreachable or a reply cannot be parsed, the
item is built from the bundled story corpus instead, so a set always contains
the number of questions requested.

EXAMPLES:
  # Check whether the local model server answers
  talequiz probe

  # Generate the default ten questions about animal fables
  talequiz generate animals

  # Build a reproducible set from the corpus only, as JSON
  talequiz generate friendship --offline --seed 7 --json

  # List categories and the effective configuration
  talequiz categories
  talequiz config

CONFIGURATION:
  Configuration is loaded with precedence: CLI flags > config file > defaults
  Config file is discovered by searching upward from CWD for .talequiz/config.toml
  Use --config to specify an explicit config file path
"#)]
#[command(version)]
pub struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Base URL of the chat-completions API (e.g. http://localhost:1234/v1)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Model identifier sent with every request
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Story corpus JSON file (defaults to the bundled corpus)
    #[arg(long, global = true)]
    pub corpus: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit log lines as JSON on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check whether the completion endpoint answers
    Probe {
        /// Exit with code 69 when the endpoint is unavailable
        #[arg(long)]
        require_online: bool,

        /// Output the resulting service state as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate a question set for a story category
    Generate {
        /// Category key (see `talequiz categories`)
        category: String,

        /// Number of questions in the set
        #[arg(short = 'n', long)]
        rounds: Option<usize>,

        /// Pause between model rounds in milliseconds
        #[arg(long)]
        pacing_ms: Option<u64>,

        /// Seed for example sampling and option shuffling
        #[arg(long)]
        seed: Option<u64>,

        /// Skip the probe and build every item from the corpus
        #[arg(long)]
        offline: bool,

        /// Output the question set as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the configured story categories
    Categories {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the story corpus in use
    Corpus {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the effective configuration and where each value came from
    Config {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Build the clap command (used for help rendering in tests)
#[must_use]
pub fn build_cli() -> clap::Command {
    Cli::command()
}
