//! CLI entry point and dispatch logic
//!
//! This module owns the `run()` function which:
//! - Parses CLI arguments
//! - Builds CliArgs and discovers Config
//! - Creates the tokio runtime
//! - Dispatches to command handlers
//! - Handles all error output

use anyhow::Result;
use clap::Parser;

use super::args::{Cli, Commands};
use super::commands;

use crate::error_reporter::utils as error_utils;
use crate::{CliArgs, Config, ExitCode, TaleQuizError};
use talequiz_utils::logging::init_tracing;
use talequiz_utils::redaction::redact_error_message;

/// Main CLI execution function.
///
/// This function handles ALL output including errors. It returns `Result<(), ExitCode>`:
/// - On success: returns `Ok(())` after printing any output
/// - On error: prints error message via contextual reporting, returns `Err(ExitCode)`
///
/// main.rs only calls `std::process::exit(code.as_i32())` on error - it does NOT print.
pub fn run() -> Result<(), ExitCode> {
    let cli = Cli::parse();

    // Fails only when a global subscriber is already installed; that one keeps logging
    if let Err(e) = init_tracing(cli.verbose, cli.log_json) {
        tracing::debug!(error = %e, "Tracing subscriber already installed");
    }

    let (rounds, pacing_ms, seed) = match &cli.command {
        Commands::Generate {
            rounds,
            pacing_ms,
            seed,
            ..
        } => (*rounds, *pacing_ms, *seed),
        _ => (None, None, None),
    };

    let cli_args = CliArgs {
        config_path: cli.config.clone(),
        base_url: cli.base_url.clone(),
        model: cli.model.clone(),
        rounds,
        pacing_ms,
        seed,
        corpus_path: cli.corpus.clone(),
    };

    // Discover and load configuration
    let config = match Config::discover(&cli_args) {
        Ok(config) => config,
        Err(err) => {
            if let Some(typed) = err.downcast_ref::<TaleQuizError>() {
                eprintln!("{}", error_utils::create_contextual_report(typed, "config"));
                return Err(typed.to_exit_code());
            }
            eprintln!(
                "✗ Failed to load configuration: {}",
                redact_error_message(&format!("{err:#}"))
            );
            return Err(ExitCode::CONFIG);
        }
    };

    // Create tokio runtime for async operations
    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("✗ Failed to create async runtime: {e}");
            return Err(ExitCode::INTERNAL);
        }
    };

    let operation = match &cli.command {
        Commands::Probe { .. } => "probe",
        Commands::Generate { .. } => "generate",
        Commands::Categories { .. } => "categories",
        Commands::Corpus { .. } => "corpus",
        Commands::Config { .. } => "config",
    };

    let result = rt.block_on(async {
        match cli.command {
            Commands::Probe {
                require_online,
                json,
            } => commands::execute_probe_command(require_online, json, &config).await,
            Commands::Generate {
                category,
                offline,
                json,
                ..
            } => commands::execute_generate_command(&category, offline, json, &config).await,
            Commands::Categories { json } => commands::execute_categories_command(json, &config),
            Commands::Corpus { json } => commands::execute_corpus_command(json, &config),
            Commands::Config { json } => commands::execute_config_command(json, &config),
        }
    });

    if let Err(error) = result {
        if let Some(typed) = error.downcast_ref::<TaleQuizError>() {
            eprintln!("{}", error_utils::create_contextual_report(typed, operation));
            return Err(typed.to_exit_code());
        }

        eprintln!(
            "✗ Unexpected error: {}",
            redact_error_message(&format!("{error:#}"))
        );
        eprintln!("\n  General troubleshooting:");
        eprintln!("    - Run with --verbose for more detailed output");
        eprintln!("    - Run 'talequiz config' to check the effective settings");
        return Err(ExitCode::INTERNAL);
    }

    Ok(())
}
