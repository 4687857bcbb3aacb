//! Logging and observability infrastructure for talequiz
//!
//! All diagnostics go to stderr through `tracing` so that JSON written to
//! stdout by the CLI stays machine-readable.

use std::io::IsTerminal;
use tracing::{Level, info, span, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::redaction::redact_error_message;

/// Check if colored output should be used.
///
/// Returns true only if stderr is a terminal and `NO_COLOR` is not set.
fn use_color() -> bool {
    std::io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}

/// Default filter directive when `RUST_LOG` is not set
#[must_use]
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "talequiz=debug,info"
    } else {
        "talequiz=info,warn"
    }
}

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` wins over the `verbose` default. With `json` set, every event is
/// emitted as one JSON object per line.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_tracing(verbose: bool, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter(verbose)))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_current_span(true),
            )
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(use_color())
                    .with_target(verbose)
                    .with_thread_ids(false)
                    .with_line_number(false)
                    .with_file(false)
                    .compact(),
            )
            .try_init()?;
    }

    Ok(())
}

/// Span wrapping a single generation round
pub fn round_span(category: &str, round: usize, total: usize) -> tracing::Span {
    span!(
        Level::INFO,
        "round",
        category = %category,
        round = round,
        total = total,
    )
}

/// Log a swallowed failure that was replaced by fallback content.
///
/// The error text is redacted before it is recorded.
pub fn log_fallback(stage: &str, round: Option<usize>, error: &dyn std::fmt::Display) {
    let sanitized = redact_error_message(&error.to_string());
    match round {
        Some(round) => warn!(stage = %stage, round = round, error = %sanitized, "Using fallback"),
        None => warn!(stage = %stage, error = %sanitized, "Using fallback"),
    }
}

/// Log the outcome of a completed question set
pub fn log_set_complete(category: &str, total: usize, model_sourced: usize, duration_ms: u128) {
    info!(
        category = %category,
        total = total,
        model_sourced = model_sourced,
        fallback_sourced = total - model_sourced.min(total),
        duration_ms = %duration_ms,
        "Question set generated"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_levels() {
        assert_eq!(default_filter(false), "talequiz=info,warn");
        assert_eq!(default_filter(true), "talequiz=debug,info");
    }

    #[test]
    fn test_round_span_is_constructible_without_subscriber() {
        let span = round_span("animals", 1, 10);
        let _guard = span.enter();
        log_fallback("story", Some(1), &"http://u:p@localhost refused");
        log_set_complete("animals", 10, 7, 42);
    }

    #[test]
    fn test_second_init_reports_error_instead_of_panicking() {
        // Whichever call installs the global subscriber, a later one must fail softly
        let _ = init_tracing(false, false);
        assert!(init_tracing(true, true).is_err());
    }
}
