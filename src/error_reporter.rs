//! Contextual error reports for the CLI
//!
//! Builds on [`UserFriendlyError::display_for_user`] and appends help that
//! depends on which command was running. Every report is passed through
//! secret redaction before it reaches the terminal.

use talequiz_utils::error::{ConfigError, ConnectivityError, TaleQuizError, UserFriendlyError};
use talequiz_utils::redaction::redact_error_message;

pub mod utils {
    use super::*;

    /// Render `error` for display, with hints specific to `operation`
    #[must_use]
    pub fn create_contextual_report(error: &TaleQuizError, operation: &str) -> String {
        let mut report = error.display_for_user();

        let hints = operation_hints(error, operation);
        if !hints.is_empty() {
            report.push_str(&format!("\n\nWhile running '{operation}':"));
            for hint in hints {
                report.push_str(&format!("\n  • {hint}"));
            }
        }

        redact_error_message(&report)
    }

    fn operation_hints(error: &TaleQuizError, operation: &str) -> Vec<&'static str> {
        match (operation, error) {
            ("config", TaleQuizError::Config(ConfigError::InvalidFile(_))) => {
                vec!["Pass --config to load a different file"]
            }
            ("generate", TaleQuizError::Config(ConfigError::UnknownCategory { .. })) => {
                vec!["Use a key from the first column of 'talequiz categories', not the display name"]
            }
            (_, TaleQuizError::Connectivity(ConnectivityError::Misconfiguration(_))) => {
                vec!["Export the variable named by [llm] api_key_env, or remove that setting"]
            }
            ("probe", TaleQuizError::Connectivity(_)) => vec![
                "Check that the local model server is running and a model is loaded",
                "Override the endpoint with --base-url",
            ],
            _ => Vec::new(),
        }
    }
}
