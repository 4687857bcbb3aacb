//! Configuration management for talequiz
//!
//! This crate provides hierarchical configuration with discovery and precedence:
//! CLI > file > defaults. Supports TOML configuration files with `[llm]`,
//! `[generation]`, `[corpus]` and `[categories.<key>]` sections.

mod builder;
mod catalog;
mod cli_args;
mod discovery;
mod model;
mod sources;
mod validation;

pub use builder::ConfigBuilder;
pub use catalog::builtin_categories;
pub use cli_args::CliArgs;
pub use model::*;

use talequiz_utils::error::ConfigError;

impl Config {
    /// Look up a story category by key.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownCategory` listing the known keys.
    pub fn category(&self, key: &str) -> Result<&CategoryConfig, ConfigError> {
        self.categories
            .get(key)
            .ok_or_else(|| ConfigError::UnknownCategory {
                key: key.to_string(),
                known: self
                    .categories
                    .keys()
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }

    /// Full URL of the chat-completions endpoint
    #[must_use]
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.llm.base_url.trim_end_matches('/'))
    }
}
