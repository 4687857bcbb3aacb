use std::path::PathBuf;
use std::time::Duration;

use talequiz_utils::error::TaleQuizError;

use super::{CategoryConfig, Config, ConfigSource};

impl Config {
    /// Create a builder for programmatic configuration.
    ///
    /// Use this when embedding talequiz without config files or CLI flags.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use talequiz_config::Config;
    /// use std::time::Duration;
    ///
    /// let config = Config::builder()
    ///     .base_url("http://localhost:1234/v1")
    ///     .rounds(5)
    ///     .timeout(Duration::from_secs(30))
    ///     .build()
    ///     .expect("Failed to build config");
    /// ```
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }
}

/// Builder for programmatic configuration.
///
/// All values set via the builder are attributed to `ConfigSource::Programmatic`.
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    base_url: Option<String>,
    model: Option<String>,
    api_key_env: Option<String>,
    timeout: Option<Duration>,
    max_retries: Option<u32>,
    rounds: Option<usize>,
    pacing_ms: Option<u64>,
    few_shot_examples: Option<usize>,
    seed: Option<u64>,
    corpus_path: Option<PathBuf>,
    categories: Vec<(String, CategoryConfig)>,
}

impl ConfigBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Environment variable holding a bearer token
    #[must_use]
    pub fn api_key_env(mut self, var: impl Into<String>) -> Self {
        self.api_key_env = Some(var.into());
        self
    }

    /// Request timeout; sub-second precision is truncated
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }

    #[must_use]
    pub fn rounds(mut self, rounds: usize) -> Self {
        self.rounds = Some(rounds);
        self
    }

    #[must_use]
    pub fn pacing_ms(mut self, pacing_ms: u64) -> Self {
        self.pacing_ms = Some(pacing_ms);
        self
    }

    #[must_use]
    pub fn few_shot_examples(mut self, count: usize) -> Self {
        self.few_shot_examples = Some(count);
        self
    }

    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn corpus_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.corpus_path = Some(path.into());
        self
    }

    /// Add or replace a category
    #[must_use]
    pub fn category(mut self, key: impl Into<String>, category: CategoryConfig) -> Self {
        self.categories.push((key.into(), category));
        self
    }

    /// Build the configuration.
    ///
    /// # Errors
    ///
    /// Returns `TaleQuizError::Config` if any value is out of range.
    pub fn build(self) -> Result<Config, TaleQuizError> {
        let mut config = Config::default();
        let attr = &mut config.source_attribution;
        let programmatic = |attr: &mut std::collections::HashMap<String, ConfigSource>,
                            key: &str| {
            attr.insert(key.to_string(), ConfigSource::Programmatic);
        };

        for key in [
            "base_url",
            "model",
            "timeout_secs",
            "max_retries",
            "rounds",
            "pacing_ms",
            "few_shot_examples",
        ] {
            attr.insert(key.to_string(), ConfigSource::Default);
        }

        if let Some(url) = self.base_url {
            config.llm.base_url = url;
            programmatic(attr, "base_url");
        }
        if let Some(model) = self.model {
            config.llm.model = model;
            programmatic(attr, "model");
        }
        if let Some(var) = self.api_key_env {
            config.llm.api_key_env = Some(var);
            programmatic(attr, "api_key_env");
        }
        if let Some(timeout) = self.timeout {
            config.llm.timeout_secs = timeout.as_secs();
            programmatic(attr, "timeout_secs");
        }
        if let Some(retries) = self.max_retries {
            config.llm.max_retries = retries;
            programmatic(attr, "max_retries");
        }
        if let Some(rounds) = self.rounds {
            config.generation.rounds = rounds;
            programmatic(attr, "rounds");
        }
        if let Some(pacing_ms) = self.pacing_ms {
            config.generation.pacing_ms = pacing_ms;
            programmatic(attr, "pacing_ms");
        }
        if let Some(count) = self.few_shot_examples {
            config.generation.few_shot_examples = count;
            programmatic(attr, "few_shot_examples");
        }
        if let Some(seed) = self.seed {
            config.generation.seed = Some(seed);
            programmatic(attr, "seed");
        }
        if let Some(path) = self.corpus_path {
            config.corpus.path = Some(path);
            programmatic(attr, "corpus_path");
        }
        for (key, category) in self.categories {
            programmatic(attr, &format!("categories.{key}"));
            config.categories.insert(key, category);
        }

        config.validate()?;
        Ok(config)
    }
}
