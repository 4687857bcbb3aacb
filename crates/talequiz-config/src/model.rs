use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use crate::catalog::builtin_categories;

/// Default chat-completions base URL (LM Studio's local server)
pub const DEFAULT_BASE_URL: &str = "http://localhost:1234/v1";

/// Default model identifier sent in every request
pub const DEFAULT_MODEL: &str = "local-model";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default retry count for 5xx and network failures
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Default number of rounds in a question set
pub const DEFAULT_ROUNDS: usize = 10;

/// Default pause between rounds in milliseconds
pub const DEFAULT_PACING_MS: u64 = 1000;

/// Default number of few-shot examples sampled per request
pub const DEFAULT_FEW_SHOT_EXAMPLES: usize = 3;

/// Where a configuration value came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    /// Value provided via CLI argument (highest precedence).
    Cli,
    /// Value loaded from configuration file.
    Config,
    /// Value provided programmatically (e.g., `Config::builder()`).
    Programmatic,
    /// Built-in default value (lowest precedence).
    Default,
}

/// Configuration for talequiz operations.
///
/// Precedence: CLI arguments > config file > built-in defaults.
///
/// # Configuration File Format
///
/// ```toml
/// [llm]
/// base_url = "http://localhost:1234/v1"
/// model = "local-model"
///
/// [generation]
/// rounds = 10
/// pacing_ms = 1000
///
/// [categories.animals]
/// name = "นิทานสัตว์"
/// themes = ["ความขยัน", "ความซื่อสัตย์"]
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Completion endpoint settings.
    pub llm: LlmConfig,
    /// Question-set generation settings.
    pub generation: GenerationConfig,
    /// Story corpus location.
    pub corpus: CorpusConfig,
    /// Story categories keyed by their CLI name.
    pub categories: BTreeMap<String, CategoryConfig>,
    /// Source attribution for each setting (for `talequiz config`).
    pub source_attribution: HashMap<String, ConfigSource>,
}

/// `[llm]` section
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    /// Name of an environment variable holding a bearer token, if the endpoint needs one
    pub api_key_env: Option<String>,
    pub timeout_secs: u64,
    pub max_retries: u32,
}

/// `[generation]` section
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationConfig {
    pub rounds: usize,
    pub pacing_ms: u64,
    pub few_shot_examples: usize,
    /// Fixed RNG seed; `None` seeds from the OS
    pub seed: Option<u64>,
}

/// `[corpus]` section
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct CorpusConfig {
    /// Replaces the bundled corpus when set
    pub path: Option<PathBuf>,
}

/// `[categories.<key>]` section
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CategoryConfig {
    /// Display name used in item titles
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Themes cycled through round by round
    pub themes: Vec<String>,
}

impl CategoryConfig {
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>, themes: &[&str]) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            themes: themes.iter().map(|t| (*t).to_string()).collect(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key_env: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            rounds: DEFAULT_ROUNDS,
            pacing_ms: DEFAULT_PACING_MS,
            few_shot_examples: DEFAULT_FEW_SHOT_EXAMPLES,
            seed: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm: LlmConfig::default(),
            generation: GenerationConfig::default(),
            corpus: CorpusConfig::default(),
            categories: builtin_categories(),
            source_attribution: HashMap::new(),
        }
    }
}
