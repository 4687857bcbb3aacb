use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use talequiz_utils::error::{ConfigError, TaleQuizError};

use super::{CategoryConfig, CliArgs, Config, ConfigSource, CorpusConfig};

/// Directory searched for on the way up from the start directory
const CONFIG_DIR: &str = ".talequiz";

/// TOML configuration file structure
#[derive(Debug, Default, Deserialize)]
struct TomlConfig {
    llm: Option<TomlLlm>,
    generation: Option<TomlGeneration>,
    corpus: Option<CorpusConfig>,
    categories: Option<BTreeMap<String, CategoryConfig>>,
}

#[derive(Debug, Default, Deserialize)]
struct TomlLlm {
    base_url: Option<String>,
    model: Option<String>,
    api_key_env: Option<String>,
    timeout_secs: Option<u64>,
    max_retries: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct TomlGeneration {
    rounds: Option<usize>,
    pacing_ms: Option<u64>,
    few_shot_examples: Option<usize>,
    seed: Option<u64>,
}

/// Overwrite `$target` with `$value` when present and record where it came from
macro_rules! apply {
    ($attr:ident, $source:expr, $key:literal, $target:expr, $value:expr) => {
        if let Some(v) = $value {
            $target = v;
            $attr.insert($key.to_string(), $source.clone());
        }
    };
}

impl Config {
    /// Discover and load configuration with precedence: CLI > file > defaults
    ///
    /// Uses the current working directory for config file discovery when no
    /// explicit path is provided in `cli_args`.
    pub fn discover(cli_args: &CliArgs) -> Result<Self> {
        let start_dir = std::env::current_dir().context("Failed to get current directory")?;
        Self::discover_from(&start_dir, cli_args)
    }

    /// Discover and load configuration starting from a specific directory
    ///
    /// This is the path-driven variant used by tests to avoid process-global state.
    pub fn discover_from(start_dir: &Path, cli_args: &CliArgs) -> Result<Self> {
        let mut config = Config::default();
        let attr = &mut config.source_attribution;
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

        let config_path = match &cli_args.config_path {
            Some(explicit_path) => Some(explicit_path.clone()),
            None => Self::discover_config_file_from(start_dir),
        };

        if let Some(path) = &config_path {
            let file_config = Self::load_config_file(path)
                .with_context(|| format!("Failed to load config file: {}", path.display()))?;
            config.apply_file(file_config, path);
        }

        config.apply_cli(cli_args);
        config.validate()?;
        Ok(config)
    }

    fn apply_file(&mut self, file: TomlConfig, path: &Path) {
        let source = ConfigSource::Config;
        let attr = &mut self.source_attribution;

        if let Some(llm) = file.llm {
            apply!(attr, source, "base_url", self.llm.base_url, llm.base_url);
            apply!(attr, source, "model", self.llm.model, llm.model);
            apply!(attr, source, "timeout_secs", self.llm.timeout_secs, llm.timeout_secs);
            apply!(attr, source, "max_retries", self.llm.max_retries, llm.max_retries);
            if llm.api_key_env.is_some() {
                self.llm.api_key_env = llm.api_key_env;
                attr.insert("api_key_env".to_string(), source.clone());
            }
        }

        if let Some(generation) = file.generation {
            apply!(attr, source, "rounds", self.generation.rounds, generation.rounds);
            apply!(attr, source, "pacing_ms", self.generation.pacing_ms, generation.pacing_ms);
            apply!(
                attr,
                source,
                "few_shot_examples",
                self.generation.few_shot_examples,
                generation.few_shot_examples
            );
            if generation.seed.is_some() {
                self.generation.seed = generation.seed;
                attr.insert("seed".to_string(), source.clone());
            }
        }

        if let Some(corpus) = file.corpus
            && let Some(corpus_path) = corpus.path
        {
            // Relative corpus paths are resolved against the config file's project root
            let resolved = if corpus_path.is_relative() {
                path.parent()
                    .and_then(Path::parent)
                    .map_or(corpus_path.clone(), |root| root.join(&corpus_path))
            } else {
                corpus_path
            };
            self.corpus.path = Some(resolved);
            attr.insert("corpus_path".to_string(), source.clone());
        }

        if let Some(categories) = file.categories {
            for (key, category) in categories {
                attr.insert(format!("categories.{key}"), source.clone());
                self.categories.insert(key, category);
            }
        }
    }

    fn apply_cli(&mut self, cli_args: &CliArgs) {
        let source = ConfigSource::Cli;
        let attr = &mut self.source_attribution;
        apply!(attr, source, "base_url", self.llm.base_url, cli_args.base_url.clone());
        apply!(attr, source, "model", self.llm.model, cli_args.model.clone());
        apply!(attr, source, "rounds", self.generation.rounds, cli_args.rounds);
        apply!(attr, source, "pacing_ms", self.generation.pacing_ms, cli_args.pacing_ms);
        if cli_args.seed.is_some() {
            self.generation.seed = cli_args.seed;
            attr.insert("seed".to_string(), source.clone());
        }
        if cli_args.corpus_path.is_some() {
            self.corpus.path = cli_args.corpus_path.clone();
            attr.insert("corpus_path".to_string(), source.clone());
        }
    }

    /// Search upward from `start_dir` for `.talequiz/config.toml`.
    ///
    /// Stops at the filesystem root or at a repository root (`.git`, `.hg`).
    #[must_use]
    pub fn discover_config_file_from(start_dir: &Path) -> Option<PathBuf> {
        let mut current_dir = Some(start_dir);

        while let Some(dir) = current_dir {
            let config_path = dir.join(CONFIG_DIR).join("config.toml");
            if config_path.exists() {
                return Some(config_path);
            }
            if dir.join(".git").exists() || dir.join(".hg").exists() {
                break;
            }
            current_dir = dir.parent();
        }

        None
    }

    /// Load configuration from TOML file
    fn load_config_file(path: &Path) -> Result<TomlConfig> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| {
                TaleQuizError::Config(ConfigError::InvalidFile(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
                .into()
            }),
            // Missing explicit config file is OK - defaults apply
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(TomlConfig::default()),
            Err(e) => Err(TaleQuizError::Config(ConfigError::InvalidFile(format!(
                "{}: {}",
                path.display(),
                e
            )))
            .into()),
        }
    }

    /// Keys whose value did not come from the defaults
    #[must_use]
    pub fn overridden_keys(&self) -> HashMap<&str, &ConfigSource> {
        self.source_attribution
            .iter()
            .filter(|(_, source)| **source != ConfigSource::Default)
            .map(|(key, source)| (key.as_str(), source))
            .collect()
    }
}
