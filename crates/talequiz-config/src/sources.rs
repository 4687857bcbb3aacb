use std::collections::BTreeMap;

use super::{Config, ConfigSource};

fn source_label(source: Option<&ConfigSource>) -> String {
    match source {
        Some(ConfigSource::Cli) => "cli",
        Some(ConfigSource::Config) => "config",
        Some(ConfigSource::Programmatic) => "programmatic",
        Some(ConfigSource::Default) | None => "default",
    }
    .to_string()
}

impl Config {
    /// Get effective configuration as key-value pairs with source attribution
    ///
    /// Ordered by key so `talequiz config` output is stable.
    #[must_use]
    pub fn effective_config(&self) -> BTreeMap<String, (String, String)> {
        let mut config = BTreeMap::new();

        let mut add_config = |key: &str, value: Option<String>| {
            if let Some(val) = value {
                let source = source_label(self.source_attribution.get(key));
                config.insert(key.to_string(), (val, source));
            }
        };

        add_config("base_url", Some(self.llm.base_url.clone()));
        add_config("model", Some(self.llm.model.clone()));
        add_config("api_key_env", self.llm.api_key_env.clone());
        add_config("timeout_secs", Some(self.llm.timeout_secs.to_string()));
        add_config("max_retries", Some(self.llm.max_retries.to_string()));
        add_config("rounds", Some(self.generation.rounds.to_string()));
        add_config("pacing_ms", Some(self.generation.pacing_ms.to_string()));
        add_config(
            "few_shot_examples",
            Some(self.generation.few_shot_examples.to_string()),
        );
        add_config("seed", self.generation.seed.map(|s| s.to_string()));
        add_config(
            "corpus_path",
            self.corpus.path.as_ref().map(|p| p.display().to_string()),
        );

        for (key, category) in &self.categories {
            let attr_key = format!("categories.{key}");
            add_config(&attr_key, Some(category.name.clone()));
        }

        config
    }
}
