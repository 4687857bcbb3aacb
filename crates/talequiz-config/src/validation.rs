use talequiz_utils::error::{ConfigError, TaleQuizError};

use super::Config;

/// Upper bound on rounds per question set
pub const MAX_ROUNDS: usize = 50;

/// Upper bound on request timeout in seconds
pub const MAX_TIMEOUT_SECS: u64 = 600;

/// Upper bound on transport retries
pub const MAX_RETRIES_LIMIT: u32 = 5;

fn invalid(key: &str, value: impl Into<String>) -> TaleQuizError {
    TaleQuizError::Config(ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.into(),
    })
}

impl Config {
    /// Validate configuration values
    pub(crate) fn validate(&self) -> Result<(), TaleQuizError> {
        if self.llm.base_url.trim().is_empty() {
            return Err(invalid("base_url", "must not be empty"));
        }
        if !self.llm.base_url.starts_with("http://") && !self.llm.base_url.starts_with("https://")
        {
            return Err(invalid(
                "base_url",
                format!("'{}' must start with http:// or https://", self.llm.base_url),
            ));
        }
        if self.llm.model.trim().is_empty() {
            return Err(invalid("model", "must not be empty"));
        }

        if self.llm.timeout_secs == 0 {
            return Err(invalid("timeout_secs", "must be greater than 0"));
        }
        if self.llm.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(invalid(
                "timeout_secs",
                format!("exceeds maximum limit of {MAX_TIMEOUT_SECS} seconds"),
            ));
        }

        if self.llm.max_retries > MAX_RETRIES_LIMIT {
            return Err(invalid(
                "max_retries",
                format!("exceeds maximum limit of {MAX_RETRIES_LIMIT}"),
            ));
        }

        if self.generation.rounds == 0 {
            return Err(invalid("rounds", "must be greater than 0"));
        }
        if self.generation.rounds > MAX_ROUNDS {
            return Err(invalid(
                "rounds",
                format!("exceeds maximum limit of {MAX_ROUNDS}"),
            ));
        }

        if self.generation.few_shot_examples == 0 {
            return Err(invalid("few_shot_examples", "must be greater than 0"));
        }

        for (key, category) in &self.categories {
            if category.name.trim().is_empty() {
                return Err(invalid(&format!("categories.{key}.name"), "must not be empty"));
            }
            if category.themes.iter().all(|t| t.trim().is_empty()) {
                return Err(invalid(
                    &format!("categories.{key}.themes"),
                    "must contain at least one theme",
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CategoryConfig;

    fn invalid_key(config: &Config) -> String {
        match config.validate() {
            Err(TaleQuizError::Config(ConfigError::InvalidValue { key, .. })) => key,
            other => panic!("Expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_rounds_bounds() {
        let mut config = Config::default();
        config.generation.rounds = 0;
        assert_eq!(invalid_key(&config), "rounds");

        config.generation.rounds = MAX_ROUNDS + 1;
        assert_eq!(invalid_key(&config), "rounds");

        config.generation.rounds = MAX_ROUNDS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_llm_bounds() {
        let mut config = Config::default();
        config.llm.timeout_secs = 0;
        assert_eq!(invalid_key(&config), "timeout_secs");

        let mut config = Config::default();
        config.llm.max_retries = MAX_RETRIES_LIMIT + 1;
        assert_eq!(invalid_key(&config), "max_retries");

        let mut config = Config::default();
        config.llm.base_url = "localhost:1234".to_string();
        assert_eq!(invalid_key(&config), "base_url");
    }

    #[test]
    fn test_category_without_themes_is_rejected() {
        let mut config = Config::default();
        config
            .categories
            .insert("empty".to_string(), CategoryConfig::new("ว่าง", "", &[]));
        assert_eq!(invalid_key(&config), "categories.empty.themes");
    }
}
