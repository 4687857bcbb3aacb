//! JSON output shapes for the `--json` flags
//!
//! Field names are camelCase to match the serialized `QuestionSetItem`.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::{QuestionSetItem, ServiceState};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeJsonOutput {
    pub endpoint: String,
    pub model: String,
    #[serde(flatten)]
    pub state: ServiceState,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateJsonOutput {
    pub category: String,
    pub category_name: String,
    pub generated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub state: ServiceState,
    pub model_sourced: usize,
    pub items: Vec<QuestionSetItem>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryJsonEntry {
    pub key: String,
    pub name: String,
    pub description: String,
    pub themes: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CorpusJsonOutput {
    pub source: String,
    pub stories: usize,
    pub used_builtin: bool,
}

#[derive(Debug, Serialize)]
pub struct ConfigJsonEntry {
    pub value: String,
    pub source: String,
}

fn emit<T: Serialize>(value: &T, what: &str) -> Result<String> {
    serde_json::to_string_pretty(value).with_context(|| format!("Failed to emit {what} JSON"))
}

pub fn emit_probe_json(output: &ProbeJsonOutput) -> Result<String> {
    emit(output, "probe")
}

pub fn emit_generate_json(output: &GenerateJsonOutput) -> Result<String> {
    emit(output, "question set")
}

pub fn emit_categories_json(output: &[CategoryJsonEntry]) -> Result<String> {
    emit(&output, "categories")
}

pub fn emit_corpus_json(output: &CorpusJsonOutput) -> Result<String> {
    emit(output, "corpus")
}

pub fn emit_config_json(output: &BTreeMap<String, ConfigJsonEntry>) -> Result<String> {
    emit(output, "config")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_json_flattens_state() {
        let output = ProbeJsonOutput {
            endpoint: "http://localhost:1234/v1/chat/completions".to_string(),
            model: "local-model".to_string(),
            state: ServiceState::default(),
        };
        let value: serde_json::Value =
            serde_json::from_str(&emit_probe_json(&output).unwrap()).unwrap();
        assert_eq!(value["isOnline"], false);
        assert_eq!(value["useFallback"], true);
        assert_eq!(value["model"], "local-model");
    }
}
