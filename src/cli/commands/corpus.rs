//! `talequiz corpus`

use anyhow::Result;

use super::json_emit::{CorpusJsonOutput, emit_corpus_json};
use crate::{Config, CorpusLoader, CorpusSource};

fn describe(source: &CorpusSource) -> String {
    match source {
        CorpusSource::Bundled => "bundled".to_string(),
        CorpusSource::File(path) => path.display().to_string(),
        CorpusSource::Inline(_) => "inline".to_string(),
    }
}

/// Load the configured corpus and report its size.
///
/// A corpus that fails to load is not an error here: the report says the
/// built-in stories were used instead.
pub fn execute_corpus_command(json: bool, config: &Config) -> Result<()> {
    let mut loader = CorpusLoader::from_path(config.corpus.path.clone());
    let stories = loader.load();
    let output = CorpusJsonOutput {
        source: describe(loader.source()),
        stories: stories.len(),
        used_builtin: loader.used_builtin(),
    };

    if json {
        println!("{}", emit_corpus_json(&output)?);
    } else if output.used_builtin {
        println!(
            "⚠ {} could not be loaded; using {} built-in stories",
            output.source, output.stories
        );
    } else {
        println!("✓ {} stories from {}", output.stories, output.source);
    }
    Ok(())
}
