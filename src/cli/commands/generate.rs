//! `talequiz generate <category>`

use anyhow::Result;
use std::sync::Arc;

use super::json_emit::{GenerateJsonOutput, emit_generate_json};
use crate::{Config, QuestionSetItem, QuizService, Source, TaleQuizError};
use talequiz_engine::{MORAL_LABEL, QUESTION_LABEL, marker_for};
use talequiz_llm::{ChatBackend, UnavailableBackend};

/// Probe (unless `offline`), generate the configured number of questions for
/// `category_key` and print them.
///
/// Progress goes to stderr; the set itself to stdout. A completion client that
/// cannot be built is logged and the set comes from the corpus alone.
pub async fn execute_generate_command(
    category_key: &str,
    offline: bool,
    json: bool,
    config: &Config,
) -> Result<()> {
    let category = config.category(category_key).map_err(TaleQuizError::from)?;
    let rounds = config.generation.rounds;

    let (backend, usable): (Arc<dyn ChatBackend>, bool) = match talequiz_llm::from_config(config)
    {
        Ok(backend) => (backend, true),
        Err(e) => {
            tracing::warn!(
                error = %e,
                "Completion client unavailable, building the set from the story corpus"
            );
            (Arc::new(UnavailableBackend::new(e)), false)
        }
    };
    let mut service = QuizService::from_config(config, backend);

    if offline {
        tracing::info!("Offline mode, building the set from the story corpus");
    } else if usable {
        service.probe().await;
    }

    let mut report = |done: usize, total: usize| {
        eprintln!("  [{done}/{total}] {}", category.name);
    };
    let items = service
        .generate_question_set(&category.name, &category.themes, rounds, Some(&mut report))
        .await;

    let model_sourced = items
        .iter()
        .filter(|item| item.question_source == Source::Model)
        .count();

    if json {
        let output = GenerateJsonOutput {
            category: category_key.to_string(),
            category_name: category.name.clone(),
            generated_at: chrono::Utc::now(),
            state: service.state(),
            model_sourced,
            items,
        };
        println!("{}", emit_generate_json(&output)?);
    } else {
        for (i, item) in items.iter().enumerate() {
            println!("{}", render_item(i + 1, item));
        }
        println!(
            "✓ {} questions ({model_sourced} from the model, {} from the corpus)",
            items.len(),
            items.len() - model_sourced
        );
    }
    Ok(())
}

fn source_tag(source: Source) -> &'static str {
    match source {
        Source::Model => "model",
        Source::Fallback => "corpus",
    }
}

fn render_item(number: usize, item: &QuestionSetItem) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{number}. {} [story: {}, question: {}]\n",
        item.story_title,
        source_tag(item.story_source),
        source_tag(item.question_source)
    ));
    out.push_str(&format!("   {}\n", item.story_content));
    out.push_str(&format!("   {QUESTION_LABEL} {}\n", item.question));
    for (idx, option) in item.options.iter().enumerate() {
        let mark = if idx == item.correct_index { " ✓" } else { "" };
        out.push_str(&format!("     {}. {option}{mark}\n", marker_for(idx)));
    }
    out.push_str(&format!("   {MORAL_LABEL} {}", item.moral));
    out
}
