//! Question-set generation

use std::time::Instant;
use tracing::{Instrument, debug};

use talequiz_utils::logging::{log_fallback, log_set_complete, round_span};

use crate::fallback::fallback_question_for;
use crate::parse::{parse_question, parse_story};
use crate::records::{QuestionRecord, QuestionSetItem, Source, StoryRecord};
use crate::service::QuizService;

/// Observer told about each finished round
pub trait ProgressListener {
    /// Called with `(done, total)` after every round, `done` counting from 1
    fn on_progress(&mut self, done: usize, total: usize);
}

impl<F: FnMut(usize, usize)> ProgressListener for F {
    fn on_progress(&mut self, done: usize, total: usize) {
        self(done, total);
    }
}

impl QuizService {
    /// Generate exactly `n` items for `category`.
    ///
    /// Themes are used round-robin. In fallback mode every item comes from the
    /// corpus without touching the backend. Otherwise each round asks the model
    /// for a story and a question and substitutes corpus content for whichever
    /// step fails. Never fails.
    pub async fn generate_question_set(
        &mut self,
        category: &str,
        themes: &[String],
        n: usize,
        mut progress: Option<&mut dyn ProgressListener>,
    ) -> Vec<QuestionSetItem> {
        let started = Instant::now();

        let items = if self.state.use_fallback {
            debug!(category = %category, rounds = n, "Fallback mode, skipping model");
            let items = self.build_fallback_set(category, n);
            if let Some(listener) = progress.as_mut() {
                for done in 1..=n {
                    listener.on_progress(done, n);
                }
            }
            items
        } else {
            let mut items = Vec::with_capacity(n);
            for round in 0..n {
                let theme = if themes.is_empty() {
                    category
                } else {
                    themes[round % themes.len()].as_str()
                };

                let item = self
                    .model_round(category, theme, round + 1)
                    .instrument(round_span(category, round + 1, n))
                    .await;
                items.push(item);

                if let Some(listener) = progress.as_mut() {
                    listener.on_progress(round + 1, n);
                }
                if round + 1 < n && !self.settings.pacing.is_zero() {
                    tokio::time::sleep(self.settings.pacing).await;
                }
            }
            items
        };

        let model_sourced = items
            .iter()
            .filter(|item| item.question_source == Source::Model)
            .count();
        log_set_complete(category, items.len(), model_sourced, started.elapsed().as_millis());
        items
    }

    async fn model_round(&mut self, category: &str, theme: &str, round: usize) -> QuestionSetItem {
        let (story, story_source) = match self.complete_story(category, theme).await {
            Ok(raw) => match parse_story(&raw) {
                Ok(story) => (story, Source::Model),
                Err(e) => {
                    log_fallback("story-parse", Some(round), &e);
                    (self.random_story(), Source::Fallback)
                }
            },
            Err(e) => {
                log_fallback("story", Some(round), &e);
                (self.random_story(), Source::Fallback)
            }
        };

        let (question, question_source) =
            match self.complete_question(&story.tale, category).await {
                Ok(raw) => match parse_question(&raw) {
                    Ok(question) => (question, Source::Model),
                    Err(e) => {
                        log_fallback("question-parse", Some(round), &e);
                        (self.fallback_question_about(&story), Source::Fallback)
                    }
                },
                Err(e) => {
                    log_fallback("question", Some(round), &e);
                    (self.fallback_question_about(&story), Source::Fallback)
                }
            };

        QuestionSetItem::new(
            format!("{category} - {theme}"),
            story.tale,
            question,
            story_source,
            question_source,
        )
    }

    /// Corpus question whose correct option is the moral of `story`
    fn fallback_question_about(&mut self, story: &StoryRecord) -> QuestionRecord {
        let corpus = self.corpus.load();
        fallback_question_for(story, &corpus, &mut self.rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedBackend, question_reply, story_reply};
    use crate::{CorpusLoader, GenerationSettings};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::sync::Arc;
    use std::time::Duration;
    use talequiz_llm::ConnectivityError;

    fn settings() -> GenerationSettings {
        GenerationSettings {
            few_shot_examples: 3,
            pacing: Duration::ZERO,
        }
    }

    fn service(backend: Arc<ScriptedBackend>) -> QuizService {
        QuizService::new(
            backend,
            CorpusLoader::default(),
            settings(),
            StdRng::seed_from_u64(42),
        )
    }

    fn themes() -> Vec<String> {
        vec!["ความขยัน".to_string(), "ความซื่อสัตย์".to_string()]
    }

    #[tokio::test]
    async fn test_fallback_mode_never_calls_backend() {
        let backend = Arc::new(ScriptedBackend::unreachable());
        let mut svc = service(backend.clone());

        let mut ticks = Vec::new();
        let mut record = |done: usize, total: usize| ticks.push((done, total));
        let items = svc
            .generate_question_set("นิทานสัตว์", &themes(), 10, Some(&mut record))
            .await;

        assert_eq!(items.len(), 10);
        assert_eq!(backend.calls(), 0);
        assert!(items.iter().all(QuestionSetItem::is_fallback));
        assert_eq!(items[0].story_title, "นิทานสัตว์ 1");
        assert_eq!(items[9].story_title, "นิทานสัตว์ 10");
        assert_eq!(ticks, (1..=10).map(|d| (d, 10)).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_model_rounds_use_model_content() {
        let backend = Arc::new(ScriptedBackend::new([
            Ok("Hello".to_string()),
            Ok(story_reply("เรื่องใหม่", "ข้อคิดใหม่")),
            Ok(question_reply("ถามอะไร?", ["ก1", "ข1", "ค1", "ง1"], 2, "ค1")),
        ]));
        let mut svc = service(backend.clone());
        assert!(svc.probe().await);

        let items = svc
            .generate_question_set("นิทานสัตว์", &themes(), 1, None)
            .await;

        assert_eq!(items.len(), 1);
        let item = &items[0];
        assert_eq!(item.story_title, "นิทานสัตว์ - ความขยัน");
        assert_eq!(item.story_content, "เรื่องใหม่");
        assert_eq!(item.options[item.correct_index], "ค1");
        assert_eq!(item.story_source, Source::Model);
        assert_eq!(item.question_source, Source::Model);

        // The question prompt is about the parsed story
        let question_prompt = &backend.requests()[2][1].content;
        assert!(question_prompt.contains("จากนิทานนี้: \"เรื่องใหม่\""));
    }

    #[tokio::test]
    async fn test_failed_question_asks_about_the_model_story() {
        let backend = Arc::new(ScriptedBackend::new([
            Ok("Hello".to_string()),
            Ok(story_reply("เรื่องของมดงาน", "ความสามัคคีคือพลัง")),
            Ok("ขออภัย ไม่สามารถสร้างคำถามได้".to_string()),
        ]));
        let mut svc = service(backend);
        svc.probe().await;

        let items = svc
            .generate_question_set("นิทานสัตว์", &themes(), 1, None)
            .await;

        let item = &items[0];
        assert_eq!(item.story_source, Source::Model);
        assert_eq!(item.question_source, Source::Fallback);
        assert_eq!(item.story_content, "เรื่องของมดงาน");
        assert_eq!(item.options[item.correct_index], "ความสามัคคีคือพลัง");
        assert_eq!(item.moral, "ความสามัคคีคือพลัง");
    }

    #[tokio::test]
    async fn test_transport_failures_fall_back_per_step() {
        let backend = Arc::new(ScriptedBackend::new([
            Ok("Hello".to_string()),
            Err(ConnectivityError::Timeout {
                duration: Duration::from_secs(60),
            }),
            Ok("not a question at all".to_string()),
        ]));
        let mut svc = service(backend.clone());
        svc.probe().await;

        let items = svc
            .generate_question_set("นิทานสัตว์", &themes(), 2, None)
            .await;

        assert_eq!(items.len(), 2);
        // Round 1: story timed out, question unparseable. Round 2: script exhausted.
        assert!(items.iter().all(QuestionSetItem::is_fallback));
        assert_eq!(backend.calls(), 5);
        // Session state survives per-call failures
        assert!(svc.state().is_online);

        let stories = svc.stories();
        for item in &items {
            let story = stories
                .iter()
                .find(|s| s.tale == item.story_content)
                .expect("fallback story comes from corpus");
            assert_eq!(item.options[item.correct_index], story.moral);
            assert_eq!(item.moral, story.moral);
        }
    }

    #[tokio::test]
    async fn test_themes_cycle_and_empty_themes_use_category() {
        let backend = Arc::new(ScriptedBackend::new([Ok("Hello".to_string())]));
        let mut svc = service(backend);
        svc.probe().await;

        let items = svc
            .generate_question_set("นิทานสัตว์", &themes(), 3, None)
            .await;
        let titles: Vec<_> = items.iter().map(|i| i.story_title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "นิทานสัตว์ - ความขยัน",
                "นิทานสัตว์ - ความซื่อสัตย์",
                "นิทานสัตว์ - ความขยัน",
            ]
        );

        let items = svc.generate_question_set("นิทานสัตว์", &[], 1, None).await;
        assert_eq!(items[0].story_title, "นิทานสัตว์ - นิทานสัตว์");
    }

    #[tokio::test]
    async fn test_zero_rounds_yields_empty_set() {
        let mut svc = service(Arc::new(ScriptedBackend::unreachable()));
        let items = svc.generate_question_set("นิทานสัตว์", &themes(), 0, None).await;
        assert!(items.is_empty());
    }
}
