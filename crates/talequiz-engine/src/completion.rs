//! Connectivity probe and model requests

use serde::Serialize;
use tracing::{debug, info, warn};

use talequiz_llm::{ConnectivityError, Message};
use talequiz_utils::redaction::redact_error_message;

use crate::prompt::{
    PROBE_PARAMS, PROBE_PROMPT, QUESTION_PARAMS, QUESTION_SYSTEM_PROMPT, STORY_PARAMS,
    STORY_SYSTEM_PROMPT, build_question_prompt, build_story_prompt,
};
use crate::service::QuizService;

/// Session connectivity state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceState {
    pub is_online: bool,
    pub use_fallback: bool,
}

impl Default for ServiceState {
    /// Offline until a probe succeeds
    fn default() -> Self {
        Self {
            is_online: false,
            use_fallback: true,
        }
    }
}

impl QuizService {
    /// Check that the completion endpoint answers.
    ///
    /// Sets the session online on any well-formed reply and offline with
    /// fallback otherwise. Failures are logged, never returned.
    pub async fn probe(&mut self) -> bool {
        let result = self
            .backend
            .complete(vec![Message::user(PROBE_PROMPT)], PROBE_PARAMS)
            .await;

        match result {
            Ok(reply) => {
                info!(
                    backend = self.backend.name(),
                    reply_chars = reply.chars().count(),
                    "Completion endpoint reachable"
                );
                self.state = ServiceState {
                    is_online: true,
                    use_fallback: false,
                };
                true
            }
            Err(e) => {
                warn!(
                    backend = self.backend.name(),
                    error = %redact_error_message(&e.to_string()),
                    "Completion endpoint unreachable, using fallback"
                );
                self.state = ServiceState {
                    is_online: false,
                    use_fallback: true,
                };
                false
            }
        }
    }

    /// Ask the model for a new story; returns the raw reply.
    ///
    /// # Errors
    ///
    /// Any `ConnectivityError` from the backend, unchanged.
    pub async fn complete_story(
        &mut self,
        category: &str,
        theme: &str,
    ) -> Result<String, ConnectivityError> {
        let count = self.settings.few_shot_examples;
        let examples = self.corpus.sample_examples(count, &mut self.rng);
        let prompt = build_story_prompt(&examples, category, theme);
        debug!(
            category = %category,
            theme = %theme,
            examples = examples.len(),
            prompt_chars = prompt.chars().count(),
            "Requesting story"
        );

        self.backend
            .complete(
                vec![Message::system(STORY_SYSTEM_PROMPT), Message::user(prompt)],
                STORY_PARAMS,
            )
            .await
    }

    /// Ask the model for a question about `story`; returns the raw reply.
    ///
    /// # Errors
    ///
    /// Any `ConnectivityError` from the backend, unchanged.
    pub async fn complete_question(
        &mut self,
        story: &str,
        category: &str,
    ) -> Result<String, ConnectivityError> {
        let count = self.settings.few_shot_examples;
        let examples = self.corpus.sample_examples(count, &mut self.rng);
        let prompt = build_question_prompt(story, &examples, &mut self.rng);
        debug!(
            category = %category,
            examples = examples.len(),
            prompt_chars = prompt.chars().count(),
            "Requesting question"
        );

        self.backend
            .complete(
                vec![Message::system(QUESTION_SYSTEM_PROMPT), Message::user(prompt)],
                QUESTION_PARAMS,
            )
            .await
    }

    /// Return to the construction state and drop the corpus cache
    pub fn reset(&mut self) {
        self.state = ServiceState::default();
        self.corpus.clear_cache();
        debug!("Service reset");
    }
}
