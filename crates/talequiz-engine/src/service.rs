//! The quiz service: backend, session state, corpus and random source

use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use std::time::Duration;

use talequiz_config::{Config, DEFAULT_FEW_SHOT_EXAMPLES, DEFAULT_PACING_MS};
use talequiz_llm::ChatBackend;

use crate::completion::ServiceState;
use crate::corpus::CorpusLoader;
use crate::records::StoryRecord;

/// Knobs that shape each generation round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationSettings {
    /// Corpus examples sampled into every prompt
    pub few_shot_examples: usize,
    /// Pause between model-backed rounds
    pub pacing: Duration,
}

impl GenerationSettings {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            few_shot_examples: config.generation.few_shot_examples,
            pacing: Duration::from_millis(config.generation.pacing_ms),
        }
    }
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            few_shot_examples: DEFAULT_FEW_SHOT_EXAMPLES,
            pacing: Duration::from_millis(DEFAULT_PACING_MS),
        }
    }
}

/// Owns everything a generation session mutates.
///
/// `ServiceState` is written only by [`QuizService::probe`] and
/// [`QuizService::reset`]; the corpus cache only by the loader. Rounds run
/// strictly in sequence through `&mut self`, so neither needs locking.
pub struct QuizService {
    pub(crate) backend: Arc<dyn ChatBackend>,
    pub(crate) state: ServiceState,
    pub(crate) corpus: CorpusLoader,
    pub(crate) rng: StdRng,
    pub(crate) settings: GenerationSettings,
}

impl QuizService {
    /// Create a service in the offline, fallback state.
    #[must_use]
    pub fn new(
        backend: Arc<dyn ChatBackend>,
        corpus: CorpusLoader,
        settings: GenerationSettings,
        rng: StdRng,
    ) -> Self {
        Self {
            backend,
            state: ServiceState::default(),
            corpus,
            rng,
            settings,
        }
    }

    /// Create a service from configuration.
    ///
    /// The random source is seeded from `[generation] seed` when set, from the
    /// OS otherwise.
    #[must_use]
    pub fn from_config(config: &Config, backend: Arc<dyn ChatBackend>) -> Self {
        let rng = match config.generation.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::new(
            backend,
            CorpusLoader::from_path(config.corpus.path.clone()),
            GenerationSettings::from_config(config),
            rng,
        )
    }

    #[must_use]
    pub fn state(&self) -> ServiceState {
        self.state
    }

    #[must_use]
    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    pub fn corpus_mut(&mut self) -> &mut CorpusLoader {
        &mut self.corpus
    }

    /// The loaded corpus (reads the resource on first use)
    pub fn stories(&mut self) -> Arc<[StoryRecord]> {
        self.corpus.load()
    }

    /// Corpus record at `index`, wrapping around
    pub fn story_by_index(&mut self, index: usize) -> StoryRecord {
        self.corpus.story_by_index(index)
    }

    /// Drop the cached corpus
    pub fn clear_cache(&mut self) {
        self.corpus.clear_cache();
    }
}
