//! talequiz - Thai story and moral quizzes with a guaranteed local fallback
//!
//! talequiz prompts an OpenAI-compatible chat-completions endpoint for short
//! stories and multiple-choice questions about their morals. When the endpoint
//! is unreachable, or a reply does not follow the labelled-line format, the
//! affected item is built from a local story corpus instead.
//!
//! talequiz can be used in two ways:
//! - **CLI**: `talequiz probe`, `talequiz generate <category>`, ...
//! - **Library**: construct a [`QuizService`] and call
//!   [`QuizService::generate_question_set`]
//!
//! # Quick Start (CLI)
//!
//! ```bash
//! # Is the local model server up?
//! talequiz probe
//!
//! # Ten questions about animal fables, as JSON
//! talequiz generate animals --json
//! ```
//!
//! # Quick Start (Library)
//!
//! ```rust,no_run
//! use talequiz::{Config, QuizService};
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let config = Config::builder().rounds(5).build()?;
//! let backend = talequiz::llm::from_config(&config)?;
//! let mut service = QuizService::from_config(&config, backend);
//!
//! service.probe().await;
//! let category = config.category("animals")?;
//! let items = service
//!     .generate_question_set(&category.name, &category.themes, 5, None)
//!     .await;
//! assert_eq!(items.len(), 5);
//! # Ok(())
//! # }
//! ```
//!
//! # Stable Public API
//!
//! - [`Config`] and [`ConfigBuilder`] - Configuration management
//! - [`QuizService`] - Probe, completion and question-set generation
//! - [`QuestionSetItem`] - One generated quiz item
//! - [`TaleQuizError`] - Library error type
//! - [`ExitCode`] - CLI exit codes

pub use talequiz_config::{CategoryConfig, CliArgs, Config, ConfigBuilder, ConfigSource};
pub use talequiz_engine::{
    CorpusLoader, CorpusSource, GenerationSettings, ProgressListener, QuestionRecord,
    QuestionSetItem, QuizService, ServiceState, Source, StoryRecord,
};
pub use talequiz_utils::error::{TaleQuizError, UserFriendlyError};
pub use talequiz_utils::exit_codes::ExitCode;

/// Chat-completion transport
pub mod llm {
    pub use talequiz_llm::*;
}

pub mod cli;

#[doc(hidden)]
pub mod error_reporter;
