//! Story and moral quiz generation
//!
//! A [`QuizService`] prompts a chat-completion backend for short stories and
//! multiple-choice questions about their morals, and substitutes content built
//! from a local story corpus whenever the backend is unreachable or its reply
//! does not parse. [`QuizService::generate_question_set`] always returns the
//! requested number of well-formed items.

mod completion;
mod corpus;
mod fallback;
mod labels;
mod orchestrator;
mod parse;
mod prompt;
mod records;
mod service;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use completion::ServiceState;
pub use corpus::{CorpusLoader, CorpusSource, builtin_stories, parse_corpus};
pub use fallback::{
    GENERIC_MORALS, QUESTION_TEMPLATES, assemble_options, fallback_question_for,
    sample_distractors,
};
pub use labels::{
    ANSWER_LABEL, MORAL_LABEL, OPTION_MARKERS, QUESTION_LABEL, TALE_LABEL, index_of_marker,
    marker_for,
};
pub use orchestrator::ProgressListener;
pub use parse::{parse_question, parse_question_or_default, parse_story};
pub use prompt::{
    PROBE_PARAMS, PROBE_PROMPT, QUESTION_PARAMS, QUESTION_SYSTEM_PROMPT, STORY_PARAMS,
    STORY_SYSTEM_PROMPT, build_question_prompt, build_story_prompt,
};
pub use records::{OPTION_COUNT, QuestionRecord, QuestionSetItem, Source, StoryRecord};
pub use service::{GenerationSettings, QuizService};
