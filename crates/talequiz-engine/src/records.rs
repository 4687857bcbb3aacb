//! Records produced by the generation pipeline

use serde::{Deserialize, Serialize};

use talequiz_utils::error::{FormatError, FormatKind};

/// Number of options in every question
pub const OPTION_COUNT: usize = 4;

/// A tale and the moral it teaches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryRecord {
    pub tale: String,
    pub moral: String,
}

impl StoryRecord {
    #[must_use]
    pub fn new(tale: impl Into<String>, moral: impl Into<String>) -> Self {
        Self {
            tale: tale.into(),
            moral: moral.into(),
        }
    }

    /// Both fields carry text after trimming
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.tale.trim().is_empty() && !self.moral.trim().is_empty()
    }
}

/// A multiple-choice question about a story's moral.
///
/// Construction through [`QuestionRecord::new`] guarantees four distinct
/// non-empty options, an in-range `correct_index`, and non-empty question
/// and moral text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRecord {
    question: String,
    options: [String; OPTION_COUNT],
    correct_index: usize,
    moral: String,
}

impl QuestionRecord {
    /// Validate and build a question.
    ///
    /// # Errors
    ///
    /// Returns a `FormatError` naming the first violated rule.
    pub fn new(
        question: impl Into<String>,
        options: [String; OPTION_COUNT],
        correct_index: usize,
        moral: impl Into<String>,
    ) -> Result<Self, FormatError> {
        let question = question.into();
        let moral = moral.into();

        if question.trim().is_empty() {
            return Err(FormatError::new(FormatKind::MissingQuestion));
        }
        let filled = options.iter().filter(|o| !o.trim().is_empty()).count();
        if filled != OPTION_COUNT {
            return Err(FormatError::new(FormatKind::OptionCount(filled)));
        }
        for (i, option) in options.iter().enumerate() {
            if options[..i].contains(option) {
                return Err(FormatError::new(FormatKind::DuplicateOption));
            }
        }
        if correct_index >= OPTION_COUNT {
            return Err(FormatError::new(FormatKind::InvalidAnswer));
        }
        if moral.trim().is_empty() {
            return Err(FormatError::new(FormatKind::MissingMoral));
        }

        Ok(Self {
            question,
            options,
            correct_index,
            moral,
        })
    }

    /// The fixed question substituted when a reply cannot be parsed.
    ///
    /// Its moral is the correct option so the record stays self-consistent.
    #[must_use]
    pub fn default_question() -> Self {
        Self {
            question: "ข้อคิดจากเรื่องนี้คืออะไร?".to_string(),
            options: [
                "ความพยายามนำไปสู่ความสำเร็จ".to_string(),
                "ความซื่อสัตย์เป็นสิ่งสำคัญ".to_string(),
                "การใช้ปัญญาแก้ปัญหา".to_string(),
                "มิตรภาพมีค่ามาก".to_string(),
            ],
            correct_index: 0,
            moral: "ความพยายามนำไปสู่ความสำเร็จ".to_string(),
        }
    }

    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    #[must_use]
    pub fn options(&self) -> &[String; OPTION_COUNT] {
        &self.options
    }

    #[must_use]
    pub fn correct_index(&self) -> usize {
        self.correct_index
    }

    #[must_use]
    pub fn correct_option(&self) -> &str {
        &self.options[self.correct_index]
    }

    #[must_use]
    pub fn moral(&self) -> &str {
        &self.moral
    }
}

/// Where a piece of an item came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Model,
    Fallback,
}

/// One round of a question set, as handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionSetItem {
    pub story_title: String,
    pub story_content: String,
    pub question: String,
    pub options: [String; OPTION_COUNT],
    pub correct_index: usize,
    pub moral: String,
    pub story_source: Source,
    pub question_source: Source,
}

impl QuestionSetItem {
    #[must_use]
    pub fn new(
        story_title: impl Into<String>,
        story_content: impl Into<String>,
        question: QuestionRecord,
        story_source: Source,
        question_source: Source,
    ) -> Self {
        Self {
            story_title: story_title.into(),
            story_content: story_content.into(),
            question: question.question,
            options: question.options,
            correct_index: question.correct_index,
            moral: question.moral,
            story_source,
            question_source,
        }
    }

    /// True when neither the story nor the question came from the model
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.story_source == Source::Fallback && self.question_source == Source::Fallback
    }
}
