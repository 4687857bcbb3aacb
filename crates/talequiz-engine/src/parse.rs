//! Labelled-line parsing of model replies
//!
//! Field values are sliced from the reply as sent; only surrounding
//! whitespace is trimmed.

use talequiz_utils::error::{FormatError, FormatKind};
use talequiz_utils::logging::log_fallback;

use crate::labels::{ANSWER_LABEL, MORAL_LABEL, QUESTION_LABEL, TALE_LABEL, index_of_marker};
use crate::records::{OPTION_COUNT, QuestionRecord, StoryRecord};

/// Separators accepted between an option marker and its text
const OPTION_SEPARATORS: [char; 2] = ['.', ')'];

fn trimmed_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().map(str::trim)
}

fn after_label<'a>(line: &'a str, label: &str) -> Option<&'a str> {
    line.strip_prefix(label).map(str::trim)
}

/// Parse a `นิทาน:` / `ข้อคิด:` reply.
///
/// Lines without a label that follow the tale line extend the tale. When a
/// label repeats, the last occurrence wins.
///
/// # Errors
///
/// `MissingTale` or `MissingMoral` when either field is empty after the scan.
pub fn parse_story(text: &str) -> Result<StoryRecord, FormatError> {
    let mut tale = String::new();
    let mut moral = String::new();
    let mut in_tale = false;

    for line in trimmed_lines(text) {
        if let Some(rest) = after_label(line, TALE_LABEL) {
            tale = rest.to_string();
            in_tale = true;
        } else if let Some(rest) = after_label(line, MORAL_LABEL) {
            moral = rest.to_string();
            in_tale = false;
        } else if in_tale && !line.is_empty() {
            if !tale.is_empty() {
                tale.push(' ');
            }
            tale.push_str(line);
        } else if line.is_empty() {
            in_tale = false;
        }
    }

    if tale.is_empty() {
        return Err(FormatError::new(FormatKind::MissingTale));
    }
    if moral.is_empty() {
        return Err(FormatError::new(FormatKind::MissingMoral));
    }
    Ok(StoryRecord::new(tale, moral))
}

/// Split `ก. text` into the option index and its text
fn option_line(line: &str) -> Option<(usize, &str)> {
    let marker = line.chars().next()?;
    let index = index_of_marker(marker)?;
    let rest = line[marker.len_utf8()..].trim_start();
    let text = rest.strip_prefix(OPTION_SEPARATORS)?;
    Some((index, text.trim()))
}

/// Parse a question reply: question line, four option lines, answer line, moral line.
///
/// # Errors
///
/// A `FormatError` naming the first missing or invalid part; never a partial record.
pub fn parse_question(text: &str) -> Result<QuestionRecord, FormatError> {
    let mut question = String::new();
    let mut options: [Option<String>; OPTION_COUNT] = Default::default();
    let mut answer: Option<usize> = None;
    let mut moral = String::new();

    for line in trimmed_lines(text) {
        if let Some(rest) = after_label(line, QUESTION_LABEL) {
            question = rest.to_string();
        } else if let Some(rest) = after_label(line, ANSWER_LABEL) {
            answer = rest
                .chars()
                .next()
                .and_then(|c| c.to_lowercase().next())
                .and_then(index_of_marker);
        } else if let Some(rest) = after_label(line, MORAL_LABEL) {
            moral = rest.to_string();
        } else if let Some((index, option)) = option_line(line) {
            options[index] = Some(option.to_string()).filter(|o| !o.is_empty());
        }
    }

    if question.is_empty() {
        return Err(FormatError::new(FormatKind::MissingQuestion));
    }
    let captured = options.iter().filter(|o| o.is_some()).count();
    if captured != OPTION_COUNT {
        return Err(FormatError::new(FormatKind::OptionCount(captured)));
    }
    let Some(correct_index) = answer else {
        return Err(FormatError::new(FormatKind::InvalidAnswer));
    };
    if moral.is_empty() {
        return Err(FormatError::new(FormatKind::MissingMoral));
    }

    let options = options.map(Option::unwrap_or_default);
    QuestionRecord::new(question, options, correct_index, moral)
}

/// [`parse_question`], substituting [`QuestionRecord::default_question`] on failure
#[must_use]
pub fn parse_question_or_default(text: &str) -> QuestionRecord {
    parse_question(text).unwrap_or_else(|e| {
        log_fallback("question-parse", None, &e);
        QuestionRecord::default_question()
    })
}
