//! Line labels shared by the prompts and the reply parser.
//!
//! The prompts ask the model to answer with exactly these prefixes, so the
//! two sides must never drift apart.

/// Prefix of the story line
pub const TALE_LABEL: &str = "นิทาน:";

/// Prefix of the moral line
pub const MORAL_LABEL: &str = "ข้อคิด:";

/// Prefix of the question line
pub const QUESTION_LABEL: &str = "คำถาม:";

/// Prefix of the answer line
pub const ANSWER_LABEL: &str = "ตอบ:";

/// Option markers in display order; index `i` labels option `i`
pub const OPTION_MARKERS: [char; 4] = ['ก', 'ข', 'ค', 'ง'];

/// Marker for the option at `index`
#[must_use]
pub fn marker_for(index: usize) -> char {
    OPTION_MARKERS[index % OPTION_MARKERS.len()]
}

/// Option index for `marker`, if it is one of the four markers
#[must_use]
pub fn index_of_marker(marker: char) -> Option<usize> {
    OPTION_MARKERS.iter().position(|m| *m == marker)
}
