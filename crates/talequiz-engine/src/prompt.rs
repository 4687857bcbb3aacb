//! Few-shot prompt construction

use rand::rngs::StdRng;

use talequiz_llm::ChatParams;

use crate::fallback::{assemble_options, sample_distractors};
use crate::labels::{
    ANSWER_LABEL, MORAL_LABEL, OPTION_MARKERS, QUESTION_LABEL, TALE_LABEL, marker_for,
};
use crate::records::{OPTION_COUNT, StoryRecord};

/// Greeting sent by the connectivity probe
pub const PROBE_PROMPT: &str = "Hi";

pub const STORY_SYSTEM_PROMPT: &str = "You are a Thai storyteller for children. You must write stories in Thai language only. Follow the exact format requested.";

pub const QUESTION_SYSTEM_PROMPT: &str = "You are a Thai language teacher creating questions about fables or stories. Reply in Thai only. Format your response exactly as requested.";

/// Probe: a handful of tokens, near-deterministic
pub const PROBE_PARAMS: ChatParams = ChatParams {
    max_tokens: 5,
    temperature: 0.1,
    top_p: None,
};

/// Story: room for 5-8 sentences, high randomness for variety
pub const STORY_PARAMS: ChatParams = ChatParams {
    max_tokens: 500,
    temperature: 0.8,
    top_p: Some(0.9),
};

/// Question: low randomness for format fidelity
pub const QUESTION_PARAMS: ChatParams = ChatParams {
    max_tokens: 400,
    temperature: 0.3,
    top_p: Some(0.7),
};

/// Worked examples shown in a question prompt
const MAX_QUESTION_EXAMPLES: usize = 2;

/// Question texts rotated through the worked examples
const EXAMPLE_QUESTION_TYPES: [&str; 3] = [
    "ข้อคิดจากนิทานนี้คืออะไร?",
    "นิทานนี้สอนให้เรารู้ว่าอะไร?",
    "บทเรียนสำคัญจากเรื่องนี้คืออะไร?",
];

/// Render the story-generation prompt.
///
/// Each example becomes a numbered tale/moral pair, followed by the request
/// for one new story about `theme` in the same two-line format.
#[must_use]
pub fn build_story_prompt(examples: &[StoryRecord], category: &str, theme: &str) -> String {
    let mut prompt = String::from("นี่คือตัวอย่างนิทานและข้อคิดที่ดี:\n\n");

    for (i, example) in examples.iter().enumerate() {
        prompt.push_str(&format!("ตัวอย่างที่ {}:\n", i + 1));
        prompt.push_str(&format!("{TALE_LABEL} {}\n", example.tale));
        prompt.push_str(&format!("{MORAL_LABEL} {}\n\n", example.moral));
    }

    prompt.push_str(&format!(
        "ตอนนี้ กรุณาเขียนนิทานใหม่ประเภท \"{category}\" ในหัวข้อ \"{theme}\" ในรูปแบบเดียวกัน\n"
    ));
    prompt.push_str("ให้ตอบในรูปแบบนี้เท่านั้น:\n");
    prompt.push_str(&format!(
        "{TALE_LABEL} [เขียนนิทานสั้นๆ ประมาณ 5-8 ประโยค ที่มีต้น กลาง จบ]\n"
    ));
    prompt.push_str(&format!("{MORAL_LABEL} [เขียนข้อคิดที่ได้จากนิทาน 1 ประโยค]\n"));
    prompt
}

/// Render the question-generation prompt for `story`.
///
/// Up to two examples are shown as complete worked questions. Their wrong
/// options are drawn from the other examples' morals via
/// [`sample_distractors`], so `rng` fixes both distractor choice and order.
#[must_use]
pub fn build_question_prompt(story: &str, examples: &[StoryRecord], rng: &mut StdRng) -> String {
    let mut prompt = String::from("ตัวอย่างการสร้างคำถามจากนิทาน:\n\n");

    for (i, example) in examples.iter().take(MAX_QUESTION_EXAMPLES).enumerate() {
        prompt.push_str(&format!("ตัวอย่างที่ {}:\n", i + 1));
        prompt.push_str(&format!("{TALE_LABEL} \"{}\"\n", example.tale));
        prompt.push_str(&format!(
            "{QUESTION_LABEL} {}\n",
            EXAMPLE_QUESTION_TYPES[i % EXAMPLE_QUESTION_TYPES.len()]
        ));

        let distractors = sample_distractors(&example.moral, examples, OPTION_COUNT - 1, rng);
        let (options, correct_index) = assemble_options(&example.moral, &distractors, rng);
        for (idx, option) in options.iter().enumerate() {
            prompt.push_str(&format!("{}. {option}\n", marker_for(idx)));
        }
        prompt.push_str(&format!("{ANSWER_LABEL} {}\n", marker_for(correct_index)));
        prompt.push_str(&format!("{MORAL_LABEL} {}\n\n", example.moral));
    }

    prompt.push_str(&format!("ตอนนี้ จากนิทานนี้: \"{story}\"\n\n"));
    prompt.push_str("กรุณาสร้างคำถามข้อคิด 1 ข้อ พร้อมตัวเลือก 4 ข้อ ในรูปแบบเดียวกัน:\n");
    prompt.push_str(&format!(
        "{QUESTION_LABEL} [คำถามเกี่ยวกับข้อคิดหรือบทเรียนจากนิทาน]\n"
    ));
    for (idx, marker) in OPTION_MARKERS.iter().enumerate() {
        prompt.push_str(&format!("{marker}. [ตัวเลือก {}]\n", idx + 1));
    }
    let markers: Vec<String> = OPTION_MARKERS.iter().map(char::to_string).collect();
    prompt.push_str(&format!("{ANSWER_LABEL} [{}]\n", markers.join("/")));
    prompt.push_str(&format!("{MORAL_LABEL} [ข้อคิดที่ถูกต้อง]\n"));
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_question;
    use rand::SeedableRng;

    fn examples() -> Vec<StoryRecord> {
        vec![
            StoryRecord::new("กระต่ายกับเต่า", "ความพยายามชนะทุกสิ่ง"),
            StoryRecord::new("เด็กเลี้ยงแกะ", "อย่าโกหก"),
            StoryRecord::new("มดกับตั๊กแตน", "จงขยัน"),
        ]
    }

    #[test]
    fn test_story_prompt_lists_examples_and_request() {
        let prompt = build_story_prompt(&examples(), "นิทานสัตว์", "ความขยัน");

        assert!(prompt.starts_with("นี่คือตัวอย่างนิทานและข้อคิดที่ดี:"));
        assert!(prompt.contains("ตัวอย่างที่ 1:\nนิทาน: กระต่ายกับเต่า\nข้อคิด: ความพยายามชนะทุกสิ่ง\n"));
        assert!(prompt.contains("ตัวอย่างที่ 3:"));
        assert!(prompt.contains("ประเภท \"นิทานสัตว์\" ในหัวข้อ \"ความขยัน\""));
        assert!(prompt.contains("ให้ตอบในรูปแบบนี้เท่านั้น"));
    }

    #[test]
    fn test_story_prompt_is_pure() {
        let a = build_story_prompt(&examples(), "c", "t");
        let b = build_story_prompt(&examples(), "c", "t");
        assert_eq!(a, b);
    }

    #[test]
    fn test_question_prompt_shows_two_worked_examples() {
        let mut rng = StdRng::seed_from_u64(42);
        let prompt = build_question_prompt("เรื่องใหม่", &examples(), &mut rng);

        assert!(prompt.contains("ตัวอย่างที่ 1:"));
        assert!(prompt.contains("ตัวอย่างที่ 2:"));
        assert!(!prompt.contains("ตัวอย่างที่ 3:"));
        assert!(prompt.contains("คำถาม: ข้อคิดจากนิทานนี้คืออะไร?"));
        assert!(prompt.contains("คำถาม: นิทานนี้สอนให้เรารู้ว่าอะไร?"));
        assert!(prompt.contains("ตอนนี้ จากนิทานนี้: \"เรื่องใหม่\""));
        assert!(prompt.contains("ตอบ: [ก/ข/ค/ง]"));
    }

    #[test]
    fn test_question_prompt_examples_are_parseable() {
        let mut rng = StdRng::seed_from_u64(3);
        let prompt = build_question_prompt("x", &examples(), &mut rng);

        // Each worked example is itself a valid reply for the parser
        let first = prompt
            .split("ตัวอย่างที่ 1:\n")
            .nth(1)
            .and_then(|rest| rest.split("\n\n").next())
            .unwrap();
        let parsed = parse_question(first).unwrap();
        assert_eq!(parsed.correct_option(), "ความพยายามชนะทุกสิ่ง");
        assert_eq!(parsed.moral(), "ความพยายามชนะทุกสิ่ง");
    }

    #[test]
    fn test_question_prompt_is_seed_deterministic() {
        let a = build_question_prompt("x", &examples(), &mut StdRng::seed_from_u64(5));
        let b = build_question_prompt("x", &examples(), &mut StdRng::seed_from_u64(5));
        assert_eq!(a, b);
    }
}
