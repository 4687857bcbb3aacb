//! Corpus-only generation used when the model is unavailable or misbehaves

use rand::Rng;
use rand::rngs::StdRng;
use rand::seq::{IndexedRandom, SliceRandom};
use tracing::debug;

use crate::records::{OPTION_COUNT, QuestionRecord, QuestionSetItem, Source, StoryRecord};
use crate::service::QuizService;

/// Morals mixed into the distractor pool when the corpus is too small
pub const GENERIC_MORALS: [&str; 10] = [
    "ความโลภนำมาซึ่งความพินาศ",
    "ความซื่อสัตย์เป็นสิ่งสำคัญที่สุด",
    "ความพยายามนำไปสู่ความสำเร็จเสมอ",
    "การให้อภัยเป็นคุณธรรมที่สูงส่ง",
    "ความอดทนเป็นกุญแจสู่ความสำเร็จ",
    "มิตรภาพที่แท้จริงมีค่ามากกว่าทองคำ",
    "ความกตัญญูเป็นเครื่องหมายของคนดี",
    "การช่วยเหลือผู้อื่นคือการช่วยเหลือตนเอง",
    "ความถ่อมตนนำมาซึ่งความยิ่งใหญ่",
    "การเรียนรู้จากความผิดพลาดทำให้เราเติบโต",
];

/// Question texts for corpus-built questions
pub const QUESTION_TEMPLATES: [&str; 5] = [
    "ข้อคิดจากนิทานนี้คืออะไร?",
    "นิทานนี้สอนให้เรารู้ว่าอะไร?",
    "บทเรียนสำคัญจากเรื่องนี้คืออะไร?",
    "เราได้เรียนรู้อะไรจากนิทานนี้?",
    "สิ่งที่นิทานต้องการสื่อคืออะไร?",
];

/// Pick `count` wrong morals for `correct_moral`.
///
/// Corpus morals come first (deduplicated, shuffled); the generic pool tops the
/// list up when the corpus runs short. The result never contains
/// `correct_moral` and has no repeats.
pub fn sample_distractors(
    correct_moral: &str,
    corpus: &[StoryRecord],
    count: usize,
    rng: &mut StdRng,
) -> Vec<String> {
    let mut from_corpus: Vec<&str> = Vec::new();
    for story in corpus {
        let moral = story.moral.as_str();
        if moral != correct_moral && !from_corpus.contains(&moral) {
            from_corpus.push(moral);
        }
    }
    from_corpus.shuffle(rng);

    let mut generic: Vec<&str> = GENERIC_MORALS
        .iter()
        .copied()
        .filter(|m| *m != correct_moral && !from_corpus.contains(m))
        .collect();
    generic.shuffle(rng);

    from_corpus
        .into_iter()
        .chain(generic)
        .take(count)
        .map(str::to_string)
        .collect()
}

/// Shuffle `correct` in among `distractors`, returning the options and the
/// index where `correct` landed.
pub fn assemble_options(
    correct: &str,
    distractors: &[String],
    rng: &mut StdRng,
) -> ([String; OPTION_COUNT], usize) {
    let mut options: [String; OPTION_COUNT] = Default::default();
    options[0] = correct.to_string();
    for (slot, distractor) in options.iter_mut().skip(1).zip(distractors) {
        slot.clone_from(distractor);
    }
    options.shuffle(rng);
    let correct_index = options.iter().position(|o| o == correct).unwrap_or(0);
    (options, correct_index)
}

/// Build a corpus question whose correct answer is `story.moral`
pub fn fallback_question_for(
    story: &StoryRecord,
    corpus: &[StoryRecord],
    rng: &mut StdRng,
) -> QuestionRecord {
    let distractors = sample_distractors(&story.moral, corpus, OPTION_COUNT - 1, rng);
    let (options, correct_index) = assemble_options(&story.moral, &distractors, rng);
    let template = QUESTION_TEMPLATES
        .choose(rng)
        .copied()
        .unwrap_or(QUESTION_TEMPLATES[0]);

    QuestionRecord::new(template, options, correct_index, story.moral.clone())
        .unwrap_or_else(|_| QuestionRecord::default_question())
}

impl QuizService {
    /// Uniformly sample one corpus story
    pub fn random_story(&mut self) -> StoryRecord {
        let stories = self.corpus.load();
        stories[self.rng.random_range(0..stories.len())].clone()
    }

    /// A corpus question about a randomly chosen story
    pub fn build_fallback_question(&mut self, category: &str) -> QuestionRecord {
        let story = self.random_story();
        debug!(category = %category, "Building fallback question");
        let corpus = self.corpus.load();
        fallback_question_for(&story, &corpus, &mut self.rng)
    }

    /// `n` items cycling through the corpus in order.
    ///
    /// Each item's question is built for that item's own story, so the
    /// correct option always matches the moral shown with it.
    pub fn build_fallback_set(&mut self, category: &str, n: usize) -> Vec<QuestionSetItem> {
        let corpus = self.corpus.load();
        (0..n)
            .map(|i| {
                let story = &corpus[i % corpus.len()];
                let question = fallback_question_for(story, &corpus, &mut self.rng);
                QuestionSetItem::new(
                    format!("{category} {}", i + 1),
                    story.tale.clone(),
                    question,
                    Source::Fallback,
                    Source::Fallback,
                )
            })
            .collect()
    }
}
