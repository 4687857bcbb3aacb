//! Reference story corpus with an in-memory cache

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

use talequiz_utils::error::ResourceError;
use talequiz_utils::logging::log_fallback;

use crate::records::StoryRecord;

/// Corpus compiled into the binary
const BUNDLED_CORPUS: &str = include_str!("../data/stories.json");

/// Where the corpus is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorpusSource {
    /// `data/stories.json` shipped with the crate
    Bundled,
    /// A JSON file on disk
    File(PathBuf),
    /// JSON text held in memory
    Inline(String),
}

/// The two stories used when the corpus resource cannot be loaded
#[must_use]
pub fn builtin_stories() -> Vec<StoryRecord> {
    vec![
        StoryRecord::new(
            "กระต่ายกับเต่าแข่งวิ่งกัน กระต่ายวิ่งเร็วแต่ประมาท นอนหลับระหว่างทาง เต่าเดินช้าแต่ไม่หยุดพัก สุดท้ายเต่าชนะการแข่งขัน",
            "ความพยายามและความอดทนย่อมเอาชนะความสามารถที่ขาดความมุ่งมั่น",
        ),
        StoryRecord::new(
            "เด็กชายเลี้ยงแกะ ชอบหลอกชาวบ้านว่ามีหมาป่ามา พอหมาป่ามาจริงๆ ไม่มีใครเชื่อ แกะถูกหมาป่ากิน",
            "คนที่ชอบโกหกจะไม่มีใครเชื่อแม้จะพูดความจริง",
        ),
    ]
}

/// Lazily loaded, memoized corpus.
///
/// The resource is read at most once until [`CorpusLoader::clear_cache`] is
/// called. A missing, unreadable, malformed or empty resource is replaced by
/// [`builtin_stories`], so `load` always yields at least one record.
#[derive(Debug)]
pub struct CorpusLoader {
    source: CorpusSource,
    cache: Option<Arc<[StoryRecord]>>,
    used_builtin: bool,
}

#[derive(Deserialize)]
struct RawStory {
    #[serde(default)]
    tale: String,
    #[serde(default)]
    moral: String,
}

impl CorpusLoader {
    #[must_use]
    pub fn new(source: CorpusSource) -> Self {
        Self {
            source,
            cache: None,
            used_builtin: false,
        }
    }

    /// Loader for the bundled corpus, or `path` when one is configured
    #[must_use]
    pub fn from_path(path: Option<PathBuf>) -> Self {
        Self::new(path.map_or(CorpusSource::Bundled, CorpusSource::File))
    }

    /// Return the corpus, reading the resource on first use
    pub fn load(&mut self) -> Arc<[StoryRecord]> {
        if let Some(cached) = &self.cache {
            return Arc::clone(cached);
        }

        let records: Arc<[StoryRecord]> = match self.read_source() {
            Ok(records) => {
                info!(stories = records.len(), "Corpus loaded");
                self.used_builtin = false;
                records.into()
            }
            Err(e) => {
                log_fallback("corpus", None, &e);
                self.used_builtin = true;
                builtin_stories().into()
            }
        };

        self.cache = Some(Arc::clone(&records));
        records
    }

    /// Drop the cached corpus so the next `load` re-reads the resource
    pub fn clear_cache(&mut self) {
        debug!("Corpus cache cleared");
        self.cache = None;
        self.used_builtin = false;
    }

    /// Whether the last load fell back to the built-in stories
    #[must_use]
    pub fn used_builtin(&self) -> bool {
        self.used_builtin
    }

    #[must_use]
    pub fn source(&self) -> &CorpusSource {
        &self.source
    }

    /// Up to `count` distinct corpus records in random order
    pub fn sample_examples(&mut self, count: usize, rng: &mut StdRng) -> Vec<StoryRecord> {
        let mut stories = self.load().to_vec();
        stories.shuffle(rng);
        stories.truncate(count);
        stories
    }

    /// Record at `index`, wrapping around the corpus length
    pub fn story_by_index(&mut self, index: usize) -> StoryRecord {
        let stories = self.load();
        stories[index % stories.len()].clone()
    }

    fn read_source(&self) -> Result<Vec<StoryRecord>, ResourceError> {
        match &self.source {
            CorpusSource::Bundled => parse_corpus(BUNDLED_CORPUS),
            CorpusSource::Inline(text) => parse_corpus(text),
            CorpusSource::File(path) => {
                let text = std::fs::read_to_string(path).map_err(|e| {
                    if e.kind() == std::io::ErrorKind::NotFound {
                        ResourceError::Missing(path.clone())
                    } else {
                        ResourceError::Unreadable {
                            path: path.clone(),
                            reason: e.to_string(),
                        }
                    }
                })?;
                parse_corpus(&text)
            }
        }
    }
}

impl Default for CorpusLoader {
    fn default() -> Self {
        Self::new(CorpusSource::Bundled)
    }
}

/// Parse a JSON array of `{ tale, moral }` objects.
///
/// Entries with a blank tale or moral are skipped.
///
/// # Errors
///
/// `Malformed` when the text is not such an array, `Empty` when no usable
/// entry remains.
pub fn parse_corpus(text: &str) -> Result<Vec<StoryRecord>, ResourceError> {
    let raw: Vec<RawStory> =
        serde_json::from_str(text).map_err(|e| ResourceError::Malformed(e.to_string()))?;

    let records: Vec<StoryRecord> = raw
        .into_iter()
        .map(|r| StoryRecord::new(r.tale.trim(), r.moral.trim()))
        .filter(StoryRecord::is_complete)
        .collect();

    if records.is_empty() {
        return Err(ResourceError::Empty);
    }
    Ok(records)
}
