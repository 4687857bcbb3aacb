use std::collections::BTreeMap;

use crate::model::CategoryConfig;

/// Categories available without any configuration file.
///
/// File-defined `[categories.<key>]` sections replace entries with the same key
/// and add new ones.
#[must_use]
pub fn builtin_categories() -> BTreeMap<String, CategoryConfig> {
    let mut categories = BTreeMap::new();
    categories.insert(
        "animals".to_string(),
        CategoryConfig::new(
            "นิทานสัตว์",
            "นิทานเกี่ยวกับสัตว์แสนรู้",
            &[
                "ความขยันหมั่นเพียร",
                "ความซื่อสัตย์",
                "การช่วยเหลือผู้อื่น",
                "ความไม่ประมาท",
            ],
        ),
    );
    categories.insert(
        "friendship".to_string(),
        CategoryConfig::new(
            "นิทานมิตรภาพ",
            "นิทานเกี่ยวกับเพื่อนแท้และการแบ่งปัน",
            &["เพื่อนแท้", "การให้อภัย", "การแบ่งปัน"],
        ),
    );
    categories.insert(
        "honesty".to_string(),
        CategoryConfig::new(
            "นิทานความซื่อสัตย์",
            "นิทานสอนเรื่องการพูดความจริง",
            &["การพูดความจริง", "ความรับผิดชอบ", "ผลของการโกหก"],
        ),
    );
    categories.insert(
        "perseverance".to_string(),
        CategoryConfig::new(
            "นิทานความพยายาม",
            "นิทานเกี่ยวกับความอดทนและไม่ยอมแพ้",
            &["ความอดทน", "ไม่ยอมแพ้", "การเรียนรู้จากความผิดพลาด"],
        ),
    );
    categories.insert(
        "gratitude".to_string(),
        CategoryConfig::new(
            "นิทานความกตัญญู",
            "นิทานสอนเรื่องการตอบแทนบุญคุณ",
            &["กตัญญูต่อพ่อแม่", "การตอบแทนบุญคุณ", "ความถ่อมตน"],
        ),
    );
    categories
}
