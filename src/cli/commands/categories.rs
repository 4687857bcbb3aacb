//! `talequiz categories`

use anyhow::Result;

use super::json_emit::{CategoryJsonEntry, emit_categories_json};
use crate::Config;

/// List the category catalog, built-ins merged with file-defined entries
pub fn execute_categories_command(json: bool, config: &Config) -> Result<()> {
    if json {
        let entries: Vec<CategoryJsonEntry> = config
            .categories
            .iter()
            .map(|(key, category)| CategoryJsonEntry {
                key: key.clone(),
                name: category.name.clone(),
                description: category.description.clone(),
                themes: category.themes.clone(),
            })
            .collect();
        println!("{}", emit_categories_json(&entries)?);
        return Ok(());
    }

    for (key, category) in &config.categories {
        println!("{key:<12} {}", category.name);
        if !category.description.is_empty() {
            println!("{:<12} {}", "", category.description);
        }
        println!("{:<12} themes: {}", "", category.themes.join(", "));
    }
    Ok(())
}
