//! `talequiz config`

use anyhow::Result;
use std::collections::BTreeMap;

use super::json_emit::{ConfigJsonEntry, emit_config_json};
use crate::Config;

/// Print every effective setting with the layer it came from
pub fn execute_config_command(json: bool, config: &Config) -> Result<()> {
    let effective = config.effective_config();

    if json {
        let entries: BTreeMap<String, ConfigJsonEntry> = effective
            .into_iter()
            .map(|(key, (value, source))| (key, ConfigJsonEntry { value, source }))
            .collect();
        println!("{}", emit_config_json(&entries)?);
        return Ok(());
    }

    let width = effective.keys().map(String::len).max().unwrap_or(0);
    for (key, (value, source)) in &effective {
        println!("{key:<width$}  {value}  ({source})");
    }
    Ok(())
}
