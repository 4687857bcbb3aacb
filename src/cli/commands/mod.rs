//! CLI command implementations (facade).
//!
//! This module re-exports the command surface used by `run.rs`.
//! Implementations live in `commands/*`.

mod categories;
mod config;
mod corpus;
mod generate;
mod json_emit;
mod probe;

pub use categories::execute_categories_command;
pub use config::execute_config_command;
pub use corpus::execute_corpus_command;
pub use generate::execute_generate_command;
pub use probe::execute_probe_command;
