use std::path::PathBuf;

/// Configuration overrides supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub config_path: Option<PathBuf>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub rounds: Option<usize>,
    pub pacing_ms: Option<u64>,
    pub seed: Option<u64>,
    pub corpus_path: Option<PathBuf>,
}
