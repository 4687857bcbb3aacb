//! `talequiz probe`

use anyhow::Result;

use super::json_emit::{ProbeJsonOutput, emit_probe_json};
use crate::{Config, QuizService, TaleQuizError};
use talequiz_utils::error::ConnectivityError;

/// Run the connectivity probe and report the resulting state.
///
/// With `require_online`, an unavailable endpoint is returned as a
/// connectivity error so the process exits with `ExitCode::OFFLINE`.
pub async fn execute_probe_command(require_online: bool, json: bool, config: &Config) -> Result<()> {
    let endpoint = config.completions_url();
    let backend = talequiz_llm::from_config(config).map_err(TaleQuizError::from)?;
    let mut service = QuizService::from_config(config, backend);

    let online = service.probe().await;

    if json {
        let output = ProbeJsonOutput {
            endpoint: endpoint.clone(),
            model: config.llm.model.clone(),
            state: service.state(),
        };
        println!("{}", emit_probe_json(&output)?);
    } else if online {
        println!("✓ {endpoint} is answering (model: {})", config.llm.model);
    } else {
        println!("✗ {endpoint} is unavailable; questions will come from the story corpus");
    }

    if require_online && !online {
        return Err(TaleQuizError::Connectivity(ConnectivityError::Transport(format!(
            "no reply from {endpoint}"
        )))
        .into());
    }
    Ok(())
}
