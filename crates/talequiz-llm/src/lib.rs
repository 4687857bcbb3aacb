//! Chat-completion transport for talequiz
//!
//! All endpoints implement the `ChatBackend` trait so the engine can be driven
//! by the HTTP backend in production and by scripted backends in tests.

mod http_client;
mod openai_backend;
mod types;
mod unavailable_backend;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_server;

pub use openai_backend::OpenAiCompatBackend;
pub use talequiz_utils::error::ConnectivityError;
pub use types::{ChatBackend, ChatParams, Message, Role};
pub use unavailable_backend::UnavailableBackend;

use std::sync::Arc;
use talequiz_config::Config;

/// Construct the production backend from configuration.
///
/// # Errors
///
/// Returns `ConnectivityError::Misconfiguration` if the backend cannot be built.
pub fn from_config(config: &Config) -> Result<Arc<dyn ChatBackend>, ConnectivityError> {
    let backend = OpenAiCompatBackend::new_from_config(config)?;
    Ok(Arc::new(backend))
}
