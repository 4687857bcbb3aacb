//! Stand-in backend for a completion client that could not be built

use async_trait::async_trait;

use crate::types::{ChatBackend, ChatParams, Message};
use talequiz_utils::error::ConnectivityError;

/// Answers every request with the error that prevented the real client from
/// being constructed. A service driven by it only ever produces corpus content.
#[derive(Debug, Clone)]
pub struct UnavailableBackend {
    reason: ConnectivityError,
}

impl UnavailableBackend {
    pub fn new(reason: ConnectivityError) -> Self {
        Self { reason }
    }

    pub fn reason(&self) -> &ConnectivityError {
        &self.reason
    }
}

#[async_trait]
impl ChatBackend for UnavailableBackend {
    async fn complete(
        &self,
        _messages: Vec<Message>,
        _params: ChatParams,
    ) -> Result<String, ConnectivityError> {
        Err(self.reason.clone())
    }

    fn name(&self) -> &'static str {
        "unavailable"
    }
}
