//! Core types for the chat-completion abstraction

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use talequiz_utils::error::ConnectivityError;

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System-level instructions
    System,
    /// User input
    User,
    /// Assistant response
    Assistant,
}

/// A single message in a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    #[must_use]
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }
}

/// Decoding parameters for one request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChatParams {
    pub max_tokens: u32,
    pub temperature: f32,
    /// Omitted from the request body when `None`
    pub top_p: Option<f32>,
}

/// A chat-completion endpoint.
///
/// Implementations return the text of the first choice and report every
/// failure upward; they never substitute content of their own.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Send `messages` and return the reply text.
    ///
    /// # Errors
    ///
    /// Returns `ConnectivityError` on transport failure, non-success status,
    /// or a response envelope without `choices[0].message.content`.
    async fn complete(
        &self,
        messages: Vec<Message>,
        params: ChatParams,
    ) -> Result<String, ConnectivityError>;

    /// Short name used in log fields
    fn name(&self) -> &'static str;
}
