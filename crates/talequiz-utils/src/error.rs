use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Library-level error type with rich context and user-friendly reporting.
///
/// `TaleQuizError` is returned by the configuration, probe and CLI layers.
/// Question-set generation itself never surfaces an error: every failure
/// below the orchestrator is converted into fallback content.
///
/// # Error Categories
///
/// | Category | Description |
/// |----------|-------------|
/// | `Config` | Configuration file or CLI argument errors |
/// | `Connectivity` | Completion endpoint unreachable or misbehaving |
/// | `Format` | Model reply did not match the labelled-line structure |
/// | `Resource` | Corpus resource missing or invalid |
///
/// # Example
///
/// ```rust
/// use talequiz_utils::error::{TaleQuizError, UserFriendlyError};
///
/// fn report(err: &TaleQuizError) {
///     eprintln!("{}", err.display_for_user());
/// }
/// ```
#[derive(Error, Debug)]
pub enum TaleQuizError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Connectivity error: {0}")]
    Connectivity(#[from] ConnectivityError),

    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    #[error("Corpus resource error: {0}")]
    Resource(#[from] ResourceError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for providing user-friendly error reporting with context and suggestions
pub trait UserFriendlyError {
    /// Get a user-friendly error message
    fn user_message(&self) -> String;

    /// Get contextual information about the error
    fn context(&self) -> Option<String>;

    /// Get suggested actions to resolve the error
    fn suggestions(&self) -> Vec<String>;

    /// Get the error category for grouping similar errors
    fn category(&self) -> ErrorCategory;

    /// Render message, context and suggestions as a multi-line report
    fn display_for_user(&self) -> String {
        let mut out = format!("✗ {}", self.user_message());
        if let Some(context) = self.context() {
            out.push_str(&format!("\n  {context}"));
        }
        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            out.push_str("\n\nSuggestions:");
            for suggestion in suggestions {
                out.push_str(&format!("\n  • {suggestion}"));
            }
        }
        out
    }
}

/// Categories of errors for better organization and handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Connectivity,
    ModelOutput,
    Resource,
    FileSystem,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration => write!(f, "Configuration"),
            Self::Connectivity => write!(f, "Connectivity"),
            Self::ModelOutput => write!(f, "Model Output"),
            Self::Resource => write!(f, "Resource"),
            Self::FileSystem => write!(f, "File System"),
        }
    }
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration file: {0}")]
    InvalidFile(String),

    #[error("Invalid configuration value for '{key}': {value}")]
    InvalidValue { key: String, value: String },

    #[error("Unknown category '{key}' (known: {known})")]
    UnknownCategory { key: String, known: String },
}

impl UserFriendlyError for ConfigError {
    fn user_message(&self) -> String {
        match self {
            Self::InvalidFile(msg) => format!("Configuration file could not be used: {msg}"),
            Self::InvalidValue { key, value } => {
                format!("Configuration value '{key}' is invalid: {value}")
            }
            Self::UnknownCategory { key, .. } => format!("There is no story category '{key}'"),
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::InvalidFile(_) => Some(
                "Configuration is read from .talequiz/config.toml or the --config path."
                    .to_string(),
            ),
            Self::InvalidValue { .. } => None,
            Self::UnknownCategory { known, .. } => Some(format!("Known categories: {known}")),
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidFile(_) => vec![
                "Check the TOML syntax of the configuration file".to_string(),
                "Run 'talequiz config' to see the effective configuration".to_string(),
            ],
            Self::InvalidValue { key, .. } => {
                vec![format!("Fix or remove '{key}' to fall back to the default")]
            }
            Self::UnknownCategory { .. } => vec![
                "Run 'talequiz categories' to list available categories".to_string(),
                "Add a [categories.<key>] section to the configuration file".to_string(),
            ],
        }
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Configuration
    }
}

/// Failures talking to the chat-completion endpoint.
///
/// Raised by the probe and by every generation request. The probe swallows
/// them into `ServiceState`; generation callers turn them into fallback content.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConnectivityError {
    /// Network-level failure (DNS, refused connection, reset)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Endpoint rejected credentials (401, 403)
    #[error("Provider authentication error: {0}")]
    ProviderAuth(String),

    /// Endpoint rate limited the request (429)
    #[error("Provider quota exceeded: {0}")]
    ProviderQuota(String),

    /// Endpoint kept failing with 5xx after retries
    #[error("Provider outage: {0}")]
    ProviderOutage(String),

    /// Any other non-success status
    #[error("Unexpected status {status}: {message}")]
    Status { status: u16, message: String },

    /// Request did not complete in time
    #[error("Timeout after {duration:?}")]
    Timeout { duration: Duration },

    /// Body was not a `{ choices: [{ message: { content } }] }` envelope
    #[error("Malformed response envelope: {0}")]
    MalformedEnvelope(String),

    /// Client could not be constructed from configuration
    #[error("Misconfiguration: {0}")]
    Misconfiguration(String),
}

impl UserFriendlyError for ConnectivityError {
    fn user_message(&self) -> String {
        match self {
            Self::Transport(msg) => format!("Could not reach the completion endpoint: {msg}"),
            Self::ProviderAuth(msg) => format!("Completion endpoint refused credentials: {msg}"),
            Self::ProviderQuota(msg) => format!("Completion endpoint rate limit hit: {msg}"),
            Self::ProviderOutage(msg) => format!("Completion endpoint is failing: {msg}"),
            Self::Status { status, message } => {
                format!("Completion endpoint answered {status}: {message}")
            }
            Self::Timeout { duration } => {
                format!("Completion request timed out after {duration:?}")
            }
            Self::MalformedEnvelope(msg) => {
                format!("Completion endpoint returned an unexpected body: {msg}")
            }
            Self::Misconfiguration(msg) => format!("Completion client misconfigured: {msg}"),
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::Misconfiguration(_) => {
                Some("Check the [llm] section of the configuration.".to_string())
            }
            _ => Some(
                "Quiz generation keeps working offline using the bundled story corpus."
                    .to_string(),
            ),
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Transport(_) | Self::Timeout { .. } => vec![
                "Make sure the local model server is running (e.g. LM Studio)".to_string(),
                "Verify [llm] base_url points at the server's /v1 root".to_string(),
            ],
            Self::ProviderAuth(_) => vec![
                "Check the environment variable named by [llm] api_key_env".to_string(),
            ],
            Self::ProviderQuota(_) | Self::ProviderOutage(_) => vec![
                "Wait a few minutes and try again".to_string(),
                "Increase [generation] pacing_ms to slow requests down".to_string(),
            ],
            Self::Status { .. } | Self::MalformedEnvelope(_) => vec![
                "Confirm the endpoint speaks the OpenAI chat-completions protocol".to_string(),
                "Check that [llm] model names a loaded model".to_string(),
            ],
            Self::Misconfiguration(_) => vec![
                "Run 'talequiz config' to inspect the effective settings".to_string(),
            ],
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Misconfiguration(_) | Self::ProviderAuth(_) => ErrorCategory::Configuration,
            _ => ErrorCategory::Connectivity,
        }
    }
}

/// Which part of a labelled reply was missing or invalid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatKind {
    MissingTale,
    MissingMoral,
    MissingQuestion,
    OptionCount(usize),
    DuplicateOption,
    InvalidAnswer,
}

impl fmt::Display for FormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingTale => write!(f, "missing tale line"),
            Self::MissingMoral => write!(f, "missing moral line"),
            Self::MissingQuestion => write!(f, "missing question line"),
            Self::OptionCount(n) => write!(f, "expected 4 option lines, found {n}"),
            Self::DuplicateOption => write!(f, "options are not distinct"),
            Self::InvalidAnswer => write!(f, "answer is not one of the option markers"),
        }
    }
}

/// A model reply that does not match the expected labelled-line structure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}")]
pub struct FormatError {
    pub kind: FormatKind,
}

impl FormatError {
    #[must_use]
    pub const fn new(kind: FormatKind) -> Self {
        Self { kind }
    }
}

impl UserFriendlyError for FormatError {
    fn user_message(&self) -> String {
        format!("Model reply could not be parsed: {}", self.kind)
    }

    fn context(&self) -> Option<String> {
        Some("Replies must use the labelled lines requested in the prompt.".to_string())
    }

    fn suggestions(&self) -> Vec<String> {
        vec!["Try a model that follows formatting instructions more closely".to_string()]
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::ModelOutput
    }
}

/// Corpus resource could not be used
#[derive(Error, Debug)]
pub enum ResourceError {
    #[error("Corpus resource not found: {0}")]
    Missing(PathBuf),

    #[error("Corpus resource unreadable at {path}: {reason}")]
    Unreadable { path: PathBuf, reason: String },

    #[error("Corpus resource is not a JSON array of tale/moral records: {0}")]
    Malformed(String),

    #[error("Corpus resource contains no usable records")]
    Empty,
}

impl UserFriendlyError for ResourceError {
    fn user_message(&self) -> String {
        format!("Story corpus could not be loaded: {self}")
    }

    fn context(&self) -> Option<String> {
        Some("A built-in two-story corpus is used instead.".to_string())
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Missing(_) | Self::Unreadable { .. } => {
                vec!["Check [corpus] path in the configuration".to_string()]
            }
            Self::Malformed(_) | Self::Empty => vec![
                "The file must be a non-empty JSON array of {\"tale\", \"moral\"} objects"
                    .to_string(),
            ],
        }
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Resource
    }
}

impl UserFriendlyError for TaleQuizError {
    fn user_message(&self) -> String {
        match self {
            Self::Config(err) => err.user_message(),
            Self::Connectivity(err) => err.user_message(),
            Self::Format(err) => err.user_message(),
            Self::Resource(err) => err.user_message(),
            Self::Io(err) => format!("File system operation failed: {err}"),
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::Config(err) => err.context(),
            Self::Connectivity(err) => err.context(),
            Self::Format(err) => err.context(),
            Self::Resource(err) => err.context(),
            Self::Io(_) => None,
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Config(err) => err.suggestions(),
            Self::Connectivity(err) => err.suggestions(),
            Self::Format(err) => err.suggestions(),
            Self::Resource(err) => err.suggestions(),
            Self::Io(_) => vec!["Check file permissions and paths".to_string()],
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Config(err) => err.category(),
            Self::Connectivity(err) => err.category(),
            Self::Format(err) => err.category(),
            Self::Resource(err) => err.category(),
            Self::Io(_) => ErrorCategory::FileSystem,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connectivity_categories() {
        assert_eq!(
            ConnectivityError::Transport("refused".into()).category(),
            ErrorCategory::Connectivity
        );
        assert_eq!(
            ConnectivityError::ProviderAuth("401".into()).category(),
            ErrorCategory::Configuration
        );
        assert_eq!(
            ConnectivityError::Misconfiguration("bad".into()).category(),
            ErrorCategory::Configuration
        );
    }

    #[test]
    fn test_format_error_message_names_kind() {
        let err = FormatError::new(FormatKind::OptionCount(3));
        assert_eq!(err.to_string(), "expected 4 option lines, found 3");
        assert!(err.user_message().contains("found 3"));
    }

    #[test]
    fn test_display_for_user_includes_suggestions() {
        let err = TaleQuizError::from(ConfigError::UnknownCategory {
            key: "dragons".to_string(),
            known: "animals, honesty".to_string(),
        });
        let report = err.display_for_user();
        assert!(report.starts_with("✗ There is no story category 'dragons'"));
        assert!(report.contains("Known categories: animals, honesty"));
        assert!(report.contains("talequiz categories"));
    }

    #[test]
    fn test_resource_error_context_mentions_builtin() {
        let err = ResourceError::Empty;
        assert!(err.context().unwrap().contains("built-in"));
        assert_eq!(err.category(), ErrorCategory::Resource);
    }

    #[test]
    fn test_io_error_category() {
        let err = TaleQuizError::from(std::io::Error::other("boom"));
        assert_eq!(err.category(), ErrorCategory::FileSystem);
    }
}
