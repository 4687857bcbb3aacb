//! Exit code constants and error mapping for talequiz.
//!
//! # Exit Code Table
//!
//! | Code | Constant | Description |
//! |------|----------|-------------|
//! | 0 | `SUCCESS` | Operation completed successfully |
//! | 1 | `INTERNAL` | General/internal failure |
//! | 2 | `CLI_ARGS` | Invalid CLI arguments |
//! | 3 | `CONFIG` | Configuration file or value rejected |
//! | 4 | `UNKNOWN_CATEGORY` | Requested story category does not exist |
//! | 69 | `OFFLINE` | `probe --require-online` found the endpoint unavailable |

use crate::error::{ConfigError, TaleQuizError};

/// Exit codes matching the documented exit code table.
///
/// ```rust
/// use talequiz_utils::exit_codes::ExitCode;
///
/// assert_eq!(ExitCode::SUCCESS.as_i32(), 0);
/// assert_eq!(ExitCode::OFFLINE, ExitCode::from_i32(69));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(i32);

impl ExitCode {
    /// Success - operation completed successfully
    pub const SUCCESS: ExitCode = ExitCode(0);

    /// Internal error - general failure
    pub const INTERNAL: ExitCode = ExitCode(1);

    /// CLI arguments error - invalid or missing command-line arguments
    pub const CLI_ARGS: ExitCode = ExitCode(2);

    /// Configuration error - config file unreadable or value out of range
    pub const CONFIG: ExitCode = ExitCode(3);

    /// Unknown category requested
    pub const UNKNOWN_CATEGORY: ExitCode = ExitCode(4);

    /// Completion endpoint unavailable and the caller required it (EX_UNAVAILABLE)
    pub const OFFLINE: ExitCode = ExitCode(69);

    /// Get the numeric exit code value.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self.0
    }

    /// Create an exit code from a numeric value.
    #[must_use]
    pub const fn from_i32(code: i32) -> Self {
        ExitCode(code)
    }
}

impl TaleQuizError {
    /// Map this error to the CLI exit code it should produce
    #[must_use]
    pub fn to_exit_code(&self) -> ExitCode {
        match self {
            TaleQuizError::Config(ConfigError::UnknownCategory { .. }) => {
                ExitCode::UNKNOWN_CATEGORY
            }
            TaleQuizError::Config(_) => ExitCode::CONFIG,
            TaleQuizError::Connectivity(_) => ExitCode::OFFLINE,
            TaleQuizError::Format(_) | TaleQuizError::Resource(_) | TaleQuizError::Io(_) => {
                ExitCode::INTERNAL
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConnectivityError, ResourceError};

    #[test]
    fn test_exit_code_constants() {
        assert_eq!(ExitCode::SUCCESS.as_i32(), 0);
        assert_eq!(ExitCode::INTERNAL.as_i32(), 1);
        assert_eq!(ExitCode::CLI_ARGS.as_i32(), 2);
        assert_eq!(ExitCode::CONFIG.as_i32(), 3);
        assert_eq!(ExitCode::UNKNOWN_CATEGORY.as_i32(), 4);
        assert_eq!(ExitCode::OFFLINE.as_i32(), 69);
    }

    #[test]
    fn test_error_mapping() {
        let unknown = TaleQuizError::Config(ConfigError::UnknownCategory {
            key: "x".into(),
            known: String::new(),
        });
        assert_eq!(unknown.to_exit_code(), ExitCode::UNKNOWN_CATEGORY);

        let invalid = TaleQuizError::Config(ConfigError::InvalidValue {
            key: "rounds".into(),
            value: "0".into(),
        });
        assert_eq!(invalid.to_exit_code(), ExitCode::CONFIG);

        let offline = TaleQuizError::Connectivity(ConnectivityError::Transport("x".into()));
        assert_eq!(offline.to_exit_code(), ExitCode::OFFLINE);

        let resource = TaleQuizError::Resource(ResourceError::Empty);
        assert_eq!(resource.to_exit_code(), ExitCode::INTERNAL);
    }
}
