//! Error types for the CodeBrain core library.
//!
//! Every failure the client can produce is a [`CodeBrainError`]. Views never let these
//! escape: they convert them into an inline message at the operation boundary and log
//! the underlying cause for diagnostics.
//!
//! # Error Codes Reference
//!
//! | Code Range | Category | Description |
//! |------------|----------|-------------|
//! | E2001-E2099 | Config | Environment, config file, and validation errors |
//! | E5001-E5099 | API | Request failures against the remote service |
//! | E9001-E9099 | General | Internal, IO, serialization, and validation errors |

use std::fmt;
use thiserror::Error;
use tracing::{error, warn};

use crate::operation::Operation;

/// The main error type for the CodeBrain core library.
#[derive(Debug, Error)]
pub enum CodeBrainError {
    // ========================================================================
    // Configuration Errors (E2001-E2099)
    // ========================================================================
    /// Configuration file parse error
    #[error("[E2001] Failed to parse configuration: {0}")]
    ConfigParseError(String),

    /// Invalid configuration value
    #[error("[E2002] Invalid configuration value for '{key}': {message}")]
    InvalidConfigValue { key: String, message: String },

    // ========================================================================
    // API Errors (E5001-E5099)
    // ========================================================================
    /// A request to the remote service did not succeed.
    ///
    /// Covers non-2xx statuses (`status` is set), transport failures and
    /// undecodable bodies (`status` is `None` for transport failures).
    #[error("[E5001] Request failed during {operation}: {message}")]
    RequestFailed {
        operation: Operation,
        status: Option<u16>,
        message: String,
    },

    // ========================================================================
    // General Errors (E9001-E9099)
    // ========================================================================
    #[error("[E9001] Internal error: {0}")]
    Internal(String),

    /// Local validation rejected the input before any request was made
    #[error("[E9004] {0}")]
    ValidationError(String),

    #[error("[E9005] IO error: {0}")]
    IoError(String),

    #[error("[E9006] Serialization error: {0}")]
    SerializationError(String),
}

/// Result type alias for CodeBrain operations.
pub type CodeBrainResult<T> = Result<T, CodeBrainError>;

impl CodeBrainError {
    pub fn request_failed(operation: Operation, message: impl Into<String>) -> Self {
        CodeBrainError::RequestFailed {
            operation,
            status: None,
            message: message.into(),
        }
    }

    pub fn status(operation: Operation, status: u16, message: impl Into<String>) -> Self {
        CodeBrainError::RequestFailed {
            operation,
            status: Some(status),
            message: message.into(),
        }
    }

    /// Convert a reqwest error raised while performing `operation`.
    pub fn from_reqwest(operation: Operation, err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            format!("request timed out: {}", err)
        } else if err.is_connect() {
            format!("could not connect: {}", err)
        } else if err.is_decode() {
            format!("invalid response body: {}", err)
        } else {
            err.to_string()
        };

        CodeBrainError::RequestFailed {
            operation,
            status: err.status().map(|s| s.as_u16()),
            message,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        CodeBrainError::ValidationError(message.into())
    }

    /// The API operation this error belongs to, if any.
    pub fn operation(&self) -> Option<Operation> {
        match self {
            CodeBrainError::RequestFailed { operation, .. } => Some(*operation),
            _ => None,
        }
    }

    /// HTTP status of a failed request, when the server answered at all.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            CodeBrainError::RequestFailed { status, .. } => *status,
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.http_status() == Some(404)
    }

    pub fn is_request_error(&self) -> bool {
        matches!(self, CodeBrainError::RequestFailed { .. })
    }

    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            CodeBrainError::ConfigParseError(_) | CodeBrainError::InvalidConfigValue { .. }
        )
    }

    pub fn is_validation_error(&self) -> bool {
        matches!(self, CodeBrainError::ValidationError(_))
    }

    /// Returns true if the server could not be reached or answered with a 5xx.
    pub fn is_transient(&self) -> bool {
        match self {
            CodeBrainError::RequestFailed { status: None, .. } => true,
            CodeBrainError::RequestFailed {
                status: Some(code), ..
            } => *code >= 500,
            _ => false,
        }
    }

    /// Returns an error code suitable for logging or external reporting.
    pub fn error_code(&self) -> &'static str {
        match self {
            CodeBrainError::ConfigParseError(_) => "E2001",
            CodeBrainError::InvalidConfigValue { .. } => "E2002",
            CodeBrainError::RequestFailed { .. } => "E5001",
            CodeBrainError::Internal(_) => "E9001",
            CodeBrainError::ValidationError(_) => "E9004",
            CodeBrainError::IoError(_) => "E9005",
            CodeBrainError::SerializationError(_) => "E9006",
        }
    }

    /// The short message a view shows for this error.
    ///
    /// Request failures collapse to the generic per-operation message; the detailed
    /// cause is only logged.
    pub fn user_message(&self) -> String {
        match self {
            CodeBrainError::RequestFailed { operation, .. } => {
                operation.failure_message().to_string()
            }
            CodeBrainError::ValidationError(msg) => msg.clone(),
            other => other.to_string(),
        }
    }

    /// Returns a user-friendly suggestion for how to resolve this error.
    pub fn user_suggestion(&self) -> Option<&'static str> {
        match self {
            CodeBrainError::RequestFailed { status: None, .. } => Some(
                "Check that the CodeBrain API is running and CODEBRAIN_API_URL points at it",
            ),
            CodeBrainError::RequestFailed {
                status: Some(404), ..
            } => Some("Check the identifier; the server does not know it"),
            CodeBrainError::ConfigParseError(_) | CodeBrainError::InvalidConfigValue { .. } => {
                Some("Run 'codebrain config show' to inspect the effective configuration")
            }
            _ => None,
        }
    }

    /// Log this error with appropriate severity level.
    pub fn log(&self) {
        let code = self.error_code();
        let operation = self.operation().map(|op| op.name());

        if self.is_transient() {
            warn!(
                error_code = %code,
                operation = operation,
                "Transient error occurred: {}",
                self
            );
        } else {
            error!(
                error_code = %code,
                operation = operation,
                "Error occurred: {}",
                self
            );
        }
    }
}

impl From<serde_json::Error> for CodeBrainError {
    fn from(err: serde_json::Error) -> Self {
        CodeBrainError::SerializationError(err.to_string())
    }
}

impl From<std::io::Error> for CodeBrainError {
    fn from(err: std::io::Error) -> Self {
        CodeBrainError::IoError(err.to_string())
    }
}

impl From<config::ConfigError> for CodeBrainError {
    fn from(err: config::ConfigError) -> Self {
        match err {
            config::ConfigError::NotFound(key) => CodeBrainError::InvalidConfigValue {
                key,
                message: "Key not found".to_string(),
            },
            config::ConfigError::FileParse { uri, cause } => CodeBrainError::ConfigParseError(
                format!("Failed to parse {}: {}", uri.unwrap_or_default(), cause),
            ),
            config::ConfigError::Type {
                origin,
                unexpected,
                expected,
                key,
            } => CodeBrainError::InvalidConfigValue {
                key: key.unwrap_or_else(|| origin.map(|o| o.to_string()).unwrap_or_default()),
                message: format!("Expected {}, got {}", expected, unexpected),
            },
            _ => CodeBrainError::ConfigParseError(err.to_string()),
        }
    }
}

impl From<crate::config::ConfigLoadError> for CodeBrainError {
    fn from(err: crate::config::ConfigLoadError) -> Self {
        match err {
            crate::config::ConfigLoadError::Config(e) => e.into(),
            crate::config::ConfigLoadError::InvalidValue { key, message } => {
                CodeBrainError::InvalidConfigValue { key, message }
            }
            crate::config::ConfigLoadError::Io(e) => e.into(),
            crate::config::ConfigLoadError::Serialize(e) => CodeBrainError::SerializationError(e),
        }
    }
}

// ============================================================================
// User-friendly error formatting for CLI
// ============================================================================

/// Format an error for CLI display with an optional suggestion.
pub struct CliErrorDisplay<'a> {
    error: &'a CodeBrainError,
    show_suggestion: bool,
}

impl<'a> CliErrorDisplay<'a> {
    pub fn new(error: &'a CodeBrainError) -> Self {
        Self {
            error,
            show_suggestion: true,
        }
    }

    pub fn without_suggestion(mut self) -> Self {
        self.show_suggestion = false;
        self
    }
}

impl<'a> fmt::Display for CliErrorDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.error.user_message())?;
        writeln!(f, "  Cause: {}", self.error)?;

        if self.show_suggestion {
            if let Some(suggestion) = self.error.user_suggestion() {
                writeln!(f)?;
                writeln!(f, "  Suggestion: {}", suggestion)?;
            }
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CodeBrainError::status(Operation::LoadTask, 500, "Internal Server Error");
        assert!(err.to_string().contains("E5001"));
        assert!(err.to_string().contains("get_task"));

        let err = CodeBrainError::InvalidConfigValue {
            key: "api.base_url".to_string(),
            message: "must not be empty".to_string(),
        };
        assert!(err.to_string().contains("E2002"));
        assert!(err.to_string().contains("api.base_url"));
    }

    #[test]
    fn test_user_message_hides_cause() {
        let err = CodeBrainError::status(Operation::ConfirmTask, 400, "not awaiting confirmation");
        assert_eq!(
            err.user_message(),
            "Failed to confirm task. Please try again."
        );

        let err = CodeBrainError::validation("Please fill in all fields");
        assert_eq!(err.user_message(), "Please fill in all fields");
    }

    #[test]
    fn test_not_found() {
        assert!(CodeBrainError::status(Operation::LoadTask, 404, "Task not found").is_not_found());
        assert!(!CodeBrainError::status(Operation::LoadTask, 500, "boom").is_not_found());
        assert!(!CodeBrainError::request_failed(Operation::LoadTask, "refused").is_not_found());
    }

    #[test]
    fn test_is_transient() {
        assert!(CodeBrainError::request_failed(Operation::LoadPlaybooks, "refused").is_transient());
        assert!(CodeBrainError::status(Operation::LoadPlaybooks, 503, "down").is_transient());
        assert!(!CodeBrainError::status(Operation::LoadPlaybooks, 400, "bad").is_transient());
        assert!(!CodeBrainError::validation("empty").is_transient());
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            CodeBrainError::ConfigParseError("x".to_string()).error_code(),
            "E2001"
        );
        assert_eq!(
            CodeBrainError::request_failed(Operation::CreateTask, "x").error_code(),
            "E5001"
        );
        assert_eq!(CodeBrainError::validation("x").error_code(), "E9004");
    }

    #[test]
    fn test_operation_accessor() {
        let err = CodeBrainError::request_failed(Operation::DeletePlaybook, "x");
        assert_eq!(err.operation(), Some(Operation::DeletePlaybook));
        assert_eq!(CodeBrainError::Internal("x".to_string()).operation(), None);
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_result: Result<serde_json::Value, _> = serde_json::from_str("invalid json");
        let err: CodeBrainError = json_result.unwrap_err().into();
        assert!(matches!(err, CodeBrainError::SerializationError(_)));
    }

    #[test]
    fn test_cli_error_display() {
        let err = CodeBrainError::request_failed(Operation::LoadPlaybooks, "connection refused");
        let output = CliErrorDisplay::new(&err).to_string();

        assert!(output.contains("Failed to load playbooks"));
        assert!(output.contains("connection refused"));
        assert!(output.contains("Suggestion"));

        let output = CliErrorDisplay::new(&err).without_suggestion().to_string();
        assert!(!output.contains("Suggestion"));
    }
}
