//! Error types for custdash-core
//!
//! This module provides error handling for fetching and looking up dashboard
//! records, including error codes, detailed messages, and suggestions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Request could not be sent or timed out
    FetchFailed,
    /// Endpoint answered with a non-success status
    BadStatus,
    /// Response body was not the expected JSON
    DecodeError,
    /// Customer not found
    CustomerNotFound,
    /// Configuration error
    ConfigError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::FetchFailed => write!(f, "FETCH_FAILED"),
            ErrorCode::BadStatus => write!(f, "BAD_STATUS"),
            ErrorCode::DecodeError => write!(f, "DECODE_ERROR"),
            ErrorCode::CustomerNotFound => write!(f, "CUSTOMER_NOT_FOUND"),
            ErrorCode::ConfigError => write!(f, "CONFIG_ERROR"),
        }
    }
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Suggestions for resolution
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ErrorDetails {
    pub fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            details: None,
            suggestions: vec![],
        }
    }

    /// Add detail information
    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.details = Some(detail);
        self
    }

    /// Add a suggestion
    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestions.push(suggestion);
        self
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, "\nDetails: {}", details)?;
        }
        if !self.suggestions.is_empty() {
            write!(f, "\nSuggestions:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n  - {}", suggestion)?;
            }
        }
        Ok(())
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    /// Informational
    Info,
    /// Warning - operation may be affected
    Warning,
    /// Error - operation failed
    Error,
    /// Critical - application cannot work as configured
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "info"),
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
            ErrorSeverity::Critical => write!(f, "critical"),
        }
    }
}

/// Main error type for custdash-core
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Failed to fetch {resource}: {message}")]
    FetchFailed { resource: String, message: String },

    #[error("Fetching {resource} returned HTTP {status}")]
    BadStatus { resource: String, status: u16 },

    #[error("Could not decode {resource}: {message}")]
    DecodeError { resource: String, message: String },

    #[error("Customer not found: {id}")]
    CustomerNotFound { id: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },
}

impl CoreError {
    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::FetchFailed { .. } => ErrorCode::FetchFailed,
            CoreError::BadStatus { .. } => ErrorCode::BadStatus,
            CoreError::DecodeError { .. } => ErrorCode::DecodeError,
            CoreError::CustomerNotFound { .. } => ErrorCode::CustomerNotFound,
            CoreError::ConfigError { .. } => ErrorCode::ConfigError,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::FetchFailed { .. } => ErrorSeverity::Error,
            CoreError::BadStatus { .. } => ErrorSeverity::Error,
            CoreError::DecodeError { .. } => ErrorSeverity::Error,
            CoreError::CustomerNotFound { .. } => ErrorSeverity::Info,
            CoreError::ConfigError { .. } => ErrorSeverity::Critical,
        }
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let mut details = ErrorDetails::new(self.code(), self.to_string());

        match self {
            CoreError::FetchFailed { .. } => {
                details = details.with_suggestion(
                    "Check that the data endpoint is reachable from this machine.".to_string(),
                );
                details = details.with_suggestion(
                    "Increase source.timeout_secs if the endpoint is slow.".to_string(),
                );
            }
            CoreError::BadStatus { status, .. } => {
                details = details.with_detail(serde_json::json!({ "status": status }));
                details = details.with_suggestion(
                    "Check source.base_url and the endpoint paths in your config.".to_string(),
                );
            }
            CoreError::DecodeError { message, .. } => {
                details = details.with_detail(serde_json::json!({ "decode_message": message }));
                details = details.with_suggestion(
                    "The endpoint must return a JSON array of records.".to_string(),
                );
            }
            CoreError::CustomerNotFound { .. } => {
                details = details.with_suggestion(
                    "Use the /api/customers endpoint to list all customers.".to_string(),
                );
            }
            _ => {}
        }

        details
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

/// Error context for reporting
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Operation being performed
    pub operation: String,
    /// Data source description
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Error logger trait
pub trait ErrorLogger {
    /// Log an error
    fn log_error(&self, error: &CoreError, context: &ErrorContext);
}

/// Default error logger using log crate
#[derive(Default)]
pub struct DefaultErrorLogger;

impl ErrorLogger for DefaultErrorLogger {
    fn log_error(&self, error: &CoreError, context: &ErrorContext) {
        let source = context.source.as_deref().unwrap_or("-");
        match error.severity() {
            ErrorSeverity::Info | ErrorSeverity::Warning => log::warn!(
                target: "custdash::error",
                "[{}] {} - Operation: {} - Source: {}",
                error.code(),
                error,
                context.operation,
                source
            ),
            ErrorSeverity::Error | ErrorSeverity::Critical => log::error!(
                target: "custdash::error",
                "{} - Operation: {} - Source: {}",
                error.to_details(),
                context.operation,
                source
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::FetchFailed.to_string(), "FETCH_FAILED");
        assert_eq!(ErrorCode::CustomerNotFound.to_string(), "CUSTOMER_NOT_FOUND");
    }

    #[test]
    fn test_error_message() {
        let err = CoreError::BadStatus {
            resource: "customers".to_string(),
            status: 404,
        };
        assert_eq!(err.to_string(), "Fetching customers returned HTTP 404");
        assert_eq!(err.code(), ErrorCode::BadStatus);
        assert_eq!(err.severity(), ErrorSeverity::Error);
    }

    #[test]
    fn test_to_details_adds_suggestions() {
        let err = CoreError::DecodeError {
            resource: "transactions".to_string(),
            message: "expected a sequence".to_string(),
        };
        let details = err.to_details();
        assert_eq!(details.code, ErrorCode::DecodeError);
        assert!(!details.suggestions.is_empty());
        assert_eq!(details.details.unwrap()["decode_message"], "expected a sequence");
    }

    #[test]
    fn test_details_serialization_skips_empty() {
        let details = ErrorDetails::new(ErrorCode::ConfigError, "bad kind".to_string());
        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(json["code"], "CONFIG_ERROR");
        assert!(json.get("details").is_none());
        assert!(json.get("suggestions").is_none());
    }

    #[test]
    fn test_error_context_builder() {
        let ctx = ErrorContext::new("fetch customers").with_source("file:./data");
        assert_eq!(ctx.operation, "fetch customers");
        assert_eq!(ctx.source.as_deref(), Some("file:./data"));
    }
}
