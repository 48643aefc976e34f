//! # CLI Error Type
//!
//! Unified error type for script steps and subcommands.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Script step                                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ValidationError ──┐                                                    │
//! │  CoreError ────────┼──► AppError { code, message } ──► stderr (text     │
//! │  io / serde_json ──┤                                     or JSON)       │
//! │  ConfigError ──────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use testmart_core::{CoreError, ValidationError};

use crate::config::ConfigError;

/// Error reported by the CLI.
///
/// ## Serialization
/// ```json
/// {
///   "code": "VALIDATION_ERROR",
///   "message": "step 2 (addProduct): Invalid sku: \"\" (string)"
/// }
/// ```
#[derive(Debug, Clone, Serialize, thiserror::Error)]
#[serde(rename_all = "camelCase")]
#[error("[{code:?}] {message}")]
pub struct AppError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

/// Error codes for CLI failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input validation failed
    ValidationError,

    /// Operation on a cart that does not exist
    CartNotFound,

    /// Script could not be parsed
    InvalidInput,

    /// Reading or writing failed
    IoError,

    /// Environment configuration is invalid
    ConfigError,
}

impl AppError {
    /// Creates a new error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        AppError {
            code,
            message: message.into(),
        }
    }

    /// Creates a cart not found error.
    pub fn cart_not_found(id: &str) -> Self {
        AppError::new(ErrorCode::CartNotFound, format!("Cart not found: {}", id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::ValidationError, message)
    }

    /// Prefixes the message with the script step that failed.
    pub fn at_step(self, index: usize, op: &str) -> Self {
        AppError {
            code: self.code,
            message: format!("step {} ({}): {}", index + 1, op, self.message),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::validation(err.to_string())
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(e) => e.into(),
            other => AppError::validation(other.to_string()),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            AppError::new(ErrorCode::IoError, err.to_string())
        } else {
            AppError::new(ErrorCode::InvalidInput, err.to_string())
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        tracing::error!("I/O failure: {}", err);
        AppError::new(ErrorCode::IoError, err.to_string())
    }
}
