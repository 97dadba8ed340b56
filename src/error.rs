//! Structured error types for board operations.

use serde::Serialize;
use std::fmt;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Unknown column referenced, or a required identifying field missing.
    ValidationError,
    /// Operation targets a task id (or index) that does not exist.
    NotFound,
    /// Serialization or durable store failure.
    StorageError,
}

/// Structured error returned by the board engine.
#[derive(Debug, Serialize)]
pub struct BoardError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl BoardError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            field: None,
            details: None,
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    // Convenience constructors

    pub fn missing_field(field: &str) -> Self {
        Self::new(ErrorCode::ValidationError, format!("{} is required", field)).with_field(field)
    }

    pub fn unknown_column(column_id: &str) -> Self {
        Self::new(
            ErrorCode::ValidationError,
            format!("Unknown column: {}", column_id),
        )
        .with_field("column_id")
    }

    pub fn task_not_found(task_id: &str) -> Self {
        Self::new(ErrorCode::NotFound, format!("Task not found: {}", task_id))
    }

    pub fn no_task_at(column_id: &str, index: i64) -> Self {
        Self::new(
            ErrorCode::NotFound,
            format!("No task at index {} in column {}", index, column_id),
        )
        .with_field("source_index")
    }

    pub fn storage(err: impl fmt::Display) -> Self {
        Self::new(ErrorCode::StorageError, err.to_string())
    }

    pub fn is_not_found(&self) -> bool {
        self.code == ErrorCode::NotFound
    }
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for BoardError {}

impl From<crate::db::StorageError> for BoardError {
    fn from(err: crate::db::StorageError) -> Self {
        BoardError::storage(err)
    }
}

/// Result type for board operations.
pub type BoardResult<T> = std::result::Result<T, BoardError>;
