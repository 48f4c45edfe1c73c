use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::app::http::ApiResponse;

/// Operations that validate a request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOp {
    Add,
    Update,
}

impl WriteOp {
    fn failure_prefix(self) -> &'static str {
        match self {
            Self::Add => "Failed to add book",
            Self::Update => "Failed to update book",
        }
    }
}

/// Operations that look a book up by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupOp {
    Get,
    Update,
    Delete,
}

impl LookupOp {
    fn not_found_message(self) -> &'static str {
        match self {
            Self::Get => "Book not found",
            Self::Update => "Failed to update book. Id not found",
            Self::Delete => "Failed to delete book. Id not found",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please provide the book name")]
    MissingName,

    #[error("readPage must not be greater than pageCount")]
    ReadPageExceedsPageCount,

    #[error("Invalid request body: {0}")]
    InvalidBody(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("{}. {reason}", .op.failure_prefix())]
    Validation {
        op: WriteOp,
        reason: ValidationError,
    },

    #[error("{}", .op.not_found_message())]
    NotFound { op: LookupOp },

    /// The collection did not contain a book right after inserting it.
    #[error("Failed to add book")]
    AddFailed { detail: String },
}

impl StoreError {
    pub fn validation(op: WriteOp, reason: ValidationError) -> Self {
        Self::Validation { op, reason }
    }

    pub fn not_found(op: LookupOp) -> Self {
        Self::NotFound { op }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::AddFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            Self::AddFailed { detail } => {
                tracing::error!(detail = %detail, "book store failure");
            }
            _ => tracing::debug!(status = status.as_u16(), error = %self, "request rejected"),
        }

        let body = if status.is_server_error() {
            ApiResponse::error(self.to_string())
        } else {
            ApiResponse::fail(self.to_string())
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_messages_carry_the_operation() {
        let err = StoreError::validation(WriteOp::Add, ValidationError::MissingName);
        assert_eq!(
            err.to_string(),
            "Failed to add book. Please provide the book name"
        );

        let err = StoreError::validation(WriteOp::Update, ValidationError::ReadPageExceedsPageCount);
        assert_eq!(
            err.to_string(),
            "Failed to update book. readPage must not be greater than pageCount"
        );
    }

    #[test]
    fn not_found_messages() {
        let get = StoreError::not_found(LookupOp::Get);
        assert_eq!(get.to_string(), "Book not found");
        assert_eq!(get.status_code(), StatusCode::NOT_FOUND);

        assert_eq!(
            StoreError::not_found(LookupOp::Update).to_string(),
            "Failed to update book. Id not found"
        );
        assert_eq!(
            StoreError::not_found(LookupOp::Delete).to_string(),
            "Failed to delete book. Id not found"
        );
    }

    #[test]
    fn status_codes() {
        assert_eq!(
            StoreError::validation(WriteOp::Add, ValidationError::MissingName).status_code(),
            StatusCode::BAD_REQUEST
        );

        let err = StoreError::AddFailed {
            detail: "missing".to_string(),
        };
        assert_eq!(err.to_string(), "Failed to add book");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
