//! Error types for the Bookshelf server

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::models::{EntityKind, PublicationStatus};

/// Numeric error codes carried in every error body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Failure = 1,
    DbFailure = 3,
    NoSuchEntity = 5,
    BadValue = 18,
    NoSuchRelatedEntity = 22,
    IllegalTransition = 23,
}

/// A single field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("{}: {}", v.field, v.message))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {}", join_violations(.0))]
    Validation(Vec<FieldViolation>),

    #[error("The following {kind} IDs do not exist: {ids:?}")]
    RelatedEntityNotFound { kind: EntityKind, ids: Vec<i64> },

    #[error("Cannot change status from {from} to {to}")]
    IllegalStatusTransition {
        from: PublicationStatus,
        to: PublicationStatus,
    },

    #[error("Store failure: {0}")]
    StoreFailure(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl AppError {
    pub fn not_found(kind: EntityKind, id: i64) -> Self {
        AppError::NotFound(format!("{} with ID {} not found", kind.label(), id))
    }
}

/// Error response body
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<FieldViolation>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let (status, code, message, violations) = match self {
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::NoSuchEntity, message, vec![]),
            AppError::Validation(violations) => {
                (StatusCode::BAD_REQUEST, ErrorCode::BadValue, message, violations)
            }
            AppError::RelatedEntityNotFound { .. } => (
                StatusCode::BAD_REQUEST,
                ErrorCode::NoSuchRelatedEntity,
                message,
                vec![],
            ),
            AppError::IllegalStatusTransition { .. } => (
                StatusCode::BAD_REQUEST,
                ErrorCode::IllegalTransition,
                message,
                vec![],
            ),
            AppError::StoreFailure(msg) => {
                tracing::error!("Store failure: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::Failure,
                    "Internal server error".to_string(),
                    vec![],
                )
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::DbFailure,
                    "Database error".to_string(),
                    vec![],
                )
            }
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
            violations,
        });

        (status, body).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        let message = rejection.body_text();
        let field = missing_field(&message).unwrap_or("body").to_string();
        AppError::Validation(vec![FieldViolation::new(field, message)])
    }
}

/// Field named by a serde "missing field `x`" message
fn missing_field(message: &str) -> Option<&str> {
    let rest = message.split("missing field `").nth(1)?;
    rest.split('`').next()
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
