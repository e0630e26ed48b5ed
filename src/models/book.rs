//! Book model, publication status and related request/response types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::{borrow::Cow, fmt, str::FromStr};
use thiserror::Error;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::error::{AppError, AppResult, FieldViolation};

/// Publication status of a book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PublicationStatus {
    Unpublished,
    Published,
}

impl PublicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PublicationStatus::Unpublished => "UNPUBLISHED",
            PublicationStatus::Published => "PUBLISHED",
        }
    }

    /// Check a status change. A published book can never go back to
    /// unpublished; every other change, including no change, is allowed.
    pub fn transition_to(self, next: PublicationStatus) -> AppResult<PublicationStatus> {
        match (self, next) {
            (PublicationStatus::Published, PublicationStatus::Unpublished) => {
                Err(AppError::IllegalStatusTransition {
                    from: self,
                    to: next,
                })
            }
            _ => Ok(next),
        }
    }
}

impl Default for PublicationStatus {
    fn default() -> Self {
        PublicationStatus::Unpublished
    }
}

impl fmt::Display for PublicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown publication status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for PublicationStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "UNPUBLISHED" => Ok(PublicationStatus::Unpublished),
            "PUBLISHED" => Ok(PublicationStatus::Published),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Book row as held by the record store. `id` is `None` until persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: Option<i64>,
    pub title: String,
    pub price: Decimal,
    pub status: PublicationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Book {
    pub fn new(title: String, price: Decimal, status: PublicationStatus) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            title,
            price,
            status,
            created_at: now,
            updated_at: now,
        }
    }

    /// ID assigned by the store; missing only if the store misbehaved
    pub fn persisted_id(&self) -> AppResult<i64> {
        self.id
            .ok_or_else(|| AppError::StoreFailure(format!("Book '{}' has no id", self.title)))
    }

    /// Same book with a new status, if the transition is allowed
    pub fn with_status(self, next: PublicationStatus) -> AppResult<Book> {
        let status = self.status.transition_to(next)?;
        Ok(Book { status, ..self })
    }

    /// Replacement row for an update: identity and creation time are kept,
    /// the update time is refreshed.
    pub fn revise(self, title: String, price: Decimal, status: PublicationStatus) -> AppResult<Book> {
        let revised = self.with_status(status)?;
        Ok(Book {
            title,
            price,
            updated_at: Utc::now(),
            ..revised
        })
    }
}

/// Create/update book request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookRequest {
    #[validate(custom(function = "validate_title"))]
    #[schema(example = "Kotlin Programming")]
    pub title: String,
    #[validate(custom(function = "validate_price"))]
    #[schema(value_type = String, example = "29")]
    pub price: Decimal,
    #[validate(custom(function = "validate_status"))]
    #[schema(example = "UNPUBLISHED")]
    pub status: String,
    #[validate(length(min = 1, message = "A book must have at least one author"))]
    pub author_ids: Vec<i64>,
}

impl BookRequest {
    pub fn publication_status(&self) -> AppResult<PublicationStatus> {
        self.status.parse().map_err(|e: UnknownStatus| {
            AppError::Validation(vec![FieldViolation::new("status", e.to_string())])
        })
    }
}

/// Book as returned by the API, with the IDs of its authors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookResponse {
    pub id: i64,
    pub title: String,
    #[schema(value_type = String, example = "29")]
    pub price: Decimal,
    pub status: PublicationStatus,
    pub author_ids: Vec<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BookResponse {
    pub fn assemble(book: Book, mut author_ids: Vec<i64>) -> AppResult<Self> {
        let id = book.persisted_id()?;
        author_ids.sort_unstable();
        Ok(Self {
            id,
            title: book.title,
            price: book.price,
            status: book.status,
            author_ids,
            created_at: book.created_at,
            updated_at: book.updated_at,
        })
    }
}

fn rule(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(rule("blank", "Book title cannot be blank"));
    }
    Ok(())
}

fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(rule("min", "Book price must be at least 0"));
    }
    Ok(())
}

fn validate_status(status: &str) -> Result<(), ValidationError> {
    if status.parse::<PublicationStatus>().is_err() {
        return Err(rule("enum", "Status must be one of: PUBLISHED, UNPUBLISHED"));
    }
    Ok(())
}
