//! Author model and related types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::error::{AppError, AppResult, FieldViolation};

/// Wire format of birth dates
pub const BIRTH_DATE_FORMAT: &str = "%Y-%m-%d";

pub const BIRTH_DATE_MESSAGE: &str =
    "Invalid birth date. It must follow the format yyyy-MM-dd and be in the past or present.";

/// Author row as held by the record store. `id` is `None` until persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub id: Option<i64>,
    pub name: String,
    pub birth_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Author {
    pub fn new(name: String, birth_date: NaiveDate) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            name,
            birth_date,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn persisted_id(&self) -> AppResult<i64> {
        self.id
            .ok_or_else(|| AppError::StoreFailure(format!("Author '{}' has no id", self.name)))
    }

    /// Replacement row for an update, keeping identity and creation time
    pub fn revise(self, name: String, birth_date: NaiveDate) -> Author {
        Author {
            name,
            birth_date,
            updated_at: Utc::now(),
            ..self
        }
    }
}

/// Create/update author request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthorRequest {
    #[validate(custom(function = "validate_name"))]
    #[schema(example = "Jane Doe")]
    pub name: String,
    #[validate(custom(function = "validate_birth_date_format"))]
    #[schema(example = "1980-01-01")]
    pub birth_date: String,
    /// Full replacement set of linked books; omitted means none
    #[serde(default)]
    pub book_ids: Vec<i64>,
}

impl AuthorRequest {
    pub fn parsed_birth_date(&self) -> AppResult<NaiveDate> {
        parse_birth_date(&self.birth_date).ok_or_else(|| {
            AppError::Validation(vec![FieldViolation::new("birthDate", BIRTH_DATE_MESSAGE)])
        })
    }
}

/// Author as returned by the API, with the IDs of their books
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthorResponse {
    pub id: i64,
    pub name: String,
    pub birth_date: NaiveDate,
    pub book_ids: Vec<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AuthorResponse {
    pub fn assemble(author: Author, mut book_ids: Vec<i64>) -> AppResult<Self> {
        let id = author.persisted_id()?;
        book_ids.sort_unstable();
        Ok(Self {
            id,
            name: author.name,
            birth_date: author.birth_date,
            book_ids,
            created_at: author.created_at,
            updated_at: author.updated_at,
        })
    }
}

pub fn parse_birth_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, BIRTH_DATE_FORMAT).ok()
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some(Cow::Borrowed("Author name cannot be blank"));
        return Err(err);
    }
    Ok(())
}

fn validate_birth_date_format(value: &str) -> Result<(), ValidationError> {
    if parse_birth_date(value).is_none() {
        let mut err = ValidationError::new("birth_date");
        err.message = Some(Cow::Borrowed(BIRTH_DATE_MESSAGE));
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_birth_date_parsing() {
        assert_eq!(
            parse_birth_date("1980-02-29"),
            NaiveDate::from_ymd_opt(1980, 2, 29)
        );
        assert!(parse_birth_date("1981-02-29").is_none());
        assert!(parse_birth_date("29/02/1980").is_none());
    }

    #[test]
    fn test_request_defaults_to_no_books() {
        let request: AuthorRequest =
            serde_json::from_str(r#"{"name": "Jane Doe", "birthDate": "1980-01-01"}"#).unwrap();
        assert!(request.book_ids.is_empty());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_revise_keeps_identity() {
        let mut author = Author::new("Jane".into(), NaiveDate::from_ymd_opt(1980, 1, 1).unwrap());
        author.id = Some(4);
        let created_at = author.created_at;

        let revised = author.revise("Jane Doe".into(), NaiveDate::from_ymd_opt(1981, 1, 1).unwrap());
        assert_eq!(revised.id, Some(4));
        assert_eq!(revised.created_at, created_at);
        assert_eq!(revised.name, "Jane Doe");
    }
}
