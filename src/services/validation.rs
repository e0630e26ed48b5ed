//! Request validation run before any store access.
//!
//! A single [`RequestValidator`] is built at startup and handed to the
//! services. It collects every field violation of a request at once.

use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use validator::{Validate, ValidationErrors};

use crate::{
    error::{AppError, AppResult, FieldViolation},
    models::{
        author::{parse_birth_date, BIRTH_DATE_MESSAGE},
        AuthorRequest, BookRequest,
    },
};

type Today = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

#[derive(Clone)]
pub struct RequestValidator {
    today: Today,
}

impl Default for RequestValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestValidator {
    /// Validator using the current UTC date
    pub fn new() -> Self {
        Self {
            today: Arc::new(|| Utc::now().date_naive()),
        }
    }

    /// Validator with a fixed notion of today
    pub fn with_today(today: NaiveDate) -> Self {
        Self {
            today: Arc::new(move || today),
        }
    }

    pub fn check_book(&self, request: &BookRequest) -> AppResult<()> {
        finish(collect(request.validate()))
    }

    pub fn check_author(&self, request: &AuthorRequest) -> AppResult<()> {
        let mut violations = collect(request.validate());

        if let Some(birth_date) = parse_birth_date(&request.birth_date) {
            if birth_date > (self.today)() {
                violations.push(FieldViolation::new("birthDate", BIRTH_DATE_MESSAGE));
            }
        }

        finish(violations)
    }
}

fn collect(result: Result<(), ValidationErrors>) -> Vec<FieldViolation> {
    let Err(errors) = result else {
        return Vec::new();
    };

    errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errors)| {
            let field = json_key(field);
            errors.iter().map(move |e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                FieldViolation::new(field.clone(), message)
            })
        })
        .collect()
}

/// Wire name of a request field: `author_ids` becomes `authorIds`
fn json_key(field: &str) -> String {
    let mut key = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            key.extend(c.to_uppercase());
            upper = false;
        } else {
            key.push(c);
        }
    }
    key
}

fn finish(mut violations: Vec<FieldViolation>) -> AppResult<()> {
    if violations.is_empty() {
        return Ok(());
    }
    violations.sort_by(|a, b| a.field.cmp(&b.field));
    Err(AppError::Validation(violations))
}
