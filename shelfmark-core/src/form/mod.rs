//! Form drafts, validation rules and the form state machine
//!
//! Each editable entity has a tagged draft type (`BookDraft`, `AuthorDraft`,
//! ...) implementing [`Validate`]. Validation returns a structured
//! [`ValidationErrors`] list rather than failing on the first problem, so a
//! front end can show every field error at once.

mod author;
mod book;
mod category;
mod credentials;
mod engine;

pub use author::AuthorDraft;
pub use book::{BookDraft, CategoryEntry, ALLOWED_COVER_EXTENSIONS};
pub use category::CategoryDraft;
pub use credentials::Credentials;
pub use engine::{FormPhase, FormState, SubmitBlocked};

use chrono::Datelike;
use std::fmt;

/// A single field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Field path, e.g. `title` or `categories.0.priority`
    pub field: String,
    pub message: String,
}

/// Ordered collection of field errors
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error. Only the first error per field is kept.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        let field = field.into();
        if self.get(&field).is_none() {
            self.0.push(FieldError {
                field,
                message: message.into(),
            });
        }
    }

    /// First error message for a field
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// `Ok(())` when no errors were recorded
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// A draft that can be checked before submission
pub trait Validate {
    /// Check every rule, collecting all field errors
    fn validate(&self) -> Result<(), ValidationErrors>;

    /// Every field path the draft currently exposes, in display order
    fn field_names(&self) -> Vec<String>;
}

/// The current calendar year (local time), upper bound for year fields
pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

/// Length in characters, not bytes
pub(crate) fn char_len(value: &str) -> usize {
    value.chars().count()
}

/// Treat `Some("")` the same as an absent optional text field
pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Shared rule for optional year fields bounded by 1000 and the current year
pub(crate) fn check_year(
    errors: &mut ValidationErrors,
    field: &str,
    label: &str,
    value: Option<i32>,
) {
    if let Some(year) = value {
        if year < 1000 {
            errors.add(field, format!("{} must be at least 1000", label));
        } else if year > current_year() {
            errors.add(field, format!("{} cannot be in the future", label));
        }
    }
}
