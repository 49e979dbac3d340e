//! Author form draft

use super::{char_len, check_year, non_empty, Validate, ValidationErrors};
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern")
    })
}

/// Values of the "Add Author" form
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AuthorDraft {
    pub name: String,
    pub email: Option<String>,
    pub birth_year: Option<i32>,
}

impl AuthorDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl Validate for AuthorDraft {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name_len = char_len(&self.name);
        if name_len == 0 {
            errors.add("name", "Name is required");
        } else if name_len < 2 {
            errors.add("name", "Name must be at least 2 characters");
        } else if name_len > 100 {
            errors.add("name", "Name must be less than 100 characters");
        }

        if let Some(email) = non_empty(&self.email) {
            if !email_pattern().is_match(email) {
                errors.add("email", "Invalid email format");
            }
        }

        check_year(&mut errors, "birth_year", "Birth year", self.birth_year);

        errors.into_result()
    }

    fn field_names(&self) -> Vec<String> {
        vec!["name".into(), "email".into(), "birth_year".into()]
    }
}
