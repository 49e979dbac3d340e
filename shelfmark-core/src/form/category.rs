//! Category form draft

use super::{char_len, non_empty, Validate, ValidationErrors};
use serde::Serialize;

/// Values of the "Add Category" form
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategoryDraft {
    pub name: String,
    pub description: Option<String>,
}

impl CategoryDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }
}

impl Validate for CategoryDraft {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name_len = char_len(&self.name);
        if name_len == 0 {
            errors.add("name", "Category name is required");
        } else if name_len > 50 {
            errors.add("name", "Name must be at most 50 characters");
        }

        if let Some(description) = non_empty(&self.description) {
            if char_len(description) > 200 {
                errors.add("description", "Description must be at most 200 characters");
            }
        }

        errors.into_result()
    }

    fn field_names(&self) -> Vec<String> {
        vec!["name".into(), "description".into()]
    }
}
