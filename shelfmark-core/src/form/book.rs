//! Book form draft

use super::{char_len, check_year, non_empty, Validate, ValidationErrors};
use crate::types::Book;
use regex::Regex;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::OnceLock;

/// Cover image extensions the catalog accepts
pub const ALLOWED_COVER_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif"];

fn isbn_pattern() -> &'static Regex {
    static ISBN: OnceLock<Regex> = OnceLock::new();
    // ASCII digits only; `\d` would also accept other Unicode digits
    ISBN.get_or_init(|| Regex::new(r"^[0-9-]{10,17}$").expect("valid ISBN pattern"))
}

/// Editable values of the add/edit book form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookDraft {
    pub title: String,
    pub isbn: Option<String>,
    pub publication_year: Option<i32>,
    pub pages: Option<i32>,
    pub description: Option<String>,
    pub author_id: Option<i64>,
    pub categories: Vec<CategoryEntry>,

    /// Local path of a cover image to upload with the book
    pub cover: Option<PathBuf>,
}

/// One row of the dynamic category list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryEntry {
    pub category_id: Option<i64>,
    pub priority: i32,
    pub notes: String,
}

impl Default for CategoryEntry {
    fn default() -> Self {
        Self {
            category_id: None,
            priority: 1,
            notes: String::new(),
        }
    }
}

impl CategoryEntry {
    pub fn new(category_id: i64, priority: i32, notes: impl Into<String>) -> Self {
        Self {
            category_id: Some(category_id),
            priority,
            notes: notes.into(),
        }
    }
}

impl BookDraft {
    pub fn new(title: impl Into<String>, author_id: i64) -> Self {
        Self {
            title: title.into(),
            author_id: Some(author_id),
            ..Self::default()
        }
    }

    /// Initial values for editing an existing book
    pub fn from_book(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            isbn: book.isbn.clone(),
            publication_year: book.publication_year,
            pages: book.pages,
            description: book.description.clone(),
            author_id: Some(book.author_id),
            categories: book
                .categories
                .iter()
                .map(|bc| CategoryEntry {
                    category_id: Some(bc.category_id),
                    priority: bc.priority,
                    notes: bc.notes.clone().unwrap_or_default(),
                })
                .collect(),
            cover: None,
        }
    }

    /// Append an empty category row
    pub fn add_category(&mut self) -> &mut CategoryEntry {
        self.categories.push(CategoryEntry::default());
        let last = self.categories.len() - 1;
        &mut self.categories[last]
    }

    /// Remove the category row at `index`; out-of-range indices are ignored
    pub fn remove_category(&mut self, index: usize) -> Option<CategoryEntry> {
        if index < self.categories.len() {
            Some(self.categories.remove(index))
        } else {
            None
        }
    }

    /// Whether submitting this draft needs a multipart body
    pub fn has_attachment(&self) -> bool {
        self.cover.is_some()
    }
}

impl Validate for BookDraft {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let title_len = char_len(&self.title);
        if title_len == 0 {
            errors.add("title", "Title is required");
        } else if title_len > 200 {
            errors.add("title", "Title must be less than 200 characters");
        }

        if let Some(isbn) = non_empty(&self.isbn) {
            if !isbn_pattern().is_match(isbn) {
                errors.add(
                    "isbn",
                    "ISBN must be 10-17 characters and contain only digits and hyphens",
                );
            }
        }

        check_year(
            &mut errors,
            "publication_year",
            "Publication year",
            self.publication_year,
        );

        if let Some(pages) = self.pages {
            if pages < 1 {
                errors.add("pages", "Pages must be at least 1");
            } else if pages > 10000 {
                errors.add("pages", "Pages must be less than 10000");
            }
        }

        if let Some(description) = non_empty(&self.description) {
            if char_len(description) > 1000 {
                errors.add(
                    "description",
                    "Description must be less than 1000 characters",
                );
            }
        }

        if self.author_id.is_none() {
            errors.add("author_id", "Author is required");
        }

        for (i, entry) in self.categories.iter().enumerate() {
            if entry.category_id.is_none() {
                errors.add(format!("categories.{}.category_id", i), "Category is required");
            }
            if !(1..=5).contains(&entry.priority) {
                errors.add(
                    format!("categories.{}.priority", i),
                    "Priority must be between 1 and 5",
                );
            }
            if char_len(&entry.notes) > 200 {
                errors.add(
                    format!("categories.{}.notes", i),
                    "Notes must be less than 200 characters",
                );
            }
        }

        if let Some(cover) = &self.cover {
            let allowed = cover
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| ALLOWED_COVER_EXTENSIONS.contains(&e.to_lowercase().as_str()))
                .unwrap_or(false);
            if !allowed {
                errors.add("cover_image", "Invalid image format");
            }
        }

        errors.into_result()
    }

    fn field_names(&self) -> Vec<String> {
        let mut names: Vec<String> = [
            "title",
            "author_id",
            "isbn",
            "publication_year",
            "pages",
            "description",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        for i in 0..self.categories.len() {
            names.push(format!("categories.{}.category_id", i));
            names.push(format!("categories.{}.priority", i));
            names.push(format!("categories.{}.notes", i));
        }
        names.push("cover_image".to_string());
        names
    }
}
