//! The Book entity and its category associations

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A book record as returned by the catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Book {
    pub id: i64,

    pub title: String,

    #[serde(default)]
    pub isbn: Option<String>,

    #[serde(default)]
    pub publication_year: Option<i32>,

    #[serde(default)]
    pub pages: Option<i32>,

    #[serde(default)]
    pub description: Option<String>,

    /// Server-side file name of the uploaded cover
    #[serde(default)]
    pub cover_image: Option<String>,

    pub author_id: i64,

    /// Denormalized author name, absent if the author was removed
    #[serde(default)]
    pub author_name: Option<String>,

    /// Ordered category associations
    #[serde(default)]
    pub categories: Vec<BookCategory>,

    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,

    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

impl Book {
    /// Author name, or an empty string when the server did not provide one
    pub fn author_name(&self) -> &str {
        self.author_name.as_deref().unwrap_or("")
    }
}

/// Link between a book and a category
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookCategory {
    #[serde(default)]
    pub id: Option<i64>,

    #[serde(default)]
    pub book_id: Option<i64>,

    pub category_id: i64,

    #[serde(default)]
    pub category_name: Option<String>,

    /// 1 (highest) to 5 when set through the forms; stored values are not
    /// range-checked by the server
    #[serde(default = "default_priority")]
    pub priority: i32,

    #[serde(default)]
    pub notes: Option<String>,

    #[serde(default)]
    pub assigned_at: Option<NaiveDateTime>,
}

fn default_priority() -> i32 {
    1
}
