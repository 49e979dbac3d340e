//! Author entity

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// An author record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Author {
    pub id: i64,

    pub name: String,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub birth_year: Option<i32>,

    /// Number of books by this author, derived by the server
    #[serde(default)]
    pub book_count: u32,

    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}
