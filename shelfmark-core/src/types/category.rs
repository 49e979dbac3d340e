//! Category entity

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A category that books can be filed under
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: i64,

    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}
