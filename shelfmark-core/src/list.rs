//! List views with client-side filtering and the delete action

use crate::api::ApiClient;
use crate::types::{Author, Book, Category};

/// Items a list view can hold
pub trait Searchable {
    fn id(&self) -> i64;

    /// Fields the search box matches against
    fn search_fields(&self) -> Vec<&str>;
}

impl Searchable for Book {
    fn id(&self) -> i64 {
        self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.author_name()]
    }
}

impl Searchable for Author {
    fn id(&self) -> i64 {
        self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str()]
    }
}

impl Searchable for Category {
    fn id(&self) -> i64 {
        self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str()]
    }
}

/// Message shown when a delete request fails
pub const DELETE_FAILED_MESSAGE: &str = "Failed to delete book";

/// What happened to a delete request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The user declined the confirmation; nothing was sent
    Cancelled,
    Deleted,
    /// No such item in the list; nothing was sent
    NotFound,
    /// The request failed and the list is unchanged
    Failed(String),
}

/// Fetched items plus the current search term
#[derive(Debug, Clone, PartialEq)]
pub struct ListView<T> {
    items: Vec<T>,
    search: String,
}

impl<T> Default for ListView<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            search: String::new(),
        }
    }
}

impl<T: Searchable> ListView<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            search: String::new(),
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    /// Items matching the search term, case-insensitively, in fetch order
    pub fn visible(&self) -> Vec<&T> {
        let needle = self.search.to_lowercase();
        self.items
            .iter()
            .filter(|item| {
                needle.is_empty()
                    || item
                        .search_fields()
                        .iter()
                        .any(|field| field.to_lowercase().contains(&needle))
            })
            .collect()
    }

    pub fn get(&self, id: i64) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Append a newly created item
    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    /// Drop the item with `id` locally
    pub fn remove(&mut self, id: i64) -> Option<T> {
        let index = self.items.iter().position(|item| item.id() == id)?;
        Some(self.items.remove(index))
    }
}

impl ListView<Book> {
    /// Delete a book after `confirm` approves it.
    ///
    /// Sends one DELETE request. On success the book is removed from the list
    /// without refetching; on failure the list is left as it was.
    pub async fn delete<F>(&mut self, api: &ApiClient, id: i64, confirm: F) -> DeleteOutcome
    where
        F: FnOnce(&Book) -> bool,
    {
        let Some(book) = self.get(id) else {
            return DeleteOutcome::NotFound;
        };
        if !confirm(book) {
            return DeleteOutcome::Cancelled;
        }

        match api.delete_book(id).await {
            Ok(()) => {
                self.remove(id);
                tracing::info!("Deleted book {}", id);
                DeleteOutcome::Deleted
            }
            Err(e) => {
                tracing::error!("Error deleting book {}: {}", id, e);
                DeleteOutcome::Failed(DELETE_FAILED_MESSAGE.to_string())
            }
        }
    }
}
