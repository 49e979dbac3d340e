//! Page data loading
//!
//! Reads are joined all-or-nothing: if any request fails the whole load
//! fails with that error. [`or_empty`] applies the log-and-degrade policy
//! for callers that prefer an empty page over an error.

use crate::api::ApiClient;
use crate::error::Result;
use crate::types::{Author, Book, Category};

/// Everything the add/edit book form needs before it can render
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookFormData {
    /// The book being edited; `None` when adding
    pub book: Option<Book>,
    pub authors: Vec<Author>,
    pub categories: Vec<Category>,
}

pub async fn load_books(api: &ApiClient) -> Result<Vec<Book>> {
    api.list_books().await
}

pub async fn load_authors(api: &ApiClient) -> Result<Vec<Author>> {
    api.list_authors().await
}

pub async fn load_categories(api: &ApiClient) -> Result<Vec<Category>> {
    api.list_categories().await
}

/// Fetch authors, categories and (when editing) the book in parallel
pub async fn load_book_form(api: &ApiClient, book_id: Option<i64>) -> Result<BookFormData> {
    let book = async {
        match book_id {
            Some(id) => api.get_book(id).await.map(Some),
            None => Ok(None),
        }
    };

    let (book, authors, categories) =
        tokio::try_join!(book, api.list_authors(), api.list_categories())?;

    tracing::debug!(
        "Loaded form data: {} authors, {} categories",
        authors.len(),
        categories.len()
    );

    Ok(BookFormData {
        book,
        authors,
        categories,
    })
}

/// Log a failed read once and fall back to an empty value
pub fn or_empty<T: Default>(result: Result<T>, what: &str) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            tracing::error!("Error fetching {}: {}", what, e);
            T::default()
        }
    }
}
