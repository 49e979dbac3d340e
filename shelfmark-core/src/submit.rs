//! Submit handler: validate, encode, send once, record the outcome
//!
//! Every write follows the same path. A draft that fails validation never
//! reaches the network. A failed write lands in the form's general error
//! slot and is not retried.

use crate::api::{book_json, book_payload, ApiClient};
use crate::error::{Result, ShelfmarkError};
use crate::form::{AuthorDraft, BookDraft, CategoryDraft, FormState, SubmitBlocked, Validate};
use crate::types::{Author, Book, Category};
use std::future::Future;

/// Whether a book form creates a new record or updates an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitTarget {
    Create,
    Update(i64),
}

impl SubmitTarget {
    fn fallback_message(self) -> &'static str {
        match self {
            Self::Create => "Failed to create book",
            Self::Update(_) => "Failed to update book",
        }
    }
}

/// Result of one submission attempt
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome<T> {
    /// Saved; the form is now `NavigatedAway`
    Saved(T),
    /// Validation failed; field errors are on the form
    Invalid,
    /// The write failed; the message is also in the general error slot
    Failed(String),
    /// Another submission is still in flight
    Busy,
}

impl<T> SubmitOutcome<T> {
    pub fn saved(self) -> Option<T> {
        match self {
            Self::Saved(value) => Some(value),
            _ => None,
        }
    }
}

async fn run<D, T, F, Fut>(form: &mut FormState<D>, fallback: &str, send: F) -> SubmitOutcome<T>
where
    D: Validate + Clone,
    F: FnOnce(D) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let values = match form.begin_submit() {
        Ok(values) => values.clone(),
        Err(SubmitBlocked::Invalid(errors)) => {
            tracing::debug!("Submission blocked: {}", errors);
            return SubmitOutcome::Invalid;
        }
        Err(SubmitBlocked::InFlight) => return SubmitOutcome::Busy,
    };

    match send(values).await {
        Ok(saved) => {
            form.succeed();
            SubmitOutcome::Saved(saved)
        }
        Err(e) => {
            tracing::warn!("Submission failed: {}", e);
            let message = e.general_message(fallback);
            form.fail(message.clone());
            SubmitOutcome::Failed(message)
        }
    }
}

/// Shown when an update carries a cover; the catalog only reads JSON on update
pub const COVER_ON_UPDATE_MESSAGE: &str = "Cover images can only be uploaded when adding a book";

/// Create or update a book.
///
/// A create uses multipart when a cover is attached. An update is always
/// JSON; a draft with a cover fails before anything is sent.
pub async fn submit_book(
    api: &ApiClient,
    form: &mut FormState<BookDraft>,
    target: SubmitTarget,
) -> SubmitOutcome<Book> {
    run(form, target.fallback_message(), |draft| async move {
        match target {
            SubmitTarget::Create => api.create_book(book_payload(&draft).await?).await,
            SubmitTarget::Update(_) if draft.has_attachment() => Err(
                ShelfmarkError::Attachment(COVER_ON_UPDATE_MESSAGE.to_string()),
            ),
            SubmitTarget::Update(id) => api.update_book(id, book_json(&draft)?).await,
        }
    })
    .await
}

pub async fn submit_author(
    api: &ApiClient,
    form: &mut FormState<AuthorDraft>,
) -> SubmitOutcome<Author> {
    run(form, "Failed to create author", |draft| async move {
        api.create_author(&draft).await
    })
    .await
}

pub async fn submit_category(
    api: &ApiClient,
    form: &mut FormState<CategoryDraft>,
) -> SubmitOutcome<Category> {
    run(form, "Failed to create category", |draft| async move {
        api.create_category(&draft).await
    })
    .await
}
