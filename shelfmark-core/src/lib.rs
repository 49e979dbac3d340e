//! Shelfmark Core Library
//!
//! Client-side building blocks for a library-catalog REST API: typed
//! entities, form drafts with validation, a session store that persists the
//! bearer token, and the load → edit → submit cycle shared by every page.

pub mod api;
pub mod config;
pub mod error;
pub mod fetch;
pub mod form;
pub mod list;
pub mod session;
pub mod submit;
pub mod types;

pub use api::ApiClient;
pub use config::ClientConfig;
pub use error::{Result, ShelfmarkError, StorageError};
pub use form::{
    AuthorDraft, BookDraft, CategoryDraft, CategoryEntry, Credentials, FormPhase, FormState,
    Validate, ValidationErrors,
};
pub use list::{DeleteOutcome, ListView, Searchable};
pub use session::{FileTokenStorage, Session, SessionStore, TokenStorage};
pub use submit::{SubmitOutcome, SubmitTarget};
pub use types::{Author, Book, BookCategory, Category};
