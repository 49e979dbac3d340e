//! CLI command implementations

mod auth;
mod authors;
mod books;
mod categories;

pub use auth::{login, logout, register, whoami};
pub use authors::{add_author, list_authors};
pub use books::{add_book, delete_book, edit_book, list_books, show_book};
pub use categories::{add_category, list_categories};

use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use shelfmark_core::{
    ApiClient, ClientConfig, FileTokenStorage, FormState, SessionStore, ShelfmarkError,
    SubmitOutcome, Validate, ValidationErrors,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Client handles shared by every command
pub struct App {
    pub api: ApiClient,
    pub session: SessionStore,
    pub session_path: PathBuf,
}

impl App {
    /// Resolve configuration, restore any stored session and attach it
    pub async fn init(api_url: Option<String>, session_file: Option<PathBuf>) -> Result<Self> {
        let config = ClientConfig::resolve(api_url, session_file)?;
        tracing::debug!(
            "Using {} with session file {}",
            config.api_url,
            config.session_path.display()
        );

        let mut api = ApiClient::from_config(&config)
            .with_context(|| format!("Invalid API URL: {}", config.api_url))?;

        let storage = Arc::new(FileTokenStorage::new(config.session_path.clone()));
        let session = SessionStore::restore(storage)
            .await
            .context("Failed to restore session")?;
        session.attach(&mut api);

        Ok(Self {
            api,
            session,
            session_path: config.session_path,
        })
    }
}

/// Loading indicator shown while a request is in flight
fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(message.to_string());
    pb
}

/// One line per field on stderr
fn print_field_errors(errors: &ValidationErrors) {
    for error in errors.iter() {
        eprintln!("  {}: {}", error.field, error.message);
    }
}

/// Turn a library error into the message the user sees
fn report(error: ShelfmarkError, fallback: &str) -> anyhow::Error {
    match error {
        ShelfmarkError::Validation(errors) => {
            print_field_errors(&errors);
            anyhow!("Invalid input")
        }
        other => anyhow!(other.general_message(fallback)),
    }
}

/// Unwrap a submission, surfacing field or general errors
fn finish<D: Validate, T>(form: &FormState<D>, outcome: SubmitOutcome<T>) -> Result<T> {
    match outcome {
        SubmitOutcome::Saved(value) => Ok(value),
        SubmitOutcome::Invalid => {
            print_field_errors(form.errors());
            Err(anyhow!("Invalid input"))
        }
        SubmitOutcome::Failed(message) => Err(anyhow!(message)),
        SubmitOutcome::Busy => Err(anyhow!("A submission is already in progress")),
    }
}

/// Warn on stderr that a read failed and the page is showing nothing
fn notice_unavailable(what: &str) {
    eprintln!("Could not load {}; showing an empty list", what);
}
