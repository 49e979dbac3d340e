//! Error types for Shelfmark Core

use crate::form::ValidationErrors;
use thiserror::Error;

/// Result type alias using ShelfmarkError
pub type Result<T> = std::result::Result<T, ShelfmarkError>;

/// Message shown in the general error slot when the transport fails
pub const NETWORK_ERROR_MESSAGE: &str = "Network error occurred";

/// Top-level error type for all Shelfmark operations
#[derive(Debug, Error)]
pub enum ShelfmarkError {
    /// Client-side validation failed; nothing was sent
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// The server answered with a non-success status
    #[error("Request rejected ({status}): {}", message.as_deref().unwrap_or("no message"))]
    Rejected {
        status: u16,
        message: Option<String>,
    },

    /// The request never produced a response
    #[error("Network error: {0}")]
    Network(String),

    /// A success response carried a body we could not decode
    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Attachment error: {0}")]
    Attachment(String),

    #[error("Session storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ShelfmarkError {
    /// Message for the general error slot of a form.
    ///
    /// Server rejections carry their own message when the payload had one;
    /// otherwise `fallback` is used. Transport failures always map to the
    /// generic network message. Attachment and token-storage failures keep
    /// their own text.
    pub fn general_message(&self, fallback: &str) -> String {
        match self {
            Self::Rejected {
                message: Some(message),
                ..
            } => message.clone(),
            Self::Network(_) => NETWORK_ERROR_MESSAGE.to_string(),
            Self::Attachment(message) => message.clone(),
            Self::Storage(e) => e.to_string(),
            _ => fallback.to_string(),
        }
    }
}

impl From<ValidationErrors> for ShelfmarkError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

/// Errors from durable token storage
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to read token: {0}")]
    Read(String),

    #[error("Failed to write token: {0}")]
    Write(String),

    #[error("Failed to clear token: {0}")]
    Clear(String),
}
