//! Session store: the bearer token and its lifecycle
//!
//! A [`SessionStore`] is created with [`SessionStore::restore`] (reads any
//! token left by a previous run) and torn down with
//! [`SessionStore::logout`] (clears memory and durable storage). It is passed
//! explicitly to whatever needs it; there is no process-wide token.

mod storage;

pub use storage::{FileTokenStorage, MemoryTokenStorage, StorageResult, TokenStorage};

use crate::api::ApiClient;
use crate::error::Result;
use crate::form::{Credentials, Validate};
use std::sync::Arc;

/// Proof of authentication held by the client
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,

    /// Known after a login in this process; only the token is persisted
    pub username: Option<String>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &"***")
            .field("username", &self.username)
            .finish()
    }
}

/// Current session plus the storage it persists to
pub struct SessionStore {
    storage: Arc<dyn TokenStorage>,
    current: Option<Session>,
}

impl SessionStore {
    /// Restore a prior session from durable storage, if one exists.
    ///
    /// No expiry check happens here; a stale token fails at the first
    /// protected request.
    pub async fn restore(storage: Arc<dyn TokenStorage>) -> Result<Self> {
        let current = storage.load().await?.map(|token| Session {
            token,
            username: None,
        });

        if current.is_some() {
            tracing::debug!("Restored session token from storage");
        }

        Ok(Self { storage, current })
    }

    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    /// Attach the current credential to `api`, or detach if there is none
    pub fn attach(&self, api: &mut ApiClient) {
        api.set_bearer(self.current.as_ref().map(|s| s.token.clone()));
    }

    /// Create an account. Returns the server's message; does not log in.
    pub async fn register(&self, api: &ApiClient, credentials: &Credentials) -> Result<String> {
        credentials.validate()?;

        let response = api.register(credentials).await?;
        tracing::info!("Registered user '{}'", credentials.username);
        Ok(response
            .message
            .unwrap_or_else(|| "User registered successfully".to_string()))
    }

    /// Log in, persist the token and attach it to `api`
    pub async fn login(&mut self, api: &mut ApiClient, credentials: &Credentials) -> Result<&Session> {
        credentials.validate()?;

        let response = api.login(credentials).await?;
        self.storage.save(&response.access_token).await?;
        api.set_bearer(Some(response.access_token.clone()));

        tracing::info!("Logged in as '{}'", credentials.username);
        Ok(self.current.insert(Session {
            token: response.access_token,
            username: Some(credentials.username.clone()),
        }))
    }

    /// Forget the session everywhere: memory, storage and `api`
    pub async fn logout(&mut self, api: &mut ApiClient) -> Result<()> {
        self.current = None;
        api.set_bearer(None);
        self.storage.clear().await?;
        tracing::info!("Logged out");
        Ok(())
    }
}
