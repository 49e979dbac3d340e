//! Durable storage for the session token

use crate::error::StorageError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

/// Result type for token storage operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Where the bearer token survives between runs
#[async_trait]
pub trait TokenStorage: Send + Sync {
    /// The stored token, if any
    async fn load(&self) -> StorageResult<Option<String>>;

    /// Replace the stored token
    async fn save(&self, token: &str) -> StorageResult<()>;

    /// Forget the stored token. Clearing an empty store succeeds.
    async fn clear(&self) -> StorageResult<()>;
}

/// Token kept in a single file holding the raw token string
pub struct FileTokenStorage {
    path: PathBuf,
}

impl FileTokenStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TokenStorage for FileTokenStorage {
    async fn load(&self) -> StorageResult<Option<String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(data) => {
                let token = data.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Read(e.to_string())),
        }
    }

    /// Writes to a temp file then renames to avoid partial writes
    async fn save(&self, token: &str) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| StorageError::Write(e.to_string()))?;
            }
        }

        let temp_path = self.path.with_extension("tmp");
        tokio::fs::write(&temp_path, token)
            .await
            .map_err(|e| StorageError::Write(e.to_string()))?;
        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| StorageError::Write(e.to_string()))
    }

    async fn clear(&self) -> StorageResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Clear(e.to_string())),
        }
    }
}

/// In-memory token storage (for testing)
#[derive(Default)]
pub struct MemoryTokenStorage {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that already holds a token, as after a previous run
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }

    /// Current contents without going through the async trait
    pub fn peek(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl TokenStorage for MemoryTokenStorage {
    async fn load(&self) -> StorageResult<Option<String>> {
        Ok(self.peek())
    }

    async fn save(&self, token: &str) -> StorageResult<()> {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token.to_string());
        Ok(())
    }

    async fn clear(&self) -> StorageResult<()> {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}
