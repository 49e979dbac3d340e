//! Client configuration

use crate::error::{Result, ShelfmarkError};
use directories::ProjectDirs;
use std::path::PathBuf;

/// Environment variable overriding where the session token is kept
pub const SESSION_PATH_ENV: &str = "SHELFMARK_SESSION_PATH";

/// Base URL used when nothing else is configured
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";

/// Where to reach the catalog and where to keep the token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
    pub session_path: PathBuf,
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>, session_path: impl Into<PathBuf>) -> Self {
        Self {
            api_url: api_url.into(),
            session_path: session_path.into(),
        }
    }

    /// Resolve from explicit overrides; `None` means use the default
    pub fn resolve(api_url: Option<String>, session_path: Option<PathBuf>) -> Result<Self> {
        let api_url = api_url
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let session_path = match session_path {
            Some(path) => path,
            None => default_session_path()?,
        };

        Ok(Self {
            api_url,
            session_path,
        })
    }
}

/// `<data dir>/shelfmark/token` on the current platform
pub fn default_session_path() -> Result<PathBuf> {
    ProjectDirs::from("", "", "shelfmark")
        .map(|dirs| dirs.data_dir().join("token"))
        .ok_or_else(|| {
            ShelfmarkError::Config(format!(
                "Could not determine a data directory; set {}",
                SESSION_PATH_ENV
            ))
        })
}
