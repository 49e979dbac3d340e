//! REST client for the catalog API
//!
//! One method per endpoint. The bearer token, when attached, rides on every
//! request. There are no retries and no timeouts beyond reqwest's defaults.

pub mod payload;

pub use payload::{book_json, book_payload, json_payload, Attachment, MultipartBody, Payload};

use crate::config::ClientConfig;
use crate::error::{Result, ShelfmarkError};
use crate::form::{AuthorDraft, CategoryDraft, Credentials};
use crate::types::{Author, Book, Category};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Body of a failed request
#[derive(Debug, Default, Deserialize)]
struct ErrorPayload {
    error: Option<String>,
    message: Option<String>,
}

/// Successful `/api/login` response
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,

    #[serde(default)]
    pub message: Option<String>,
}

/// Response carrying only a human-readable message
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// HTTP client bound to one catalog server
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    bearer: Option<String>,
}

impl ApiClient {
    /// Create a client for `base_url` (scheme and host, no `/api` suffix)
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ShelfmarkError::Config(format!(
                "API URL must start with http:// or https://, got '{}'",
                base_url
            )));
        }

        let http = reqwest::Client::builder()
            .user_agent(concat!("shelfmark/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ShelfmarkError::Config(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            bearer: None,
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::new(config.api_url.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Attach (or with `None`, remove) the bearer credential
    pub fn set_bearer(&mut self, token: Option<String>) {
        self.bearer = token;
    }

    pub fn bearer(&self) -> Option<&str> {
        self.bearer.as_deref()
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("{} {}", method, url);

        let request = self.http.request(method, url);
        match &self.bearer {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Send a request and map non-success statuses to `Rejected`
    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| ShelfmarkError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        // Bodies of failed requests may be HTML error pages
        let text = response.text().await.unwrap_or_default();
        let payload: ErrorPayload = serde_json::from_str(&text).unwrap_or_default();
        let message = payload.error.or(payload.message);
        tracing::warn!("Request failed with {}: {:?}", status, message);

        Err(ShelfmarkError::Rejected {
            status: status.as_u16(),
            message,
        })
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = self.send(request).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ShelfmarkError::Decode(e.to_string()))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send_json(self.request(Method::GET, path)).await
    }

    async fn write<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        payload: Payload,
    ) -> Result<T> {
        let request = payload.apply(self.request(method, path))?;
        self.send_json(request).await
    }

    // Books

    pub async fn list_books(&self) -> Result<Vec<Book>> {
        self.get("/api/books").await
    }

    pub async fn get_book(&self, id: i64) -> Result<Book> {
        self.get(&format!("/api/books/{}", id)).await
    }

    pub async fn create_book(&self, payload: Payload) -> Result<Book> {
        self.write(Method::POST, "/api/books", payload).await
    }

    pub async fn update_book(&self, id: i64, payload: Payload) -> Result<Book> {
        self.write(Method::PUT, &format!("/api/books/{}", id), payload)
            .await
    }

    pub async fn delete_book(&self, id: i64) -> Result<()> {
        self.send(self.request(Method::DELETE, &format!("/api/books/{}", id)))
            .await?;
        Ok(())
    }

    // Authors

    pub async fn list_authors(&self) -> Result<Vec<Author>> {
        self.get("/api/authors").await
    }

    pub async fn create_author(&self, draft: &AuthorDraft) -> Result<Author> {
        self.write(Method::POST, "/api/authors", json_payload(draft)?)
            .await
    }

    // Categories

    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        self.get("/api/categories").await
    }

    pub async fn create_category(&self, draft: &CategoryDraft) -> Result<Category> {
        self.write(Method::POST, "/api/categories", json_payload(draft)?)
            .await
    }

    // Auth

    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse> {
        self.write(Method::POST, "/api/login", json_payload(credentials)?)
            .await
    }

    pub async fn register(&self, credentials: &Credentials) -> Result<MessageResponse> {
        self.write(Method::POST, "/api/register", json_payload(credentials)?)
            .await
    }
}
