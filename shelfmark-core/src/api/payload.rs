//! Request bodies for write endpoints
//!
//! Book writes go through a single encoder: JSON by default, multipart when
//! the draft carries a cover image.

use crate::error::{Result, ShelfmarkError};
use crate::form::{non_empty, BookDraft, CategoryEntry, ALLOWED_COVER_EXTENSIONS};
use reqwest::multipart::{Form, Part};
use reqwest::RequestBuilder;
use serde::Serialize;
use std::path::Path;

/// Multipart field name the catalog reads the cover from
pub const COVER_FIELD: &str = "cover_image";

/// An encoded request body
#[derive(Debug, Clone)]
pub enum Payload {
    Json(serde_json::Value),
    Multipart(MultipartBody),
}

/// Text fields plus an optional file part
#[derive(Debug, Clone, Default)]
pub struct MultipartBody {
    pub fields: Vec<(String, String)>,
    pub attachment: Option<Attachment>,
}

/// A file to upload
#[derive(Debug, Clone)]
pub struct Attachment {
    pub field: String,
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl Attachment {
    /// Read an image from disk, checking its extension
    pub async fn from_path(field: &str, path: &Path) -> Result<Self> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ShelfmarkError::Attachment("Invalid image file name".to_string()))?
            .to_string();

        let mime = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(mime_for_extension)
            .ok_or_else(|| ShelfmarkError::Attachment("Invalid image format".to_string()))?;

        let bytes = tokio::fs::read(path).await.map_err(|e| {
            ShelfmarkError::Attachment(format!("Could not read {}: {}", path.display(), e))
        })?;

        Ok(Self {
            field: field.to_string(),
            file_name,
            mime,
            bytes,
        })
    }
}

/// MIME type for an accepted cover extension
pub fn mime_for_extension(ext: &str) -> Option<&'static str> {
    let ext = ext.to_lowercase();
    if !ALLOWED_COVER_EXTENSIONS.contains(&ext.as_str()) {
        return None;
    }
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}

/// JSON shape of a book write
#[derive(Debug, Serialize)]
struct BookBody<'a> {
    title: &'a str,
    isbn: Option<&'a str>,
    publication_year: Option<i32>,
    pages: Option<i32>,
    description: Option<&'a str>,
    author_id: Option<i64>,
    categories: &'a [CategoryEntry],
}

impl<'a> From<&'a BookDraft> for BookBody<'a> {
    fn from(draft: &'a BookDraft) -> Self {
        Self {
            title: &draft.title,
            isbn: non_empty(&draft.isbn),
            publication_year: draft.publication_year,
            pages: draft.pages,
            description: non_empty(&draft.description),
            author_id: draft.author_id,
            categories: &draft.categories,
        }
    }
}

/// Encode a book draft as JSON, ignoring any cover
pub fn book_json(draft: &BookDraft) -> Result<Payload> {
    json_payload(&BookBody::from(draft))
}

/// Encode a book draft, reading the cover from disk when one is attached
pub async fn book_payload(draft: &BookDraft) -> Result<Payload> {
    let Some(cover) = &draft.cover else {
        return book_json(draft);
    };
    let body = BookBody::from(draft);

    let mut fields = vec![("title".to_string(), body.title.to_string())];
    let mut optional = |name: &str, value: Option<String>| {
        if let Some(value) = value {
            fields.push((name.to_string(), value));
        }
    };
    optional("author_id", body.author_id.map(|v| v.to_string()));
    optional("isbn", body.isbn.map(str::to_string));
    optional("publication_year", body.publication_year.map(|v| v.to_string()));
    optional("pages", body.pages.map(|v| v.to_string()));
    optional("description", body.description.map(str::to_string));

    // The catalog parses this field as a JSON document
    let categories = serde_json::to_string(body.categories)
        .map_err(|e| ShelfmarkError::Decode(e.to_string()))?;
    fields.push(("categories".to_string(), categories));

    let attachment = Attachment::from_path(COVER_FIELD, cover).await?;
    tracing::debug!(
        "Attaching {} ({} bytes) as {}",
        attachment.file_name,
        attachment.bytes.len(),
        attachment.mime
    );

    Ok(Payload::Multipart(MultipartBody {
        fields,
        attachment: Some(attachment),
    }))
}

/// Encode any serializable draft as JSON
pub fn json_payload<T: Serialize>(value: &T) -> Result<Payload> {
    serde_json::to_value(value)
        .map(Payload::Json)
        .map_err(|e| ShelfmarkError::Decode(e.to_string()))
}

impl Payload {
    /// Attach this body to a request
    pub(crate) fn apply(self, request: RequestBuilder) -> Result<RequestBuilder> {
        match self {
            Self::Json(value) => Ok(request.json(&value)),
            Self::Multipart(body) => {
                let mut form = Form::new();
                for (name, value) in body.fields {
                    form = form.text(name, value);
                }
                if let Some(attachment) = body.attachment {
                    let part = Part::bytes(attachment.bytes)
                        .file_name(attachment.file_name)
                        .mime_str(attachment.mime)
                        .map_err(|e| ShelfmarkError::Attachment(e.to_string()))?;
                    form = form.part(attachment.field, part);
                }
                Ok(request.multipart(form))
            }
        }
    }
}
