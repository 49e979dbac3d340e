//! End-to-end tests for the catalog client
//!
//! Each test starts an in-process stub of the catalog API on an ephemeral
//! port. The stub records every request it receives so tests can check
//! exactly what went over the wire.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::{json, Value};
use shelfmark_core::fetch::{load_book_form, load_books, or_empty};
use shelfmark_core::session::MemoryTokenStorage;
use shelfmark_core::submit::{submit_author, submit_book};
use shelfmark_core::{
    ApiClient, AuthorDraft, BookDraft, CategoryEntry, Credentials, DeleteOutcome,
    FileTokenStorage, FormPhase, FormState, ListView, SessionStore, ShelfmarkError,
    SubmitOutcome, SubmitTarget, TokenStorage,
};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

// =============================================================================
// Stub backend
// =============================================================================

/// One request as seen by the stub
#[derive(Debug, Clone)]
struct Recorded {
    method: Method,
    path: String,
    authorization: Option<String>,
    content_type: Option<String>,
    body: Vec<u8>,
}

#[derive(Clone, Default)]
struct Stub {
    requests: Arc<Mutex<Vec<Recorded>>>,
    /// GET paths that answer 500
    failing: Arc<Mutex<Vec<String>>>,
}

impl Stub {
    fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    fn requests_to(&self, method: Method, path: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }

    fn fail_get(&self, path: &str) {
        self.failing.lock().unwrap().push(path.to_string());
    }
}

fn book_json(id: i64, title: &str, author_id: i64, author_name: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "isbn": null,
        "publication_year": null,
        "pages": null,
        "description": null,
        "cover_image": null,
        "author_id": author_id,
        "author_name": author_name,
        "created_at": "2024-05-01T10:20:30.000001",
        "updated_at": "2024-05-01T10:20:30.000001",
        "categories": []
    })
}

fn seeded_books() -> Value {
    json!([
        book_json(1, "Emma", 1, "Jane Austen"),
        book_json(2, "Animal Farm", 2, "George Orwell"),
        book_json(3, "Nineteen Eighty-Four", 2, "George Orwell"),
    ])
}

fn reply(status: StatusCode, body: Value) -> Response {
    (status, Json(body)).into_response()
}

async fn handle(
    State(stub): State<Stub>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();
    let header_value = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let recorded = Recorded {
        method: method.clone(),
        path: path.clone(),
        authorization: header_value(header::AUTHORIZATION),
        content_type: header_value(header::CONTENT_TYPE),
        body: body.to_vec(),
    };
    let authorized = recorded.authorization.as_deref() == Some("Bearer tok-123");
    let is_multipart = recorded
        .content_type
        .as_deref()
        .map(|c| c.starts_with("multipart/form-data"))
        .unwrap_or(false);
    stub.requests.lock().unwrap().push(recorded);

    if method == Method::GET && stub.failing.lock().unwrap().contains(&path) {
        return reply(StatusCode::INTERNAL_SERVER_ERROR, json!({"error": "boom"}));
    }

    let json_body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let protected = matches!(method, Method::POST | Method::PUT | Method::DELETE)
        && path.starts_with("/api/books");
    if protected && !authorized {
        return reply(
            StatusCode::UNAUTHORIZED,
            json!({"msg": "Missing Authorization Header"}),
        );
    }

    match (method, path.as_str()) {
        (Method::POST, "/api/login") => {
            if json_body["password"] == "secret" {
                reply(
                    StatusCode::OK,
                    json!({"access_token": "tok-123", "user": {"id": 1, "username": json_body["username"]}}),
                )
            } else {
                reply(StatusCode::UNAUTHORIZED, json!({"error": "Invalid credentials"}))
            }
        }
        (Method::POST, "/api/register") => {
            if json_body["username"] == "taken" {
                reply(StatusCode::CONFLICT, json!({"error": "Username already taken"}))
            } else {
                reply(StatusCode::CREATED, json!({"message": "User registered successfully"}))
            }
        }
        (Method::GET, "/api/books") => reply(StatusCode::OK, seeded_books()),
        (Method::GET, "/api/books/1") => {
            let mut book = book_json(1, "Emma", 1, "Jane Austen");
            book["categories"] = json!([{"category_id": 2, "priority": 2, "notes": null}]);
            reply(StatusCode::OK, book)
        }
        (Method::POST, "/api/books") => {
            if is_multipart {
                return reply(StatusCode::CREATED, book_json(10, "With Cover", 1, "Jane Austen"));
            }
            if json_body["title"] == "Reject me" {
                return reply(StatusCode::BAD_REQUEST, json!({"error": "X"}));
            }
            let title = json_body["title"].as_str().unwrap_or_default();
            reply(StatusCode::CREATED, book_json(11, title, 1, "Jane Austen"))
        }
        (Method::PUT, "/api/books/1") => reply(StatusCode::OK, book_json(1, "Emma (revised)", 1, "Jane Austen")),
        (Method::PUT, _) => (StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>").into_response(),
        (Method::DELETE, "/api/books/2") => {
            reply(StatusCode::OK, json!({"message": "Book deleted successfully"}))
        }
        (Method::DELETE, _) => reply(StatusCode::NOT_FOUND, json!({"error": "Not found"})),
        (Method::GET, "/api/authors") => reply(
            StatusCode::OK,
            json!([
                {"id": 1, "name": "Jane Austen", "email": "jane@example.com", "birth_year": 1775, "book_count": 1},
                {"id": 2, "name": "George Orwell", "email": "george@example.com", "birth_year": 1903, "book_count": 2}
            ]),
        ),
        (Method::POST, "/api/authors") => reply(
            StatusCode::CREATED,
            json!({"id": 3, "name": json_body["name"], "email": json_body["email"], "birth_year": json_body["birth_year"], "book_count": 0}),
        ),
        (Method::GET, "/api/categories") => reply(
            StatusCode::OK,
            json!([
                {"id": 1, "name": "Fiction", "description": "Fictional works and novels"},
                {"id": 2, "name": "Classic", "description": "Classic literature"}
            ]),
        ),
        _ => reply(StatusCode::NOT_FOUND, json!({"error": "Not found"})),
    }
}

/// Start the stub and return it with its base URL
async fn start_stub() -> (Stub, String) {
    let stub = Stub::default();
    let app = Router::new().fallback(handle).with_state(stub.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (stub, format!("http://{}", addr))
}

/// A client already logged in against the stub
async fn logged_in_client(url: &str) -> (ApiClient, SessionStore) {
    let mut api = ApiClient::new(url).unwrap();
    let mut store = SessionStore::restore(Arc::new(MemoryTokenStorage::new()))
        .await
        .unwrap();
    store
        .login(&mut api, &Credentials::new("admin", "secret"))
        .await
        .unwrap();
    (api, store)
}

/// A base URL nothing listens on
async fn dead_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

// =============================================================================
// Session
// =============================================================================

#[tokio::test]
async fn test_login_attaches_bearer_and_logout_removes_it() {
    let (stub, url) = start_stub().await;
    let dir = TempDir::new().unwrap();
    let storage = Arc::new(FileTokenStorage::new(dir.path().join("token")));

    let mut api = ApiClient::new(&url).unwrap();
    let mut store = SessionStore::restore(storage.clone()).await.unwrap();

    let session = store
        .login(&mut api, &Credentials::new("admin", "secret"))
        .await
        .unwrap();
    assert_eq!(session.token, "tok-123");
    assert_eq!(session.username.as_deref(), Some("admin"));
    assert_eq!(storage.load().await.unwrap().as_deref(), Some("tok-123"));

    api.list_books().await.unwrap();
    let first = stub.requests_to(Method::GET, "/api/books");
    assert_eq!(first[0].authorization.as_deref(), Some("Bearer tok-123"));

    store.logout(&mut api).await.unwrap();
    assert_eq!(storage.load().await.unwrap(), None);

    api.list_books().await.unwrap();
    let after = stub.requests_to(Method::GET, "/api/books");
    assert_eq!(after.len(), 2);
    assert_eq!(after[1].authorization, None);
}

#[tokio::test]
async fn test_login_failure_surfaces_server_message() {
    let (_stub, url) = start_stub().await;
    let storage = Arc::new(MemoryTokenStorage::new());
    let mut api = ApiClient::new(&url).unwrap();
    let mut store = SessionStore::restore(storage.clone()).await.unwrap();

    let err = store
        .login(&mut api, &Credentials::new("admin", "wrong"))
        .await
        .unwrap_err();

    match err {
        ShelfmarkError::Rejected { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message.as_deref(), Some("Invalid credentials"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(!store.is_authenticated());
    assert_eq!(api.bearer(), None);
    assert_eq!(storage.peek(), None);
}

#[tokio::test]
async fn test_login_with_unwritable_storage_reports_storage_error() {
    let (_stub, url) = start_stub().await;
    let dir = TempDir::new().unwrap();
    let parent = dir.path().join("session");
    let storage = Arc::new(FileTokenStorage::new(parent.join("token")));

    let mut api = ApiClient::new(&url).unwrap();
    let mut store = SessionStore::restore(storage).await.unwrap();

    // A plain file where the token's directory should go
    std::fs::write(&parent, "not a directory").unwrap();

    let err = store
        .login(&mut api, &Credentials::new("admin", "secret"))
        .await
        .unwrap_err();

    assert!(matches!(err, ShelfmarkError::Storage(_)));
    let message = err.general_message("Login failed. Please check your credentials.");
    assert!(message.starts_with("Failed to write token"));
    assert!(!store.is_authenticated());
    assert_eq!(api.bearer(), None);
}

#[tokio::test]
async fn test_restored_token_is_sent() {
    let (stub, url) = start_stub().await;
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("token");
    std::fs::write(&path, "tok-123\n").unwrap();

    let store = SessionStore::restore(Arc::new(FileTokenStorage::new(path)))
        .await
        .unwrap();
    let mut api = ApiClient::new(&url).unwrap();
    store.attach(&mut api);

    let mut form = FormState::new(BookDraft::new("Persuasion", 1));
    let outcome = submit_book(&api, &mut form, SubmitTarget::Create).await;

    assert!(matches!(outcome, SubmitOutcome::Saved(_)));
    let posts = stub.requests_to(Method::POST, "/api/books");
    assert_eq!(posts[0].authorization.as_deref(), Some("Bearer tok-123"));
}

#[tokio::test]
async fn test_register() {
    let (stub, url) = start_stub().await;
    let api = ApiClient::new(&url).unwrap();
    let store = SessionStore::restore(Arc::new(MemoryTokenStorage::new()))
        .await
        .unwrap();

    let message = store
        .register(&api, &Credentials::new("reader", "pw"))
        .await
        .unwrap();
    assert_eq!(message, "User registered successfully");
    assert!(!store.is_authenticated());

    let err = store
        .register(&api, &Credentials::new("taken", "pw"))
        .await
        .unwrap_err();
    assert_eq!(err.general_message("fallback"), "Username already taken");

    let bodies = stub.requests_to(Method::POST, "/api/register");
    let sent: Value = serde_json::from_slice(&bodies[0].body).unwrap();
    assert_eq!(sent, json!({"username": "reader", "password": "pw"}));
}

// =============================================================================
// Submit
// =============================================================================

#[tokio::test]
async fn test_create_book_success_navigates_away() {
    let (stub, url) = start_stub().await;
    let (api, _store) = logged_in_client(&url).await;

    let mut draft = BookDraft::new("Persuasion", 1);
    draft.isbn = Some("978-0-14-143951-8".to_string());
    draft.categories.push(CategoryEntry::new(2, 1, ""));
    let mut form = FormState::new(draft);

    let outcome = submit_book(&api, &mut form, SubmitTarget::Create).await;

    let book = outcome.saved().expect("book saved");
    assert_eq!(book.title, "Persuasion");
    assert_eq!(form.phase(), FormPhase::NavigatedAway);

    let posts = stub.requests_to(Method::POST, "/api/books");
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].content_type.as_deref(), Some("application/json"));
    let sent: Value = serde_json::from_slice(&posts[0].body).unwrap();
    assert_eq!(sent["isbn"], "978-0-14-143951-8");
    assert_eq!(sent["categories"][0]["category_id"], 2);
}

#[tokio::test]
async fn test_rejected_create_shows_server_error_exactly() {
    let (_stub, url) = start_stub().await;
    let (api, _store) = logged_in_client(&url).await;
    let mut form = FormState::new(BookDraft::new("Reject me", 1));

    let outcome = submit_book(&api, &mut form, SubmitTarget::Create).await;

    assert_eq!(outcome, SubmitOutcome::Failed("X".to_string()));
    assert_eq!(form.general_error(), Some("X"));
    assert_eq!(form.phase(), FormPhase::IdleWithGeneralError);
}

#[tokio::test]
async fn test_rejection_without_payload_uses_default_message() {
    let (_stub, url) = start_stub().await;
    let (api, _store) = logged_in_client(&url).await;
    let mut form = FormState::new(BookDraft::new("Emma", 1));

    let outcome = submit_book(&api, &mut form, SubmitTarget::Update(500)).await;

    assert_eq!(outcome, SubmitOutcome::Failed("Failed to update book".to_string()));
}

#[tokio::test]
async fn test_unauthenticated_write_is_rejected() {
    let (_stub, url) = start_stub().await;
    let api = ApiClient::new(&url).unwrap();
    let mut form = FormState::new(BookDraft::new("Emma", 1));

    let outcome = submit_book(&api, &mut form, SubmitTarget::Create).await;

    // The stub answers with `msg`, which is not a message field we read
    assert_eq!(outcome, SubmitOutcome::Failed("Failed to create book".to_string()));
}

#[tokio::test]
async fn test_network_failure_sets_generic_message() {
    let api = ApiClient::new(dead_url().await).unwrap();
    let mut form = FormState::new(AuthorDraft::new("Jane Austen"));

    let outcome = submit_author(&api, &mut form).await;

    assert_eq!(outcome, SubmitOutcome::Failed("Network error occurred".to_string()));
    assert_eq!(form.general_error(), Some("Network error occurred"));
}

#[tokio::test]
async fn test_invalid_submission_sends_nothing() {
    let (stub, url) = start_stub().await;
    let api = ApiClient::new(&url).unwrap();

    for title in [String::new(), "t".repeat(201)] {
        let mut form = FormState::new(BookDraft::new(title, 1));
        let outcome = submit_book(&api, &mut form, SubmitTarget::Create).await;
        assert_eq!(outcome, SubmitOutcome::Invalid);
    }

    let mut draft = BookDraft::new("Emma", 1);
    draft.isbn = Some("12-34".to_string());
    let mut form = FormState::new(draft);
    assert_eq!(
        submit_book(&api, &mut form, SubmitTarget::Create).await,
        SubmitOutcome::Invalid
    );

    assert!(stub.requests().is_empty());
}

#[tokio::test]
async fn test_cover_image_switches_to_multipart() {
    let (stub, url) = start_stub().await;
    let (api, _store) = logged_in_client(&url).await;

    let dir = TempDir::new().unwrap();
    let cover = dir.path().join("cover.png");
    std::fs::write(&cover, b"\x89PNG fake image").unwrap();

    let mut draft = BookDraft::new("With Cover", 1);
    draft.categories.push(CategoryEntry::new(1, 3, "first"));
    draft.cover = Some(cover);
    let mut form = FormState::new(draft);

    let outcome = submit_book(&api, &mut form, SubmitTarget::Create).await;
    assert_eq!(outcome.saved().map(|b| b.id), Some(10));

    let posts = stub.requests_to(Method::POST, "/api/books");
    assert_eq!(posts.len(), 1);
    assert!(posts[0]
        .content_type
        .as_deref()
        .unwrap()
        .starts_with("multipart/form-data"));

    let body = String::from_utf8_lossy(&posts[0].body);
    assert!(body.contains(r#"name="title""#));
    assert!(body.contains(r#"name="cover_image""#));
    assert!(body.contains(r#"filename="cover.png""#));
    assert!(body.contains(r#"[{"category_id":1,"priority":3,"notes":"first"}]"#));
}

#[tokio::test]
async fn test_edit_book_round() {
    let (stub, url) = start_stub().await;
    let (api, _store) = logged_in_client(&url).await;

    let data = load_book_form(&api, Some(1)).await.unwrap();
    let book = data.book.expect("book loaded");
    let mut form = FormState::new(BookDraft::from_book(&book));
    assert_eq!(form.values().categories, vec![CategoryEntry::new(2, 2, "")]);

    form.edit(|d| d.title = "Emma (revised)".to_string());
    let outcome = submit_book(&api, &mut form, SubmitTarget::Update(1)).await;

    assert_eq!(outcome.saved().map(|b| b.title), Some("Emma (revised)".to_string()));
    let puts = stub.requests_to(Method::PUT, "/api/books/1");
    assert_eq!(puts.len(), 1);
    assert_eq!(puts[0].content_type.as_deref(), Some("application/json"));
}

#[tokio::test]
async fn test_update_never_sends_multipart() {
    let (stub, url) = start_stub().await;
    let (api, _store) = logged_in_client(&url).await;

    let dir = TempDir::new().unwrap();
    let cover = dir.path().join("c.png");
    std::fs::write(&cover, b"\x89PNG fake image").unwrap();

    let mut draft = BookDraft::new("Emma", 1);
    draft.cover = Some(cover);
    let mut form = FormState::new(draft);

    let outcome = submit_book(&api, &mut form, SubmitTarget::Update(1)).await;

    assert!(matches!(outcome, SubmitOutcome::Failed(_)));
    assert!(stub.requests_to(Method::PUT, "/api/books/1").is_empty());

    // Dropping the cover lets the same form go through as JSON
    form.edit(|d| d.cover = None);
    let outcome = submit_book(&api, &mut form, SubmitTarget::Update(1)).await;
    assert!(outcome.saved().is_some());

    let puts = stub.requests_to(Method::PUT, "/api/books/1");
    assert_eq!(puts.len(), 1);
    assert_eq!(puts[0].content_type.as_deref(), Some("application/json"));
}

#[tokio::test]
async fn test_created_author_is_appended() {
    let (_stub, url) = start_stub().await;
    let api = ApiClient::new(&url).unwrap();
    let mut authors = ListView::new(api.list_authors().await.unwrap());

    let mut draft = AuthorDraft::new("Mary Shelley");
    draft.birth_year = Some(1797);
    let mut form = FormState::new(draft);

    if let SubmitOutcome::Saved(author) = submit_author(&api, &mut form).await {
        authors.push(author);
    }

    assert_eq!(authors.len(), 3);
    assert_eq!(authors.items()[2].name, "Mary Shelley");
    assert_eq!(authors.items()[2].birth_year, Some(1797));
}

// =============================================================================
// Fetch + list
// =============================================================================

#[tokio::test]
async fn test_form_data_joins_parallel_reads() {
    let (stub, url) = start_stub().await;
    let api = ApiClient::new(&url).unwrap();

    let data = load_book_form(&api, None).await.unwrap();

    assert!(data.book.is_none());
    assert_eq!(data.authors.len(), 2);
    assert_eq!(data.categories.len(), 2);
    assert_eq!(stub.requests().len(), 2);
}

#[tokio::test]
async fn test_form_data_fails_as_a_whole() {
    let (stub, url) = start_stub().await;
    stub.fail_get("/api/categories");
    let api = ApiClient::new(&url).unwrap();

    let result = load_book_form(&api, Some(1)).await;
    assert!(matches!(result, Err(ShelfmarkError::Rejected { status: 500, .. })));

    let degraded = or_empty(result.map(|d| d.authors), "form data");
    assert!(degraded.is_empty());
}

#[tokio::test]
async fn test_read_failure_degrades_to_empty_list() {
    let api = ApiClient::new(dead_url().await).unwrap();
    let books = or_empty(load_books(&api).await, "books");
    assert!(ListView::new(books).is_empty());
}

#[tokio::test]
async fn test_delete_removes_exactly_one_book() {
    let (stub, url) = start_stub().await;
    let (api, _store) = logged_in_client(&url).await;
    let mut books = ListView::new(load_books(&api).await.unwrap());

    let mut asked = Vec::new();
    let outcome = books
        .delete(&api, 2, |book| {
            asked.push(book.title.clone());
            true
        })
        .await;

    assert_eq!(outcome, DeleteOutcome::Deleted);
    assert_eq!(asked, vec!["Animal Farm".to_string()]);
    let remaining: Vec<i64> = books.items().iter().map(|b| b.id).collect();
    assert_eq!(remaining, vec![1, 3]);

    let deletes: Vec<Recorded> = stub
        .requests()
        .into_iter()
        .filter(|r| r.method == Method::DELETE)
        .collect();
    assert_eq!(deletes.len(), 1);
    assert_eq!(deletes[0].path, "/api/books/2");
    // No refetch after the delete
    assert_eq!(stub.requests_to(Method::GET, "/api/books").len(), 1);
}

#[tokio::test]
async fn test_failed_delete_keeps_list() {
    let (_stub, url) = start_stub().await;
    let (api, _store) = logged_in_client(&url).await;
    let mut books = ListView::new(load_books(&api).await.unwrap());

    let outcome = books.delete(&api, 3, |_| true).await;

    assert_eq!(outcome, DeleteOutcome::Failed("Failed to delete book".to_string()));
    assert_eq!(books.len(), 3);
}

#[tokio::test]
async fn test_search_over_fetched_books() {
    let (_stub, url) = start_stub().await;
    let api = ApiClient::new(&url).unwrap();
    let mut books = ListView::new(load_books(&api).await.unwrap());

    books.set_search("gEoRgE");
    let titles: Vec<&str> = books.visible().iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, vec!["Animal Farm", "Nineteen Eighty-Four"]);
}
