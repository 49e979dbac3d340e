//! Book commands: the home list, detail view, add/edit forms and delete

use super::{finish, notice_unavailable, report, spinner, App};
use crate::BookFields;
use anyhow::{anyhow, Result};
use shelfmark_core::fetch::{load_book_form, load_books, or_empty, BookFormData};
use shelfmark_core::submit::submit_book;
use shelfmark_core::{Book, BookDraft, DeleteOutcome, FormState, ListView, SubmitTarget};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

pub async fn list_books(app: &App, search: Option<&str>, json: bool) -> Result<()> {
    let pb = spinner("Loading books...");
    let result = load_books(&app.api).await;
    pb.finish_and_clear();

    if result.is_err() {
        notice_unavailable("books");
    }
    let mut view = ListView::new(or_empty(result, "books"));
    if let Some(term) = search {
        view.set_search(term);
    }
    let visible = view.visible();

    if json {
        println!("{}", serde_json::to_string_pretty(&visible)?);
        return Ok(());
    }

    if visible.is_empty() {
        println!("No books found");
        return Ok(());
    }

    for book in visible {
        print_summary(book);
    }

    Ok(())
}

pub async fn show_book(app: &App, id: i64, json: bool) -> Result<()> {
    let pb = spinner("Loading book...");
    let result = app.api.get_book(id).await;
    pb.finish_and_clear();

    let book = result.map_err(|e| report(e, "Failed to load book"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&book)?);
        return Ok(());
    }

    println!("Title:       {}", book.title);
    println!("Author:      {}", display_author(&book));
    if let Some(isbn) = &book.isbn {
        println!("ISBN:        {}", isbn);
    }
    if let Some(year) = book.publication_year {
        println!("Published:   {}", year);
    }
    if let Some(pages) = book.pages {
        println!("Pages:       {}", pages);
    }
    if let Some(desc) = &book.description {
        println!("Description: {}", desc);
    }
    if let Some(cover) = &book.cover_image {
        println!("Cover:       {}", cover);
    }
    for category in &book.categories {
        let name = category
            .category_name
            .clone()
            .unwrap_or_else(|| format!("#{}", category.category_id));
        match &category.notes {
            Some(notes) if !notes.is_empty() => {
                println!("Category:    {} (priority {}) {}", name, category.priority, notes)
            }
            _ => println!("Category:    {} (priority {})", name, category.priority),
        }
    }

    Ok(())
}

pub async fn add_book(
    app: &App,
    title: String,
    author_id: i64,
    fields: BookFields,
    cover: Option<PathBuf>,
) -> Result<()> {
    let pb = spinner("Loading authors and categories...");
    let result = load_book_form(&app.api, None).await;
    pb.finish_and_clear();

    if result.is_err() {
        eprintln!("Could not load authors and categories; references are not checked");
    }
    let data = or_empty(result, "form data");

    let mut draft = BookDraft::new(title, author_id);
    draft.categories = fields.categories.clone();
    draft.cover = cover;
    apply_fields(&mut draft, fields);
    for warning in unknown_references(&data, &draft) {
        tracing::warn!("{}", warning);
    }

    let mut form = FormState::new(draft);
    let pb = spinner("Saving book...");
    let outcome = submit_book(&app.api, &mut form, SubmitTarget::Create).await;
    pb.finish_and_clear();

    let book = finish(&form, outcome)?;
    println!("Added '{}' (id {})", book.title, book.id);
    Ok(())
}

/// Start from the stored book and override whatever was passed
pub async fn edit_book(
    app: &App,
    id: i64,
    title: Option<String>,
    author_id: Option<i64>,
    fields: BookFields,
    clear_categories: bool,
) -> Result<()> {
    let pb = spinner("Loading book...");
    let result = load_book_form(&app.api, Some(id)).await;
    pb.finish_and_clear();

    let mut data = result.map_err(|e| report(e, "Failed to load book"))?;
    let book = data.book.take().ok_or_else(|| anyhow!("Book {} not found", id))?;

    let mut draft = BookDraft::from_book(&book);
    if let Some(title) = title {
        draft.title = title;
    }
    if author_id.is_some() {
        draft.author_id = author_id;
    }
    if clear_categories || !fields.categories.is_empty() {
        draft.categories = fields.categories.clone();
    }
    apply_fields(&mut draft, fields);
    for warning in unknown_references(&data, &draft) {
        tracing::warn!("{}", warning);
    }

    let mut form = FormState::new(draft);
    let pb = spinner("Saving book...");
    let outcome = submit_book(&app.api, &mut form, SubmitTarget::Update(id)).await;
    pb.finish_and_clear();

    let book = finish(&form, outcome)?;
    println!("Updated '{}' (id {})", book.title, book.id);
    Ok(())
}

pub async fn delete_book(app: &App, id: i64, yes: bool) -> Result<()> {
    let pb = spinner("Loading books...");
    let result = load_books(&app.api).await;
    pb.finish_and_clear();

    if result.is_err() {
        notice_unavailable("books");
    }
    let mut view = ListView::new(or_empty(result, "books"));

    let outcome = view
        .delete(&app.api, id, |book| yes || confirm_delete(book))
        .await;

    match outcome {
        DeleteOutcome::Deleted => {
            println!("Deleted book {}", id);
            Ok(())
        }
        DeleteOutcome::Cancelled => {
            println!("Cancelled");
            Ok(())
        }
        DeleteOutcome::NotFound => Err(anyhow!("Book {} not found", id)),
        DeleteOutcome::Failed(message) => Err(anyhow!(message)),
    }
}

/// Optional fields; categories are handled by the caller
fn apply_fields(draft: &mut BookDraft, fields: BookFields) {
    if fields.isbn.is_some() {
        draft.isbn = fields.isbn;
    }
    if fields.year.is_some() {
        draft.publication_year = fields.year;
    }
    if fields.pages.is_some() {
        draft.pages = fields.pages;
    }
    if fields.description.is_some() {
        draft.description = fields.description;
    }
}

/// Ids in the draft that the loaded lists do not contain; a list that
/// failed to load (empty) is not checked
fn unknown_references(data: &BookFormData, draft: &BookDraft) -> Vec<String> {
    let mut unknown = Vec::new();

    if let Some(author_id) = draft.author_id {
        if !data.authors.is_empty() && !data.authors.iter().any(|a| a.id == author_id) {
            unknown.push(format!("Author {} is not in the catalog", author_id));
        }
    }

    if !data.categories.is_empty() {
        for category_id in draft.categories.iter().filter_map(|c| c.category_id) {
            if !data.categories.iter().any(|c| c.id == category_id) {
                unknown.push(format!("Category {} is not in the catalog", category_id));
            }
        }
    }

    unknown
}

fn display_author(book: &Book) -> &str {
    match book.author_name() {
        "" => "Unknown",
        name => name,
    }
}

fn print_summary(book: &Book) {
    match book.publication_year {
        Some(year) => println!(
            "{:>5}  {} by {} ({})",
            book.id,
            book.title,
            display_author(book),
            year
        ),
        None => println!("{:>5}  {} by {}", book.id, book.title, display_author(book)),
    }
}

/// y/N prompt on stderr; anything but yes declines
fn confirm_delete(book: &Book) -> bool {
    eprint!(
        "Delete '{}'? Are you sure you want to delete this book? [y/N] ",
        book.title
    );
    if io::stderr().flush().is_err() {
        return false;
    }

    let mut answer = String::new();
    match io::stdin().lock().read_line(&mut answer) {
        Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}
