//! Author commands

use super::{finish, notice_unavailable, spinner, App};
use anyhow::Result;
use shelfmark_core::fetch::{load_authors, or_empty};
use shelfmark_core::submit::submit_author;
use shelfmark_core::{AuthorDraft, FormState, ListView};

pub async fn list_authors(app: &App, json: bool) -> Result<()> {
    let pb = spinner("Loading authors...");
    let result = load_authors(&app.api).await;
    pb.finish_and_clear();

    if result.is_err() {
        notice_unavailable("authors");
    }
    let view = ListView::new(or_empty(result, "authors"));

    if json {
        println!("{}", serde_json::to_string_pretty(view.items())?);
        return Ok(());
    }

    if view.is_empty() {
        println!("No authors found");
        return Ok(());
    }

    for author in view.items() {
        let mut line = format!("{:>5}  {}", author.id, author.name);
        if let Some(year) = author.birth_year {
            line.push_str(&format!(" (b. {})", year));
        }
        if let Some(email) = &author.email {
            line.push_str(&format!(" <{}>", email));
        }
        println!("{}  [{} books]", line, author.book_count);
    }

    Ok(())
}

pub async fn add_author(
    app: &App,
    name: String,
    email: Option<String>,
    birth_year: Option<i32>,
) -> Result<()> {
    let mut form = FormState::new(AuthorDraft {
        name,
        email,
        birth_year,
    });

    let pb = spinner("Saving author...");
    let outcome = submit_author(&app.api, &mut form).await;
    pb.finish_and_clear();

    let author = finish(&form, outcome)?;
    println!("Added author '{}' (id {})", author.name, author.id);
    Ok(())
}
