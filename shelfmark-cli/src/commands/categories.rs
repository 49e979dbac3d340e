//! Category commands

use super::{finish, notice_unavailable, spinner, App};
use anyhow::Result;
use shelfmark_core::fetch::{load_categories, or_empty};
use shelfmark_core::submit::submit_category;
use shelfmark_core::{CategoryDraft, FormState, ListView};

pub async fn list_categories(app: &App, json: bool) -> Result<()> {
    let pb = spinner("Loading categories...");
    let result = load_categories(&app.api).await;
    pb.finish_and_clear();

    if result.is_err() {
        notice_unavailable("categories");
    }
    let view = ListView::new(or_empty(result, "categories"));

    if json {
        println!("{}", serde_json::to_string_pretty(view.items())?);
        return Ok(());
    }

    if view.is_empty() {
        println!("No categories found");
        return Ok(());
    }

    for category in view.items() {
        match &category.description {
            Some(desc) if !desc.is_empty() => {
                println!("{:>5}  {}: {}", category.id, category.name, desc)
            }
            _ => println!("{:>5}  {}", category.id, category.name),
        }
    }

    Ok(())
}

pub async fn add_category(app: &App, name: String, description: Option<String>) -> Result<()> {
    let mut form = FormState::new(CategoryDraft { name, description });

    let pb = spinner("Saving category...");
    let outcome = submit_category(&app.api, &mut form).await;
    pb.finish_and_clear();

    let category = finish(&form, outcome)?;
    println!("Added category '{}' (id {})", category.name, category.id);
    Ok(())
}
