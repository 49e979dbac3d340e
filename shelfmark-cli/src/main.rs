//! Shelfmark CLI - Command-line client for a library catalog

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::App;
use shelfmark_core::CategoryEntry;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Parse a category association given as `ID[:PRIORITY[:NOTES]]`
fn parse_category(s: &str) -> Result<CategoryEntry, String> {
    let mut parts = s.splitn(3, ':');
    let id = parts
        .next()
        .unwrap_or_default()
        .parse::<i64>()
        .map_err(|_| format!("'{}' does not start with a category id", s))?;
    let priority = match parts.next() {
        Some(p) if !p.is_empty() => p
            .parse::<i32>()
            .map_err(|_| format!("'{}' is not a valid priority", p))?,
        _ => 1,
    };
    let notes = parts.next().unwrap_or_default();
    Ok(CategoryEntry::new(id, priority, notes))
}

#[derive(Parser)]
#[command(name = "shelfmark")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Catalog base URL
    #[arg(long, global = true, env = "SHELFMARK_API_URL")]
    api_url: Option<String>,

    /// File holding the session token
    #[arg(long, global = true, env = "SHELFMARK_SESSION_PATH")]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account
    Register {
        username: String,

        #[arg(short, long)]
        password: String,
    },

    /// Log in and remember the session token
    Login {
        username: String,

        #[arg(short, long)]
        password: String,
    },

    /// Forget the stored session token
    Logout,

    /// Show whether a session token is stored
    Whoami,

    /// List, show, add, edit or delete books
    Books {
        #[command(subcommand)]
        action: BookCommand,
    },

    /// List or add authors
    Authors {
        #[command(subcommand)]
        action: AuthorCommand,
    },

    /// List or add categories
    Categories {
        #[command(subcommand)]
        action: CategoryCommand,
    },
}

/// Book fields shared by `add` and `edit`
#[derive(clap::Args)]
pub struct BookFields {
    /// ISBN (10-17 digits and hyphens)
    #[arg(long)]
    pub isbn: Option<String>,

    /// Publication year
    #[arg(long)]
    pub year: Option<i32>,

    /// Number of pages
    #[arg(long)]
    pub pages: Option<i32>,

    #[arg(long)]
    pub description: Option<String>,

    /// Category association as ID[:PRIORITY[:NOTES]] (repeatable)
    #[arg(long = "category", value_parser = parse_category)]
    pub categories: Vec<CategoryEntry>,
}

#[derive(Subcommand)]
enum BookCommand {
    /// List books
    List {
        /// Only show books whose title or author contains this text
        #[arg(short, long)]
        search: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one book
    Show {
        id: i64,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add a new book
    Add {
        #[arg(long)]
        title: String,

        #[arg(long)]
        author_id: i64,

        #[command(flatten)]
        fields: BookFields,

        /// Cover image to upload (png, jpg, jpeg, gif)
        #[arg(long)]
        cover: Option<PathBuf>,
    },

    /// Edit an existing book
    Edit {
        id: i64,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        author_id: Option<i64>,

        #[command(flatten)]
        fields: BookFields,

        /// Drop the book's current category associations
        #[arg(long)]
        clear_categories: bool,
    },

    /// Delete a book
    Delete {
        id: i64,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum AuthorCommand {
    /// List authors
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add an author
    Add {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        birth_year: Option<i32>,
    },
}

#[derive(Subcommand)]
enum CategoryCommand {
    /// List categories
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add a category
    Add {
        #[arg(long)]
        name: String,

        #[arg(long)]
        description: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing; stdout is reserved for command output
    let filter = if cli.verbose {
        "shelfmark_cli=debug,shelfmark_core=debug"
    } else {
        "shelfmark_cli=info"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut app = App::init(cli.api_url, cli.session_file).await?;

    match cli.command {
        Commands::Register { username, password } => {
            commands::register(&app, &username, &password).await
        }
        Commands::Login { username, password } => {
            commands::login(&mut app, &username, &password).await
        }
        Commands::Logout => commands::logout(&mut app).await,
        Commands::Whoami => commands::whoami(&app),

        Commands::Books { action } => match action {
            BookCommand::List { search, json } => {
                commands::list_books(&app, search.as_deref(), json).await
            }
            BookCommand::Show { id, json } => commands::show_book(&app, id, json).await,
            BookCommand::Add {
                title,
                author_id,
                fields,
                cover,
            } => commands::add_book(&app, title, author_id, fields, cover).await,
            BookCommand::Edit {
                id,
                title,
                author_id,
                fields,
                clear_categories,
            } => commands::edit_book(&app, id, title, author_id, fields, clear_categories).await,
            BookCommand::Delete { id, yes } => commands::delete_book(&app, id, yes).await,
        },

        Commands::Authors { action } => match action {
            AuthorCommand::List { json } => commands::list_authors(&app, json).await,
            AuthorCommand::Add {
                name,
                email,
                birth_year,
            } => commands::add_author(&app, name, email, birth_year).await,
        },

        Commands::Categories { action } => match action {
            CategoryCommand::List { json } => commands::list_categories(&app, json).await,
            CategoryCommand::Add { name, description } => {
                commands::add_category(&app, name, description).await
            }
        },
    }
}
