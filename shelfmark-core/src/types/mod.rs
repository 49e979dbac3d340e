//! Catalog entities as returned by the REST API

mod author;
mod book;
mod category;

pub use author::Author;
pub use book::{Book, BookCategory};
pub use category::Category;
