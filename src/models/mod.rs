//! Data models for Bookshelf

pub mod author;
pub mod book;
pub mod book_author;

// Re-export commonly used types
pub use author::{Author, AuthorRequest, AuthorResponse};
pub use book::{Book, BookRequest, BookResponse, PublicationStatus};
pub use book_author::{BookAuthor, EntityKind};
