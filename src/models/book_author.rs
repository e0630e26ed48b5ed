//! Book-Author junction model (N:M relationship)

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// The two catalog entity types. Used to name the owning side of a join
/// lookup or synchronization and the entity type an ID scan targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Book,
    Author,
}

impl EntityKind {
    /// The entity type on the other side of the association
    pub fn opposite(self) -> Self {
        match self {
            EntityKind::Book => EntityKind::Author,
            EntityKind::Author => EntityKind::Book,
        }
    }

    /// Capitalized name for messages
    pub fn label(self) -> &'static str {
        match self {
            EntityKind::Book => "Book",
            EntityKind::Author => "Author",
        }
    }

    /// Build the join row linking an owner of this kind to a related entity
    pub fn link(self, owner_id: i64, related_id: i64) -> BookAuthor {
        match self {
            EntityKind::Book => BookAuthor::new(owner_id, related_id),
            EntityKind::Author => BookAuthor::new(related_id, owner_id),
        }
    }

    /// ID on this kind's side of a join row
    pub fn side_of(self, link: &BookAuthor) -> i64 {
        match self {
            EntityKind::Book => link.book_id,
            EntityKind::Author => link.author_id,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Book => write!(f, "book"),
            EntityKind::Author => write!(f, "author"),
        }
    }
}

/// Junction row linking a book to an author. A pair is unique.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
pub struct BookAuthor {
    pub book_id: i64,
    pub author_id: i64,
}

impl BookAuthor {
    pub fn new(book_id: i64, author_id: i64) -> Self {
        Self { book_id, author_id }
    }
}
