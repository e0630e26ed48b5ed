//! Repository layer: the record store behind the catalog services.
//!
//! Every service operation opens one [`StoreTransaction`], performs all of
//! its reads and writes through it and commits at the end. A transaction
//! dropped without `commit` is rolled back, so a failure at any step leaves
//! the store as it was.

pub mod authors;
pub mod book_authors;
pub mod books;
pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::{
    error::AppResult,
    models::{Author, Book, BookAuthor, EntityKind},
};

pub use memory::MemoryRecordStore;
pub use postgres::PgRecordStore;

/// Entry point to a record store
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Open a transaction. Reads through `find_*_for_update` must block
    /// concurrent writers of the same row until this transaction ends.
    async fn begin(&self) -> AppResult<Box<dyn StoreTransaction>>;
}

/// Operations available inside one store transaction
#[async_trait]
pub trait StoreTransaction: Send {
    async fn find_book(&mut self, id: i64) -> AppResult<Option<Book>>;
    /// `find_book` that also locks the row for the rest of the transaction.
    /// Writes that depend on the current row go through this read.
    async fn find_book_for_update(&mut self, id: i64) -> AppResult<Option<Book>>;
    async fn find_all_books(&mut self) -> AppResult<Vec<Book>>;
    async fn find_books_by_ids(&mut self, ids: &[i64]) -> AppResult<Vec<Book>>;
    /// Insert when `book.id` is `None` (assigning an id), otherwise replace
    /// the existing row. Fails with `StoreFailure` if no row is written.
    async fn upsert_book(&mut self, book: &Book) -> AppResult<Book>;
    async fn delete_book(&mut self, id: i64) -> AppResult<()>;

    async fn find_author(&mut self, id: i64) -> AppResult<Option<Author>>;
    async fn find_author_for_update(&mut self, id: i64) -> AppResult<Option<Author>>;
    async fn find_all_authors(&mut self) -> AppResult<Vec<Author>>;
    async fn find_authors_by_ids(&mut self, ids: &[i64]) -> AppResult<Vec<Author>>;
    async fn upsert_author(&mut self, author: &Author) -> AppResult<Author>;
    async fn delete_author(&mut self, id: i64) -> AppResult<()>;

    /// Every persisted id of the given entity type
    async fn find_all_ids(&mut self, kind: EntityKind) -> AppResult<Vec<i64>>;

    /// IDs on the other side of every join row owned by `owner_id`
    async fn find_joined_ids(&mut self, owner: EntityKind, owner_id: i64) -> AppResult<Vec<i64>>;
    async fn delete_join_rows(&mut self, owner: EntityKind, owner_id: i64) -> AppResult<()>;
    /// Inserting a pair that already exists is a no-op
    async fn insert_join_row(&mut self, link: BookAuthor) -> AppResult<()>;

    async fn commit(self: Box<Self>) -> AppResult<()>;
}
