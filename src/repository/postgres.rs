//! PostgreSQL record store backed by a sqlx connection pool

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Transaction};

use super::{authors, book_authors, books, RecordStore, StoreTransaction};
use crate::{
    error::AppResult,
    models::{Author, Book, BookAuthor, EntityKind},
};

#[derive(Clone)]
pub struct PgRecordStore {
    pool: Pool<Postgres>,
}

impl PgRecordStore {
    /// Create a new store with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn begin(&self) -> AppResult<Box<dyn StoreTransaction>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgStoreTransaction { tx }))
    }
}

/// One open database transaction. Rolled back by sqlx when dropped
/// without `commit`.
pub struct PgStoreTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl StoreTransaction for PgStoreTransaction {
    async fn find_book(&mut self, id: i64) -> AppResult<Option<Book>> {
        books::find_by_id(&mut self.tx, id).await
    }

    async fn find_book_for_update(&mut self, id: i64) -> AppResult<Option<Book>> {
        books::find_by_id_for_update(&mut self.tx, id).await
    }

    async fn find_all_books(&mut self) -> AppResult<Vec<Book>> {
        books::find_all(&mut self.tx).await
    }

    async fn find_books_by_ids(&mut self, ids: &[i64]) -> AppResult<Vec<Book>> {
        books::find_by_ids(&mut self.tx, ids).await
    }

    async fn upsert_book(&mut self, book: &Book) -> AppResult<Book> {
        books::upsert(&mut self.tx, book).await
    }

    async fn delete_book(&mut self, id: i64) -> AppResult<()> {
        books::delete(&mut self.tx, id).await
    }

    async fn find_author(&mut self, id: i64) -> AppResult<Option<Author>> {
        authors::find_by_id(&mut self.tx, id).await
    }

    async fn find_author_for_update(&mut self, id: i64) -> AppResult<Option<Author>> {
        authors::find_by_id_for_update(&mut self.tx, id).await
    }

    async fn find_all_authors(&mut self) -> AppResult<Vec<Author>> {
        authors::find_all(&mut self.tx).await
    }

    async fn find_authors_by_ids(&mut self, ids: &[i64]) -> AppResult<Vec<Author>> {
        authors::find_by_ids(&mut self.tx, ids).await
    }

    async fn upsert_author(&mut self, author: &Author) -> AppResult<Author> {
        authors::upsert(&mut self.tx, author).await
    }

    async fn delete_author(&mut self, id: i64) -> AppResult<()> {
        authors::delete(&mut self.tx, id).await
    }

    async fn find_all_ids(&mut self, kind: EntityKind) -> AppResult<Vec<i64>> {
        match kind {
            EntityKind::Book => books::find_all_ids(&mut self.tx).await,
            EntityKind::Author => authors::find_all_ids(&mut self.tx).await,
        }
    }

    async fn find_joined_ids(&mut self, owner: EntityKind, owner_id: i64) -> AppResult<Vec<i64>> {
        book_authors::find_joined_ids(&mut self.tx, owner, owner_id).await
    }

    async fn delete_join_rows(&mut self, owner: EntityKind, owner_id: i64) -> AppResult<()> {
        tracing::debug!(%owner, owner_id, "Deleting join rows");
        book_authors::delete_for_owner(&mut self.tx, owner, owner_id).await
    }

    async fn insert_join_row(&mut self, link: BookAuthor) -> AppResult<()> {
        book_authors::insert(&mut self.tx, link).await
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        self.tx.commit().await?;
        Ok(())
    }
}
