//! Author catalog service

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{Author, AuthorRequest, AuthorResponse, BookResponse, EntityKind},
    repository::{RecordStore, StoreTransaction},
};

use super::{existence, relations, validation::RequestValidator};

#[derive(Clone)]
pub struct AuthorService {
    store: Arc<dyn RecordStore>,
    validator: RequestValidator,
}

impl AuthorService {
    pub fn new(store: Arc<dyn RecordStore>, validator: RequestValidator) -> Self {
        Self { store, validator }
    }

    /// List all authors with their book IDs
    pub async fn list_authors(&self) -> AppResult<Vec<AuthorResponse>> {
        let mut tx = self.store.begin().await?;
        let authors = tx.find_all_authors().await?;

        let mut responses = Vec::with_capacity(authors.len());
        for author in authors {
            responses.push(assemble(tx.as_mut(), author).await?);
        }

        tx.commit().await?;
        Ok(responses)
    }

    /// Get author by ID
    pub async fn get_author(&self, id: i64) -> AppResult<AuthorResponse> {
        let mut tx = self.store.begin().await?;
        let author = find_existing(tx.as_mut(), id).await?;
        let response = assemble(tx.as_mut(), author).await?;
        tx.commit().await?;
        Ok(response)
    }

    /// Books linked to an author, each with all of its author IDs
    pub async fn books_by_author(&self, id: i64) -> AppResult<Vec<BookResponse>> {
        let mut tx = self.store.begin().await?;
        find_existing(tx.as_mut(), id).await?;

        let book_ids = tx.find_joined_ids(EntityKind::Author, id).await?;
        let books = tx.find_books_by_ids(&book_ids).await?;

        let mut responses = Vec::with_capacity(books.len());
        for book in books {
            let book_id = book.persisted_id()?;
            let author_ids = tx.find_joined_ids(EntityKind::Book, book_id).await?;
            responses.push(BookResponse::assemble(book, author_ids)?);
        }

        tx.commit().await?;
        Ok(responses)
    }

    /// Create a new author linked to the given books
    pub async fn create_author(&self, request: AuthorRequest) -> AppResult<AuthorResponse> {
        self.validator.check_author(&request)?;
        let birth_date = request.parsed_birth_date()?;

        let mut tx = self.store.begin().await?;
        existence::ensure_exist(tx.as_mut(), EntityKind::Book, &request.book_ids).await?;

        let saved = tx
            .upsert_author(&Author::new(request.name, birth_date))
            .await?;
        let id = saved.persisted_id()?;
        relations::synchronize(tx.as_mut(), EntityKind::Author, id, &request.book_ids).await?;

        let response = assemble(tx.as_mut(), saved).await?;
        tx.commit().await?;

        tracing::info!(author_id = id, "Author created");
        Ok(response)
    }

    /// Replace an author's fields and book links. An empty `book_ids`
    /// unlinks the author from every book.
    pub async fn update_author(&self, id: i64, request: AuthorRequest) -> AppResult<AuthorResponse> {
        self.validator.check_author(&request)?;
        let birth_date = request.parsed_birth_date()?;

        let mut tx = self.store.begin().await?;
        let existing = lock_existing(tx.as_mut(), id).await?;
        existence::ensure_exist(tx.as_mut(), EntityKind::Book, &request.book_ids).await?;

        let saved = tx
            .upsert_author(&existing.revise(request.name, birth_date))
            .await?;
        relations::synchronize(tx.as_mut(), EntityKind::Author, id, &request.book_ids).await?;

        let response = assemble(tx.as_mut(), saved).await?;
        tx.commit().await?;

        tracing::info!(author_id = id, "Author updated");
        Ok(response)
    }

    /// Delete an author and every join row naming them
    pub async fn delete_author(&self, id: i64) -> AppResult<()> {
        let mut tx = self.store.begin().await?;
        lock_existing(tx.as_mut(), id).await?;

        tx.delete_join_rows(EntityKind::Author, id).await?;
        tx.delete_author(id).await?;
        tx.commit().await?;

        tracing::info!(author_id = id, "Author deleted");
        Ok(())
    }
}

async fn find_existing(tx: &mut dyn StoreTransaction, id: i64) -> AppResult<Author> {
    tx.find_author(id)
        .await?
        .ok_or_else(|| AppError::not_found(EntityKind::Author, id))
}

/// Locked read for writes that depend on the current row
async fn lock_existing(tx: &mut dyn StoreTransaction, id: i64) -> AppResult<Author> {
    tx.find_author_for_update(id)
        .await?
        .ok_or_else(|| AppError::not_found(EntityKind::Author, id))
}

async fn assemble(tx: &mut dyn StoreTransaction, author: Author) -> AppResult<AuthorResponse> {
    let id = author.persisted_id()?;
    let book_ids = tx.find_joined_ids(EntityKind::Author, id).await?;
    AuthorResponse::assemble(author, book_ids)
}
