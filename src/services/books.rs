//! Book catalog service

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{AuthorResponse, Book, BookRequest, BookResponse, EntityKind},
    repository::{RecordStore, StoreTransaction},
};

use super::{existence, relations, validation::RequestValidator};

#[derive(Clone)]
pub struct BookService {
    store: Arc<dyn RecordStore>,
    validator: RequestValidator,
}

impl BookService {
    pub fn new(store: Arc<dyn RecordStore>, validator: RequestValidator) -> Self {
        Self { store, validator }
    }

    /// List all books with their author IDs
    pub async fn list_books(&self) -> AppResult<Vec<BookResponse>> {
        let mut tx = self.store.begin().await?;
        let books = tx.find_all_books().await?;

        let mut responses = Vec::with_capacity(books.len());
        for book in books {
            responses.push(assemble(tx.as_mut(), book).await?);
        }

        tx.commit().await?;
        Ok(responses)
    }

    /// Get book by ID
    pub async fn get_book(&self, id: i64) -> AppResult<BookResponse> {
        let mut tx = self.store.begin().await?;
        let book = find_existing(tx.as_mut(), id).await?;
        let response = assemble(tx.as_mut(), book).await?;
        tx.commit().await?;
        Ok(response)
    }

    /// Authors linked to a book
    pub async fn authors_by_book(&self, id: i64) -> AppResult<Vec<AuthorResponse>> {
        let mut tx = self.store.begin().await?;
        find_existing(tx.as_mut(), id).await?;

        let author_ids = tx.find_joined_ids(EntityKind::Book, id).await?;
        let authors = tx.find_authors_by_ids(&author_ids).await?;

        let mut responses = Vec::with_capacity(authors.len());
        for author in authors {
            let author_id = author.persisted_id()?;
            let book_ids = tx.find_joined_ids(EntityKind::Author, author_id).await?;
            responses.push(AuthorResponse::assemble(author, book_ids)?);
        }

        tx.commit().await?;
        Ok(responses)
    }

    /// Create a new book linked to the given authors
    pub async fn create_book(&self, request: BookRequest) -> AppResult<BookResponse> {
        self.validator.check_book(&request)?;
        let status = request.publication_status()?;

        let mut tx = self.store.begin().await?;
        existence::ensure_exist(tx.as_mut(), EntityKind::Author, &request.author_ids).await?;

        let saved = tx
            .upsert_book(&Book::new(request.title, request.price, status))
            .await?;
        let id = saved.persisted_id()?;
        relations::synchronize(tx.as_mut(), EntityKind::Book, id, &request.author_ids).await?;

        let response = assemble(tx.as_mut(), saved).await?;
        tx.commit().await?;

        tracing::info!(book_id = id, "Book created");
        Ok(response)
    }

    /// Replace a book's fields and its author links
    pub async fn update_book(&self, id: i64, request: BookRequest) -> AppResult<BookResponse> {
        self.validator.check_book(&request)?;
        let status = request.publication_status()?;

        let mut tx = self.store.begin().await?;
        let existing = lock_existing(tx.as_mut(), id).await?;
        existence::ensure_exist(tx.as_mut(), EntityKind::Author, &request.author_ids).await?;

        let revised = existing.revise(request.title, request.price, status)?;
        let saved = tx.upsert_book(&revised).await?;
        relations::synchronize(tx.as_mut(), EntityKind::Book, id, &request.author_ids).await?;

        let response = assemble(tx.as_mut(), saved).await?;
        tx.commit().await?;

        tracing::info!(book_id = id, "Book updated");
        Ok(response)
    }

    /// Delete a book and every join row naming it
    pub async fn delete_book(&self, id: i64) -> AppResult<()> {
        let mut tx = self.store.begin().await?;
        lock_existing(tx.as_mut(), id).await?;

        tx.delete_join_rows(EntityKind::Book, id).await?;
        tx.delete_book(id).await?;
        tx.commit().await?;

        tracing::info!(book_id = id, "Book deleted");
        Ok(())
    }
}

async fn find_existing(tx: &mut dyn StoreTransaction, id: i64) -> AppResult<Book> {
    tx.find_book(id)
        .await?
        .ok_or_else(|| AppError::not_found(EntityKind::Book, id))
}

/// Locked read for writes that depend on the current row
async fn lock_existing(tx: &mut dyn StoreTransaction, id: i64) -> AppResult<Book> {
    tx.find_book_for_update(id)
        .await?
        .ok_or_else(|| AppError::not_found(EntityKind::Book, id))
}

async fn assemble(tx: &mut dyn StoreTransaction, book: Book) -> AppResult<BookResponse> {
    let id = book.persisted_id()?;
    let author_ids = tx.find_joined_ids(EntityKind::Book, id).await?;
    BookResponse::assemble(book, author_ids)
}
