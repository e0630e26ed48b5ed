//! In-process record store.
//!
//! Holds all rows behind one async mutex. A transaction owns the lock for
//! its whole lifetime and works on a copy of the tables, which replaces the
//! shared state on commit. Transactions are therefore fully serialized and
//! an uncommitted transaction leaves no trace.

use async_trait::async_trait;
use std::{
    collections::{BTreeMap, BTreeSet},
    sync::Arc,
};
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::{RecordStore, StoreTransaction};
use crate::{
    error::{AppError, AppResult},
    models::{Author, Book, BookAuthor, EntityKind},
};

#[derive(Debug, Clone, Default)]
struct Tables {
    books: BTreeMap<i64, Book>,
    authors: BTreeMap<i64, Author>,
    links: BTreeSet<BookAuthor>,
    last_book_id: i64,
    last_author_id: i64,
}

#[derive(Clone, Default)]
pub struct MemoryRecordStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn begin(&self) -> AppResult<Box<dyn StoreTransaction>> {
        let guard = self.tables.clone().lock_owned().await;
        let working = guard.clone();
        Ok(Box::new(MemoryTransaction { guard, working }))
    }
}

pub struct MemoryTransaction {
    guard: OwnedMutexGuard<Tables>,
    working: Tables,
}

fn select<T: Clone>(rows: &BTreeMap<i64, T>, ids: &[i64]) -> Vec<T> {
    let wanted: BTreeSet<i64> = ids.iter().copied().collect();
    wanted.iter().filter_map(|id| rows.get(id).cloned()).collect()
}

#[async_trait]
impl StoreTransaction for MemoryTransaction {
    async fn find_book(&mut self, id: i64) -> AppResult<Option<Book>> {
        Ok(self.working.books.get(&id).cloned())
    }

    // The transaction already owns the whole store
    async fn find_book_for_update(&mut self, id: i64) -> AppResult<Option<Book>> {
        self.find_book(id).await
    }

    async fn find_all_books(&mut self) -> AppResult<Vec<Book>> {
        Ok(self.working.books.values().cloned().collect())
    }

    async fn find_books_by_ids(&mut self, ids: &[i64]) -> AppResult<Vec<Book>> {
        Ok(select(&self.working.books, ids))
    }

    async fn upsert_book(&mut self, book: &Book) -> AppResult<Book> {
        let id = match book.id {
            None => {
                self.working.last_book_id += 1;
                self.working.last_book_id
            }
            Some(id) if self.working.books.contains_key(&id) => id,
            Some(id) => {
                return Err(AppError::StoreFailure(format!(
                    "Failed to update book with ID {}",
                    id
                )))
            }
        };

        let saved = Book {
            id: Some(id),
            ..book.clone()
        };
        self.working.books.insert(id, saved.clone());
        Ok(saved)
    }

    async fn delete_book(&mut self, id: i64) -> AppResult<()> {
        self.working.books.remove(&id);
        Ok(())
    }

    async fn find_author(&mut self, id: i64) -> AppResult<Option<Author>> {
        Ok(self.working.authors.get(&id).cloned())
    }

    async fn find_author_for_update(&mut self, id: i64) -> AppResult<Option<Author>> {
        self.find_author(id).await
    }

    async fn find_all_authors(&mut self) -> AppResult<Vec<Author>> {
        Ok(self.working.authors.values().cloned().collect())
    }

    async fn find_authors_by_ids(&mut self, ids: &[i64]) -> AppResult<Vec<Author>> {
        Ok(select(&self.working.authors, ids))
    }

    async fn upsert_author(&mut self, author: &Author) -> AppResult<Author> {
        let id = match author.id {
            None => {
                self.working.last_author_id += 1;
                self.working.last_author_id
            }
            Some(id) if self.working.authors.contains_key(&id) => id,
            Some(id) => {
                return Err(AppError::StoreFailure(format!(
                    "Failed to update author with ID {}",
                    id
                )))
            }
        };

        let saved = Author {
            id: Some(id),
            ..author.clone()
        };
        self.working.authors.insert(id, saved.clone());
        Ok(saved)
    }

    async fn delete_author(&mut self, id: i64) -> AppResult<()> {
        self.working.authors.remove(&id);
        Ok(())
    }

    async fn find_all_ids(&mut self, kind: EntityKind) -> AppResult<Vec<i64>> {
        Ok(match kind {
            EntityKind::Book => self.working.books.keys().copied().collect(),
            EntityKind::Author => self.working.authors.keys().copied().collect(),
        })
    }

    async fn find_joined_ids(&mut self, owner: EntityKind, owner_id: i64) -> AppResult<Vec<i64>> {
        let related = owner.opposite();
        Ok(self
            .working
            .links
            .iter()
            .filter(|link| owner.side_of(link) == owner_id)
            .map(|link| related.side_of(link))
            .collect())
    }

    async fn delete_join_rows(&mut self, owner: EntityKind, owner_id: i64) -> AppResult<()> {
        self.working
            .links
            .retain(|link| owner.side_of(link) != owner_id);
        Ok(())
    }

    async fn insert_join_row(&mut self, link: BookAuthor) -> AppResult<()> {
        self.working.links.insert(link);
        Ok(())
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        let MemoryTransaction { mut guard, working } = *self;
        *guard = working;
        Ok(())
    }
}
