#![allow(dead_code)]

use std::sync::Arc;

use bookshelf_server::{
    models::{AuthorRequest, BookRequest, EntityKind},
    repository::{MemoryRecordStore, RecordStore},
    services::{RequestValidator, Services},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

/// Services over a fresh in-memory store, plus a handle on that store
pub fn setup() -> (Services, MemoryRecordStore) {
    let store = MemoryRecordStore::new();
    let services = Services::new(
        Arc::new(store.clone()),
        RequestValidator::with_today(today()),
    );
    (services, store)
}

pub fn book_request(title: &str, status: &str, author_ids: &[i64]) -> BookRequest {
    BookRequest {
        title: title.to_string(),
        price: Decimal::from(29),
        status: status.to_string(),
        author_ids: author_ids.to_vec(),
    }
}

pub fn author_request(name: &str, book_ids: &[i64]) -> AuthorRequest {
    AuthorRequest {
        name: name.to_string(),
        birth_date: "1970-01-01".to_string(),
        book_ids: book_ids.to_vec(),
    }
}

/// Create `count` authors without books and return their IDs
pub async fn seed_authors(services: &Services, count: usize) -> Vec<i64> {
    let mut ids = Vec::new();
    for i in 0..count {
        let author = services
            .authors
            .create_author(author_request(&format!("Author {}", i + 1), &[]))
            .await
            .unwrap();
        ids.push(author.id);
    }
    ids
}

/// Join rows owned by `owner_id`, read straight from the store
pub async fn joined(store: &MemoryRecordStore, owner: EntityKind, owner_id: i64) -> Vec<i64> {
    let mut tx = store.begin().await.unwrap();
    let mut ids = tx.find_joined_ids(owner, owner_id).await.unwrap();
    ids.sort_unstable();
    ids
}

pub async fn book_count(store: &MemoryRecordStore) -> usize {
    let mut tx = store.begin().await.unwrap();
    tx.find_all_ids(EntityKind::Book).await.unwrap().len()
}

pub async fn author_count(store: &MemoryRecordStore) -> usize {
    let mut tx = store.begin().await.unwrap();
    tx.find_all_ids(EntityKind::Author).await.unwrap().len()
}
