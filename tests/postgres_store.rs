//! PostgreSQL record store tests
//!
//! These need a reachable database:
//! DATABASE_URL=postgres://... cargo test --test postgres_store -- --ignored

use std::time::Duration;

use bookshelf_server::{
    error::{AppError, AppResult},
    models::{Book, PublicationStatus},
    repository::{PgRecordStore, RecordStore},
};
use rust_decimal::Decimal;
use sqlx::{postgres::PgPoolOptions, Executor};

const SCHEMA: &str = include_str!("../sql/schema.sql");

async fn store(connections: u32) -> PgRecordStore {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = PgPoolOptions::new()
        .max_connections(connections)
        .connect(&url)
        .await
        .expect("Failed to connect to database");
    pool.execute(SCHEMA).await.expect("Failed to apply schema");
    PgRecordStore::new(pool)
}

async fn insert_book(store: &PgRecordStore, status: PublicationStatus) -> i64 {
    let mut tx = store.begin().await.unwrap();
    let book = tx
        .upsert_book(&Book::new("Concurrent".into(), Decimal::from(10), status))
        .await
        .unwrap();
    tx.commit().await.unwrap();
    book.id.unwrap()
}

async fn remove_book(store: &PgRecordStore, id: i64) {
    let mut tx = store.begin().await.unwrap();
    tx.delete_book(id).await.unwrap();
    tx.commit().await.unwrap();
}

/// Same steps as a book status update: locked read, guard, write
async fn unpublish(store: PgRecordStore, id: i64) -> AppResult<()> {
    let mut tx = store.begin().await?;
    let current = tx
        .find_book_for_update(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with ID {} not found", id)))?;
    let revised = current.revise("Concurrent".into(), Decimal::from(10), PublicationStatus::Unpublished)?;
    tx.upsert_book(&revised).await?;
    tx.commit().await
}

#[tokio::test]
#[ignore]
async fn test_locked_read_blocks_concurrent_unpublish() {
    let store = store(4).await;
    let id = insert_book(&store, PublicationStatus::Unpublished).await;

    let mut publisher = store.begin().await.unwrap();
    let current = publisher.find_book_for_update(id).await.unwrap().unwrap();
    assert_eq!(current.status, PublicationStatus::Unpublished);

    // The second writer must wait for the row lock
    let contender = tokio::spawn(unpublish(store.clone(), id));
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(!contender.is_finished());

    let published = current.with_status(PublicationStatus::Published).unwrap();
    publisher.upsert_book(&published).await.unwrap();
    publisher.commit().await.unwrap();

    let result = contender.await.unwrap();
    assert!(matches!(
        result,
        Err(AppError::IllegalStatusTransition {
            from: PublicationStatus::Published,
            to: PublicationStatus::Unpublished,
        })
    ));

    let mut tx = store.begin().await.unwrap();
    let stored = tx.find_book(id).await.unwrap().unwrap();
    drop(tx);
    assert_eq!(stored.status, PublicationStatus::Published);

    remove_book(&store, id).await;
}

#[tokio::test]
#[ignore]
async fn test_uncommitted_write_is_rolled_back() {
    // One connection, so the next transaction runs after the pending rollback
    let store = store(1).await;
    let id = insert_book(&store, PublicationStatus::Unpublished).await;

    let mut tx = store.begin().await.unwrap();
    let current = tx.find_book_for_update(id).await.unwrap().unwrap();
    let published = current.with_status(PublicationStatus::Published).unwrap();
    tx.upsert_book(&published).await.unwrap();
    drop(tx);

    let mut tx = store.begin().await.unwrap();
    let stored = tx.find_book(id).await.unwrap().unwrap();
    drop(tx);
    assert_eq!(stored.status, PublicationStatus::Unpublished);

    remove_book(&store, id).await;
}
