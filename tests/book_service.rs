//! Book service behaviour against the in-memory record store

mod common;

use bookshelf_server::{
    models::{EntityKind, PublicationStatus},
    AppError,
};
use common::{author_count, book_count, book_request, joined, seed_authors, setup};
use rust_decimal::Decimal;

#[tokio::test]
async fn test_create_book_links_authors() {
    let (services, store) = setup();
    seed_authors(&services, 2).await;

    let created = services
        .books
        .create_book(book_request("Kotlin Programming", "UNPUBLISHED", &[1, 2]))
        .await
        .unwrap();

    assert!(created.id > 0);
    assert_eq!(created.title, "Kotlin Programming");
    assert_eq!(created.price, Decimal::from(29));
    assert_eq!(created.status, PublicationStatus::Unpublished);
    assert_eq!(created.author_ids, vec![1, 2]);
    assert_eq!(joined(&store, EntityKind::Book, created.id).await, vec![1, 2]);
}

#[tokio::test]
async fn test_create_book_with_unknown_author_writes_nothing() {
    let (services, store) = setup();
    seed_authors(&services, 1).await;

    let result = services
        .books
        .create_book(book_request("Kotlin Programming", "UNPUBLISHED", &[1, 99]))
        .await;

    match result {
        Err(AppError::RelatedEntityNotFound { kind, ids }) => {
            assert_eq!(kind, EntityKind::Author);
            assert_eq!(ids, vec![99]);
        }
        other => panic!("expected RelatedEntityNotFound, got {:?}", other),
    }
    assert_eq!(book_count(&store).await, 0);
    assert!(joined(&store, EntityKind::Author, 1).await.is_empty());
}

#[tokio::test]
async fn test_missing_ids_are_all_reported() {
    let (services, _store) = setup();
    seed_authors(&services, 1).await;

    let result = services
        .books
        .create_book(book_request("Title", "PUBLISHED", &[7, 1, 5, 7]))
        .await;
    assert!(matches!(
        result,
        Err(AppError::RelatedEntityNotFound { ids, .. }) if ids == vec![5, 7]
    ));
}

#[tokio::test]
async fn test_duplicate_author_ids_are_deduplicated() {
    let (services, store) = setup();
    seed_authors(&services, 2).await;

    let created = services
        .books
        .create_book(book_request("Title", "UNPUBLISHED", &[2, 1, 2, 1]))
        .await
        .unwrap();
    assert_eq!(created.author_ids, vec![1, 2]);
    assert_eq!(joined(&store, EntityKind::Book, created.id).await, vec![1, 2]);
}

#[tokio::test]
async fn test_unpublishing_is_rejected_and_nothing_changes() {
    let (services, store) = setup();
    seed_authors(&services, 2).await;
    let book = services
        .books
        .create_book(book_request("Published Book", "PUBLISHED", &[1]))
        .await
        .unwrap();

    let result = services
        .books
        .update_book(book.id, book_request("Renamed", "UNPUBLISHED", &[2]))
        .await;
    assert!(matches!(
        result,
        Err(AppError::IllegalStatusTransition {
            from: PublicationStatus::Published,
            to: PublicationStatus::Unpublished,
        })
    ));

    let stored = services.books.get_book(book.id).await.unwrap();
    assert_eq!(stored.status, PublicationStatus::Published);
    assert_eq!(stored.title, "Published Book");
    assert_eq!(joined(&store, EntityKind::Book, book.id).await, vec![1]);
}

#[tokio::test]
async fn test_allowed_status_updates() {
    let (services, _store) = setup();
    seed_authors(&services, 1).await;

    for (from, to) in [
        ("UNPUBLISHED", "PUBLISHED"),
        ("UNPUBLISHED", "UNPUBLISHED"),
        ("PUBLISHED", "PUBLISHED"),
    ] {
        let book = services
            .books
            .create_book(book_request("Title", from, &[1]))
            .await
            .unwrap();
        let updated = services
            .books
            .update_book(book.id, book_request("Title", to, &[1]))
            .await
            .unwrap();
        assert_eq!(updated.status.as_str(), to);
    }
}

#[tokio::test]
async fn test_overlapping_updates_never_unpublish() {
    let (services, _store) = setup();
    seed_authors(&services, 1).await;
    let book = services
        .books
        .create_book(book_request("Title", "UNPUBLISHED", &[1]))
        .await
        .unwrap();

    let (published, unpublished) = tokio::join!(
        services
            .books
            .update_book(book.id, book_request("Title", "PUBLISHED", &[1])),
        services
            .books
            .update_book(book.id, book_request("Title", "UNPUBLISHED", &[1])),
    );

    assert!(published.is_ok());
    if let Err(err) = unpublished {
        assert!(matches!(err, AppError::IllegalStatusTransition { .. }));
    }
    let stored = services.books.get_book(book.id).await.unwrap();
    assert_eq!(stored.status, PublicationStatus::Published);
}

#[tokio::test]
async fn test_update_replaces_fields_and_authors() {
    let (services, store) = setup();
    seed_authors(&services, 3).await;
    let book = services
        .books
        .create_book(book_request("Draft", "UNPUBLISHED", &[1, 2]))
        .await
        .unwrap();

    let mut request = book_request("Final", "PUBLISHED", &[2, 3]);
    request.price = Decimal::new(3550, 2);
    let updated = services.books.update_book(book.id, request).await.unwrap();

    assert_eq!(updated.id, book.id);
    assert_eq!(updated.title, "Final");
    assert_eq!(updated.price, Decimal::new(3550, 2));
    assert_eq!(updated.status, PublicationStatus::Published);
    assert_eq!(updated.author_ids, vec![2, 3]);
    assert_eq!(updated.created_at, book.created_at);
    assert!(updated.updated_at >= book.updated_at);

    assert_eq!(joined(&store, EntityKind::Book, book.id).await, vec![2, 3]);
    assert!(joined(&store, EntityKind::Author, 1).await.is_empty());
}

#[tokio::test]
async fn test_update_with_unknown_author_keeps_previous_state() {
    let (services, store) = setup();
    seed_authors(&services, 2).await;
    let book = services
        .books
        .create_book(book_request("Original", "UNPUBLISHED", &[1]))
        .await
        .unwrap();

    let result = services
        .books
        .update_book(book.id, book_request("Changed", "PUBLISHED", &[2, 42]))
        .await;
    assert!(matches!(
        result,
        Err(AppError::RelatedEntityNotFound { ids, .. }) if ids == vec![42]
    ));

    let stored = services.books.get_book(book.id).await.unwrap();
    assert_eq!(stored.title, "Original");
    assert_eq!(stored.status, PublicationStatus::Unpublished);
    assert_eq!(joined(&store, EntityKind::Book, book.id).await, vec![1]);
}

#[tokio::test]
async fn test_missing_book_is_not_found() {
    let (services, _store) = setup();
    seed_authors(&services, 1).await;

    assert!(matches!(
        services.books.get_book(9).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        services
            .books
            .update_book(9, book_request("Title", "PUBLISHED", &[1]))
            .await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        services.books.delete_book(9).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        services.books.authors_by_book(9).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_delete_book_removes_its_join_rows_only() {
    let (services, store) = setup();
    seed_authors(&services, 2).await;
    let doomed = services
        .books
        .create_book(book_request("Doomed", "UNPUBLISHED", &[1, 2]))
        .await
        .unwrap();
    let kept = services
        .books
        .create_book(book_request("Kept", "UNPUBLISHED", &[1]))
        .await
        .unwrap();

    services.books.delete_book(doomed.id).await.unwrap();

    assert!(joined(&store, EntityKind::Book, doomed.id).await.is_empty());
    assert_eq!(joined(&store, EntityKind::Author, 1).await, vec![kept.id]);
    assert!(joined(&store, EntityKind::Author, 2).await.is_empty());
    assert_eq!(author_count(&store).await, 2);
    assert_eq!(book_count(&store).await, 1);

    let author = services.authors.get_author(2).await.unwrap();
    assert!(author.book_ids.is_empty());
}

#[tokio::test]
async fn test_list_books_attaches_author_ids() {
    let (services, _store) = setup();
    seed_authors(&services, 2).await;
    services
        .books
        .create_book(book_request("First", "UNPUBLISHED", &[1]))
        .await
        .unwrap();
    services
        .books
        .create_book(book_request("Second", "PUBLISHED", &[1, 2]))
        .await
        .unwrap();

    let books = services.books.list_books().await.unwrap();
    assert_eq!(books.len(), 2);
    assert_eq!(books[0].title, "First");
    assert_eq!(books[0].author_ids, vec![1]);
    assert_eq!(books[1].author_ids, vec![1, 2]);
}

#[tokio::test]
async fn test_authors_by_book() {
    let (services, _store) = setup();
    seed_authors(&services, 3).await;
    let book = services
        .books
        .create_book(book_request("Shared", "UNPUBLISHED", &[1, 3]))
        .await
        .unwrap();

    let authors = services.books.authors_by_book(book.id).await.unwrap();
    let ids: Vec<i64> = authors.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![1, 3]);
    assert!(authors.iter().all(|a| a.book_ids == vec![book.id]));
}

#[tokio::test]
async fn test_invalid_request_is_rejected_before_any_write() {
    let (services, store) = setup();
    seed_authors(&services, 1).await;

    let result = services
        .books
        .create_book(book_request("  ", "DRAFT", &[1]))
        .await;
    match result {
        Err(AppError::Validation(violations)) => {
            let fields: Vec<&str> = violations.iter().map(|v| v.field.as_str()).collect();
            assert_eq!(fields, vec!["status", "title"]);
        }
        other => panic!("expected validation error, got {:?}", other),
    }
    assert_eq!(book_count(&store).await, 0);
}
