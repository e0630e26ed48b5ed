//! `book_author` junction table queries

use sqlx::PgConnection;

use crate::{
    error::AppResult,
    models::{BookAuthor, EntityKind},
};

/// (owner column, related column) for an owning side
fn columns(owner: EntityKind) -> (&'static str, &'static str) {
    match owner {
        EntityKind::Book => ("book_id", "author_id"),
        EntityKind::Author => ("author_id", "book_id"),
    }
}

pub async fn find_joined_ids(
    conn: &mut PgConnection,
    owner: EntityKind,
    owner_id: i64,
) -> AppResult<Vec<i64>> {
    let (owner_column, related_column) = columns(owner);
    let ids = sqlx::query_scalar::<_, i64>(&format!(
        "SELECT {related} FROM book_author WHERE {owner} = $1 ORDER BY {related}",
        related = related_column,
        owner = owner_column,
    ))
    .bind(owner_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(ids)
}

pub async fn delete_for_owner(
    conn: &mut PgConnection,
    owner: EntityKind,
    owner_id: i64,
) -> AppResult<()> {
    let (owner_column, _) = columns(owner);
    sqlx::query(&format!("DELETE FROM book_author WHERE {} = $1", owner_column))
        .bind(owner_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

pub async fn insert(conn: &mut PgConnection, link: BookAuthor) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO book_author (book_id, author_id)
        VALUES ($1, $2)
        ON CONFLICT (book_id, author_id) DO NOTHING
        "#,
    )
    .bind(link.book_id)
    .bind(link.author_id)
    .execute(&mut *conn)
    .await?;
    Ok(())
}
