//! `authors` table queries

use sqlx::{postgres::PgRow, PgConnection, Row};

use crate::{
    error::{AppError, AppResult},
    models::Author,
};

const AUTHOR_COLUMNS: &str = "id, name, birth_date, created_at, updated_at";

fn author_from_row(row: &PgRow) -> AppResult<Author> {
    Ok(Author {
        id: Some(row.try_get("id")?),
        name: row.try_get("name")?,
        birth_date: row.try_get("birth_date")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

pub async fn find_by_id(conn: &mut PgConnection, id: i64) -> AppResult<Option<Author>> {
    let row = sqlx::query(&format!("SELECT {} FROM authors WHERE id = $1", AUTHOR_COLUMNS))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    row.as_ref().map(author_from_row).transpose()
}

/// Row lock held until the enclosing transaction ends
pub async fn find_by_id_for_update(conn: &mut PgConnection, id: i64) -> AppResult<Option<Author>> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM authors WHERE id = $1 FOR UPDATE",
        AUTHOR_COLUMNS
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    row.as_ref().map(author_from_row).transpose()
}

pub async fn find_all(conn: &mut PgConnection) -> AppResult<Vec<Author>> {
    let rows = sqlx::query(&format!("SELECT {} FROM authors ORDER BY id", AUTHOR_COLUMNS))
        .fetch_all(&mut *conn)
        .await?;

    rows.iter().map(author_from_row).collect()
}

pub async fn find_by_ids(conn: &mut PgConnection, ids: &[i64]) -> AppResult<Vec<Author>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM authors WHERE id = ANY($1) ORDER BY id",
        AUTHOR_COLUMNS
    ))
    .bind(ids)
    .fetch_all(&mut *conn)
    .await?;

    rows.iter().map(author_from_row).collect()
}

pub async fn find_all_ids(conn: &mut PgConnection) -> AppResult<Vec<i64>> {
    let ids = sqlx::query_scalar::<_, i64>("SELECT id FROM authors ORDER BY id")
        .fetch_all(&mut *conn)
        .await?;
    Ok(ids)
}

pub async fn upsert(conn: &mut PgConnection, author: &Author) -> AppResult<Author> {
    let row = match author.id {
        None => {
            sqlx::query(&format!(
                r#"
                INSERT INTO authors (name, birth_date, created_at, updated_at)
                VALUES ($1, $2, $3, $4)
                RETURNING {}
                "#,
                AUTHOR_COLUMNS
            ))
            .bind(&author.name)
            .bind(author.birth_date)
            .bind(author.created_at)
            .bind(author.updated_at)
            .fetch_optional(&mut *conn)
            .await?
        }
        Some(id) => {
            sqlx::query(&format!(
                r#"
                UPDATE authors SET
                    name = $1,
                    birth_date = $2,
                    updated_at = $3
                WHERE id = $4
                RETURNING {}
                "#,
                AUTHOR_COLUMNS
            ))
            .bind(&author.name)
            .bind(author.birth_date)
            .bind(author.updated_at)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?
        }
    };

    let row = row.ok_or_else(|| match author.id {
        None => AppError::StoreFailure(format!("Failed to save author {}", author.name)),
        Some(id) => AppError::StoreFailure(format!("Failed to update author with ID {}", id)),
    })?;

    author_from_row(&row)
}

pub async fn delete(conn: &mut PgConnection, id: i64) -> AppResult<()> {
    sqlx::query("DELETE FROM authors WHERE id = $1")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}
