//! `books` table queries

use sqlx::{postgres::PgRow, PgConnection, Row};

use crate::{
    error::{AppError, AppResult},
    models::{book::UnknownStatus, Book},
};

const BOOK_COLUMNS: &str = "id, title, price, status, created_at, updated_at";

fn book_from_row(row: &PgRow) -> AppResult<Book> {
    let status: String = row.try_get("status")?;
    let status = status
        .parse()
        .map_err(|e: UnknownStatus| AppError::StoreFailure(e.to_string()))?;

    Ok(Book {
        id: Some(row.try_get("id")?),
        title: row.try_get("title")?,
        price: row.try_get("price")?,
        status,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

pub async fn find_by_id(conn: &mut PgConnection, id: i64) -> AppResult<Option<Book>> {
    let row = sqlx::query(&format!("SELECT {} FROM books WHERE id = $1", BOOK_COLUMNS))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    row.as_ref().map(book_from_row).transpose()
}

/// Row lock held until the enclosing transaction ends
pub async fn find_by_id_for_update(conn: &mut PgConnection, id: i64) -> AppResult<Option<Book>> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM books WHERE id = $1 FOR UPDATE",
        BOOK_COLUMNS
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    row.as_ref().map(book_from_row).transpose()
}

pub async fn find_all(conn: &mut PgConnection) -> AppResult<Vec<Book>> {
    let rows = sqlx::query(&format!("SELECT {} FROM books ORDER BY id", BOOK_COLUMNS))
        .fetch_all(&mut *conn)
        .await?;

    rows.iter().map(book_from_row).collect()
}

pub async fn find_by_ids(conn: &mut PgConnection, ids: &[i64]) -> AppResult<Vec<Book>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM books WHERE id = ANY($1) ORDER BY id",
        BOOK_COLUMNS
    ))
    .bind(ids)
    .fetch_all(&mut *conn)
    .await?;

    rows.iter().map(book_from_row).collect()
}

pub async fn find_all_ids(conn: &mut PgConnection) -> AppResult<Vec<i64>> {
    let ids = sqlx::query_scalar::<_, i64>("SELECT id FROM books ORDER BY id")
        .fetch_all(&mut *conn)
        .await?;
    Ok(ids)
}

pub async fn upsert(conn: &mut PgConnection, book: &Book) -> AppResult<Book> {
    let row = match book.id {
        None => {
            sqlx::query(&format!(
                r#"
                INSERT INTO books (title, price, status, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING {}
                "#,
                BOOK_COLUMNS
            ))
            .bind(&book.title)
            .bind(book.price)
            .bind(book.status.as_str())
            .bind(book.created_at)
            .bind(book.updated_at)
            .fetch_optional(&mut *conn)
            .await?
        }
        Some(id) => {
            sqlx::query(&format!(
                r#"
                UPDATE books SET
                    title = $1,
                    price = $2,
                    status = $3,
                    updated_at = $4
                WHERE id = $5
                RETURNING {}
                "#,
                BOOK_COLUMNS
            ))
            .bind(&book.title)
            .bind(book.price)
            .bind(book.status.as_str())
            .bind(book.updated_at)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?
        }
    };

    let row = row.ok_or_else(|| match book.id {
        None => AppError::StoreFailure(format!("Failed to save book {}", book.title)),
        Some(id) => AppError::StoreFailure(format!("Failed to update book with ID {}", id)),
    })?;

    book_from_row(&row)
}

pub async fn delete(conn: &mut PgConnection, id: i64) -> AppResult<()> {
    sqlx::query("DELETE FROM books WHERE id = $1")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}
