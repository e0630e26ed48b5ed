//! Author endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    api::JsonBody,
    error::{AppResult, ErrorResponse},
    models::{AuthorRequest, AuthorResponse, BookResponse},
    AppState,
};

/// List all authors
#[utoipa::path(
    get,
    path = "/authors",
    tag = "authors",
    responses(
        (status = 200, description = "List of authors", body = Vec<AuthorResponse>)
    )
)]
pub async fn list_authors(State(state): State<AppState>) -> AppResult<Json<Vec<AuthorResponse>>> {
    let authors = state.services.authors.list_authors().await?;
    Ok(Json(authors))
}

/// Get author details by ID
#[utoipa::path(
    get,
    path = "/authors/{id}",
    tag = "authors",
    params(
        ("id" = i64, Path, description = "Author ID")
    ),
    responses(
        (status = 200, description = "Author details", body = AuthorResponse),
        (status = 404, description = "Author not found", body = ErrorResponse)
    )
)]
pub async fn get_author(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AuthorResponse>> {
    let author = state.services.authors.get_author(id).await?;
    Ok(Json(author))
}

/// List the books of an author
#[utoipa::path(
    get,
    path = "/authors/{id}/books",
    tag = "authors",
    params(
        ("id" = i64, Path, description = "Author ID")
    ),
    responses(
        (status = 200, description = "Books of the author", body = Vec<BookResponse>),
        (status = 404, description = "Author not found", body = ErrorResponse)
    )
)]
pub async fn list_author_books(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<BookResponse>>> {
    let books = state.services.authors.books_by_author(id).await?;
    Ok(Json(books))
}

/// Create a new author
#[utoipa::path(
    post,
    path = "/authors",
    tag = "authors",
    request_body = AuthorRequest,
    responses(
        (status = 201, description = "Author created", body = AuthorResponse),
        (status = 400, description = "Invalid input or unknown book IDs", body = ErrorResponse)
    )
)]
pub async fn create_author(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<AuthorRequest>,
) -> AppResult<(StatusCode, Json<AuthorResponse>)> {
    let created = state.services.authors.create_author(request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update an existing author
#[utoipa::path(
    put,
    path = "/authors/{id}",
    tag = "authors",
    params(
        ("id" = i64, Path, description = "Author ID")
    ),
    request_body = AuthorRequest,
    responses(
        (status = 200, description = "Author updated", body = AuthorResponse),
        (status = 400, description = "Invalid input or unknown book IDs", body = ErrorResponse),
        (status = 404, description = "Author not found", body = ErrorResponse)
    )
)]
pub async fn update_author(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    JsonBody(request): JsonBody<AuthorRequest>,
) -> AppResult<Json<AuthorResponse>> {
    let updated = state.services.authors.update_author(id, request).await?;
    Ok(Json(updated))
}

/// Delete an author
#[utoipa::path(
    delete,
    path = "/authors/{id}",
    tag = "authors",
    params(
        ("id" = i64, Path, description = "Author ID")
    ),
    responses(
        (status = 204, description = "Author deleted"),
        (status = 404, description = "Author not found", body = ErrorResponse)
    )
)]
pub async fn delete_author(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.services.authors.delete_author(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
