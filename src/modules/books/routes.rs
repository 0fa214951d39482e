use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use folio_db::{Connection, Stored};
use folio_http::{AdminSession, ApiJson, AppError, ErrorResponse};

use super::models::{Book, BookInput, BookListQuery};
use crate::sample;
use crate::state::AppState;
use crate::utils::{collection, not_found, parse_id};

#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(BookListQuery),
    responses(
        (status = 200, description = "Books, newest first; sample data when no store is configured", body = [Book]),
        (status = 500, description = "Store error", body = ErrorResponse)
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    Query(params): Query<BookListQuery>,
) -> Result<Json<Vec<Stored<Book>>>, AppError> {
    match state.store.connect().await? {
        Connection::Live(db) => Ok(Json(db.collection::<Book>().find(params.query()).await?)),
        Connection::Unavailable => Ok(Json(sample::books(&params.filter()))),
    }
}

#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(("id" = String, Path, description = "Book id")),
    responses(
        (status = 200, description = "The book", body = Book),
        (status = 404, description = "No such book", body = ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Stored<Book>>, AppError> {
    let book = match state.store.connect().await? {
        Connection::Live(db) => {
            let id = parse_id(&id, "book")?;
            db.collection::<Book>().find_by_id(&id).await?
        }
        Connection::Unavailable => sample::book(&id),
    };
    book.map(Json).ok_or_else(|| not_found("book"))
}

#[utoipa::path(
    get,
    path = "/admin/books",
    tag = "admin",
    params(BookListQuery),
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Books, newest first", body = [Book]),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    )
)]
pub async fn admin_list_books(
    _session: AdminSession,
    State(state): State<AppState>,
    Query(params): Query<BookListQuery>,
) -> Result<Json<Vec<Stored<Book>>>, AppError> {
    let books = collection::<Book>(&state.store).await?;
    Ok(Json(books.find(params.query()).await?))
}

#[utoipa::path(
    post,
    path = "/admin/books",
    tag = "admin",
    request_body = BookInput,
    security(("bearerAuth" = [])),
    responses(
        (status = 201, description = "Created", body = Book),
        (status = 400, description = "Title or author missing", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    )
)]
pub async fn create_book(
    _session: AdminSession,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<BookInput>,
) -> Result<(StatusCode, Json<Stored<Book>>), AppError> {
    let book = input.into_book()?;
    let books = collection::<Book>(&state.store).await?;

    let created = books.create(&book).await?;
    tracing::info!(id = %created.id, title = %created.doc.title, "book created");

    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/admin/books/{id}",
    tag = "admin",
    params(("id" = String, Path, description = "Book id")),
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "The book", body = Book),
        (status = 404, description = "No such book", body = ErrorResponse)
    )
)]
pub async fn admin_get_book(
    _session: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Stored<Book>>, AppError> {
    let id = parse_id(&id, "book")?;
    let books = collection::<Book>(&state.store).await?;
    books
        .find_by_id(&id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found("book"))
}

#[utoipa::path(
    put,
    path = "/admin/books/{id}",
    tag = "admin",
    params(("id" = String, Path, description = "Book id")),
    request_body = BookInput,
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Updated", body = Book),
        (status = 400, description = "Title or author blanked", body = ErrorResponse),
        (status = 404, description = "No such book", body = ErrorResponse)
    )
)]
pub async fn update_book(
    _session: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<BookInput>,
) -> Result<Json<Stored<Book>>, AppError> {
    let id = parse_id(&id, "book")?;
    let patch = input.into_patch()?;
    let books = collection::<Book>(&state.store).await?;

    let updated = books
        .update_by_id(&id, &patch)
        .await?
        .ok_or_else(|| not_found("book"))?;
    tracing::info!(%id, "book updated");

    Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path = "/admin/books/{id}",
    tag = "admin",
    params(("id" = String, Path, description = "Book id")),
    security(("bearerAuth" = [])),
    responses(
        (status = 204, description = "Deleted, or never existed"),
        (status = 404, description = "Malformed id", body = ErrorResponse)
    )
)]
pub async fn delete_book(
    _session: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id, "book")?;
    let books = collection::<Book>(&state.store).await?;

    let existed = books.delete_by_id(&id).await?;
    tracing::info!(%id, existed, "book deleted");

    Ok(StatusCode::NO_CONTENT)
}
