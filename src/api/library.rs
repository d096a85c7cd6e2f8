//! Library (book catalogue and borrowing) endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        book::{Book, BookEntry, BookQuery, CreateBook, UpdateBook},
        borrow::BorrowRecord,
    },
};

use super::{AuthenticatedUser, JsonBody, MessageResponse, PathParam, QueryParams};

/// Book list response
#[derive(Serialize, ToSchema)]
pub struct BooksListResponse {
    pub books: Vec<BookEntry>,
    pub total: usize,
}

/// A created or edited book with its notice
#[derive(Serialize, ToSchema)]
pub struct BookResponse {
    pub message: String,
    pub book: Book,
}

/// Borrow response
#[derive(Serialize, ToSchema)]
pub struct BorrowResponse {
    pub message: String,
    pub borrow: BorrowRecord,
    /// Copies left after this borrow
    pub inventory: i32,
    /// Borrow records for this book, including this one
    pub borrow_count: Option<i64>,
}

/// List books with their borrow counts
#[utoipa::path(
    get,
    path = "/library",
    tag = "library",
    security(("bearer_auth" = [])),
    params(BookQuery),
    responses(
        (status = 200, description = "Book list", body = BooksListResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not an administrator")
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    QueryParams(query): QueryParams<BookQuery>,
) -> AppResult<Json<BooksListResponse>> {
    claims.require_admin()?;

    let books = state.services.library.list_books(&query).await?;
    Ok(Json(BooksListResponse {
        total: books.len(),
        books,
    }))
}

/// Create a book
#[utoipa::path(
    post,
    path = "/library",
    tag = "library",
    security(("bearer_auth" = [])),
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = BookResponse),
        (status = 400, description = "Missing name or introduction, or malformed body"),
        (status = 403, description = "Not an administrator")
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    JsonBody(data): JsonBody<CreateBook>,
) -> AppResult<(StatusCode, Json<BookResponse>)> {
    claims.require_admin()?;

    let book = state.services.library.create_book(claims.user_id, data).await?;
    Ok((
        StatusCode::CREATED,
        Json(BookResponse {
            message: "Add successfully!".to_string(),
            book,
        }),
    ))
}

/// Get a book; counts as one page view
#[utoipa::path(
    get,
    path = "/library/{book_id}",
    tag = "library",
    params(("book_id" = Uuid, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = BookEntry),
        (status = 400, description = "Malformed book id"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    PathParam(book_id): PathParam<Uuid>,
) -> AppResult<Json<BookEntry>> {
    let book = state.services.library.view_book(book_id).await?;
    Ok(Json(book))
}

/// Delete a book owned by the caller
#[utoipa::path(
    get,
    path = "/library/{book_id}/remove",
    tag = "library",
    security(("bearer_auth" = [])),
    params(("book_id" = Uuid, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book deleted", body = MessageResponse),
        (status = 403, description = "Not an administrator"),
        (status = 404, description = "No such book owned by the caller")
    )
)]
pub async fn remove_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    PathParam(book_id): PathParam<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    claims.require_admin()?;

    state.services.library.delete_book(book_id, claims.user_id).await?;
    Ok(Json(MessageResponse {
        message: "Delete the book successfully!".to_string(),
    }))
}

/// Edit a book owned by the caller
#[utoipa::path(
    post,
    path = "/library/{book_id}/edit",
    tag = "library",
    security(("bearer_auth" = [])),
    params(("book_id" = Uuid, Path, description = "Book ID")),
    request_body = UpdateBook,
    responses(
        (status = 200, description = "Book updated", body = BookResponse),
        (status = 400, description = "Invalid field value"),
        (status = 403, description = "Not an administrator"),
        (status = 404, description = "No such book owned by the caller")
    )
)]
pub async fn edit_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    PathParam(book_id): PathParam<Uuid>,
    JsonBody(patch): JsonBody<UpdateBook>,
) -> AppResult<Json<BookResponse>> {
    claims.require_admin()?;

    let book = state
        .services
        .library
        .edit_book(book_id, claims.user_id, patch)
        .await?;
    Ok(Json(BookResponse {
        message: "Edit book success!".to_string(),
        book,
    }))
}

/// Borrow one copy of a book
#[utoipa::path(
    get,
    path = "/library/{book_id}/borrow",
    tag = "library",
    security(("bearer_auth" = [])),
    params(("book_id" = Uuid, Path, description = "Book ID")),
    responses(
        (status = 201, description = "Book borrowed", body = BorrowResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Book not found"),
        (status = 409, description = "Zero inventory")
    )
)]
pub async fn borrow_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    PathParam(book_id): PathParam<Uuid>,
) -> AppResult<(StatusCode, Json<BorrowResponse>)> {
    let borrowed = state
        .services
        .borrows
        .borrow_book(book_id, claims.user_id)
        .await?;

    // The borrow is committed; a failed count only leaves it unknown.
    let borrow_count = match state.services.borrows.borrow_count(book_id).await {
        Ok(count) => Some(count),
        Err(e) => {
            tracing::warn!("Borrow count unavailable for book {}: {}", book_id, e);
            None
        }
    };

    Ok((
        StatusCode::CREATED,
        Json(BorrowResponse {
            message: "Borrow Successfully!".to_string(),
            borrow: borrowed.record,
            inventory: borrowed.remaining,
            borrow_count,
        }),
    ))
}
