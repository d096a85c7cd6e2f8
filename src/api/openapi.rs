//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{borrows, health, library, MessageResponse};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Library API",
        version = "0.1.0",
        description = "Book catalogue and borrowing REST API"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Library
        library::list_books,
        library::create_book,
        library::get_book,
        library::remove_book,
        library::edit_book,
        library::borrow_book,
        // Borrows
        borrows::my_borrows,
    ),
    components(
        schemas(
            crate::models::book::Book,
            crate::models::book::BookEntry,
            crate::models::book::BookQuery,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            crate::models::borrow::BorrowRecord,
            crate::models::borrow::UserBorrow,
            library::BooksListResponse,
            library::BookResponse,
            library::BorrowResponse,
            health::HealthResponse,
            MessageResponse,
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "library", description = "Book catalogue and borrowing"),
        (name = "borrows", description = "Borrow ledger")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
