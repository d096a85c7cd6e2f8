//! Repository layer for database operations

pub mod books;
pub mod borrows;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        book::{Book, BookEntry, BookQuery, NewBook, UpdateBook},
        borrow::{BorrowOutcome, UserBorrow},
    },
};

/// Book catalogue storage.
///
/// Mutations that take an `owner` only touch records whose `admin`
/// matches it.
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Books matching the filter, newest first
    async fn get_books(&self, filter: &BookQuery) -> AppResult<Vec<Book>>;

    /// Book with its borrow count, for display
    async fn get_book_by_id(&self, id: Uuid) -> AppResult<Option<BookEntry>>;

    /// Bare book row
    async fn get_raw_book_by_id(&self, id: Uuid) -> AppResult<Option<Book>>;

    /// Add one to the page-view counter. Returns false if no such book.
    async fn inc_pv(&self, id: Uuid) -> AppResult<bool>;

    async fn create(&self, book: &NewBook) -> AppResult<Book>;

    /// Returns whether a record owned by `owner` was deleted
    async fn delete_by_id(&self, id: Uuid, owner: Uuid) -> AppResult<bool>;

    /// Apply the supplied fields; `None` if no record owned by `owner` matched
    async fn update_by_id(&self, id: Uuid, owner: Uuid, patch: &UpdateBook) -> AppResult<Option<Book>>;

    /// Check that the store answers
    async fn ping(&self) -> AppResult<()>;
}

/// Borrow ledger storage.
#[async_trait]
pub trait BorrowStore: Send + Sync {
    /// Decrement the book's inventory and record the borrow as one
    /// atomic unit. Nothing is written unless both steps succeed.
    async fn borrow(&self, book_id: Uuid, user_id: Uuid) -> AppResult<BorrowOutcome>;

    async fn count_for_book(&self, book_id: Uuid) -> AppResult<i64>;

    /// Borrow counts for a set of books in one lookup. Books without
    /// records are absent from the map.
    async fn count_for_books(&self, book_ids: &[Uuid]) -> AppResult<HashMap<Uuid, i64>>;

    /// A user's borrows, newest first
    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<UserBorrow>>;
}

/// Main repository struct holding the stores
#[derive(Clone)]
pub struct Repository {
    pub books: Arc<dyn BookStore>,
    pub borrows: Arc<dyn BorrowStore>,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            books: Arc::new(books::BooksRepository::new(pool.clone())),
            borrows: Arc::new(borrows::BorrowsRepository::new(pool)),
        }
    }

    /// Build a repository over arbitrary store implementations
    pub fn from_stores(books: Arc<dyn BookStore>, borrows: Arc<dyn BorrowStore>) -> Self {
        Self { books, borrows }
    }
}
