//! Borrow workflow service

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::borrow::{BorrowOutcome, BorrowRecord, UserBorrow},
    repository::Repository,
};

const ZERO_INVENTORY: &str = "Zero inventory!";
const BOOK_NOT_FOUND: &str = "The book does not exist!";

/// A completed borrow
#[derive(Debug, Clone)]
pub struct Borrowed {
    pub record: BorrowRecord,
    /// Inventory left after this borrow
    pub remaining: i32,
}

#[derive(Clone)]
pub struct BorrowService {
    repository: Repository,
}

impl BorrowService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Borrow one copy of a book for `user_id`.
    ///
    /// The inventory decrement and the ledger insert happen in one store
    /// operation; a borrow racing for the last copy gets "Zero inventory!".
    pub async fn borrow_book(&self, book_id: Uuid, user_id: Uuid) -> AppResult<Borrowed> {
        let book = self
            .repository
            .books
            .get_raw_book_by_id(book_id)
            .await?
            .ok_or_else(|| AppError::NotFound(BOOK_NOT_FOUND.to_string()))?;

        if book.inventory < 1 {
            return Err(AppError::Unavailable(ZERO_INVENTORY.to_string()));
        }

        match self.repository.borrows.borrow(book_id, user_id).await? {
            BorrowOutcome::Borrowed { record, remaining } => {
                tracing::info!(
                    "User {} borrowed book {} ({} left)",
                    user_id,
                    book_id,
                    remaining
                );
                Ok(Borrowed { record, remaining })
            }
            BorrowOutcome::OutOfStock => {
                tracing::debug!("Book {} ran out of stock before user {} could borrow it", book_id, user_id);
                Err(AppError::Unavailable(ZERO_INVENTORY.to_string()))
            }
            BorrowOutcome::NoSuchBook => Err(AppError::NotFound(BOOK_NOT_FOUND.to_string())),
        }
    }

    /// Number of borrow records for a book
    pub async fn borrow_count(&self, book_id: Uuid) -> AppResult<i64> {
        self.repository.borrows.count_for_book(book_id).await
    }

    /// Borrows made by a user
    pub async fn user_borrows(&self, user_id: Uuid) -> AppResult<Vec<UserBorrow>> {
        self.repository.borrows.list_for_user(user_id).await
    }
}
