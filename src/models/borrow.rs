//! Borrow ledger model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// One borrow of one book by one user
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BorrowRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub book_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Borrow record joined with the borrowed book's name
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct UserBorrow {
    pub id: Uuid,
    pub book_id: Uuid,
    pub book_name: String,
    pub created_at: DateTime<Utc>,
}

/// Result of the atomic decrement-and-record operation
#[derive(Debug, Clone)]
pub enum BorrowOutcome {
    Borrowed {
        record: BorrowRecord,
        /// Inventory left after the decrement
        remaining: i32,
    },
    OutOfStock,
    NoSuchBook,
}
