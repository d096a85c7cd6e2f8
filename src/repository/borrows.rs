//! Borrow ledger repository

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use super::BorrowStore;
use crate::{
    error::AppResult,
    models::borrow::{BorrowOutcome, BorrowRecord, UserBorrow},
};

#[derive(Clone)]
pub struct BorrowsRepository {
    pool: Pool<Postgres>,
}

impl BorrowsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BorrowStore for BorrowsRepository {
    async fn borrow(&self, book_id: Uuid, user_id: Uuid) -> AppResult<BorrowOutcome> {
        let now = Utc::now();
        // Dropping the transaction on an early return rolls it back.
        let mut tx = self.pool.begin().await?;

        let remaining: Option<i32> = sqlx::query_scalar(
            r#"
            UPDATE books SET inventory = inventory - 1, updated_at = $2
            WHERE id = $1 AND inventory >= 1
            RETURNING inventory
            "#,
        )
        .bind(book_id)
        .bind(now)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(remaining) = remaining else {
            let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE id = $1)")
                .bind(book_id)
                .fetch_one(&mut *tx)
                .await?;
            tx.rollback().await?;

            return Ok(if exists {
                BorrowOutcome::OutOfStock
            } else {
                BorrowOutcome::NoSuchBook
            });
        };

        let record = sqlx::query_as::<_, BorrowRecord>(
            r#"
            INSERT INTO borrows (id, user_id, book_id, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(book_id)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(BorrowOutcome::Borrowed { record, remaining })
    }

    async fn count_for_book(&self, book_id: Uuid) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM borrows WHERE book_id = $1")
            .bind(book_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn count_for_books(&self, book_ids: &[Uuid]) -> AppResult<HashMap<Uuid, i64>> {
        if book_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, (Uuid, i64)>(
            r#"
            SELECT book_id, COUNT(*)
            FROM borrows
            WHERE book_id = ANY($1)
            GROUP BY book_id
            "#,
        )
        .bind(book_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().collect())
    }

    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<UserBorrow>> {
        let rows = sqlx::query_as::<_, UserBorrow>(
            r#"
            SELECT br.id, br.book_id, b.name AS book_name, br.created_at
            FROM borrows br
            JOIN books b ON b.id = br.book_id
            WHERE br.user_id = $1
            ORDER BY br.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
