//! Books repository for database operations

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use super::BookStore;
use crate::{
    error::AppResult,
    models::book::{Book, BookEntry, BookQuery, NewBook, UpdateBook},
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookStore for BooksRepository {
    async fn get_books(&self, filter: &BookQuery) -> AppResult<Vec<Book>> {
        let books = match filter.admin {
            Some(admin) => {
                sqlx::query_as::<_, Book>(
                    "SELECT * FROM books WHERE admin = $1 ORDER BY created_at DESC",
                )
                .bind(admin)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Book>("SELECT * FROM books ORDER BY created_at DESC")
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(books)
    }

    async fn get_book_by_id(&self, id: Uuid) -> AppResult<Option<BookEntry>> {
        let entry = sqlx::query_as::<_, BookEntry>(
            r#"
            SELECT b.*,
                   (SELECT COUNT(*) FROM borrows br WHERE br.book_id = b.id) AS borrow_count
            FROM books b
            WHERE b.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(entry)
    }

    async fn get_raw_book_by_id(&self, id: Uuid) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(book)
    }

    async fn inc_pv(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("UPDATE books SET pv = pv + 1 WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn create(&self, book: &NewBook) -> AppResult<Book> {
        let row = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (
                id, admin, name, author, press, inventory,
                date, score, cover, introduction, pv, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, 0, $11)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(book.admin)
        .bind(&book.name)
        .bind(&book.author)
        .bind(&book.press)
        .bind(book.inventory)
        .bind(&book.date)
        .bind(book.score)
        .bind(&book.cover)
        .bind(&book.introduction)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete_by_id(&self, id: Uuid, owner: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1 AND admin = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn update_by_id(&self, id: Uuid, owner: Uuid, patch: &UpdateBook) -> AppResult<Option<Book>> {
        let now = Utc::now();
        let mut sets = vec!["updated_at = $1".to_string()];
        let mut idx = 2;

        macro_rules! add_field {
            ($field:expr, $name:expr) => {
                if $field.is_some() {
                    sets.push(format!("{} = ${}", $name, idx));
                    idx += 1;
                }
            };
        }

        add_field!(patch.name, "name");
        add_field!(patch.author, "author");
        add_field!(patch.press, "press");
        add_field!(patch.inventory, "inventory");
        add_field!(patch.date, "date");
        add_field!(patch.score, "score");
        add_field!(patch.introduction, "introduction");

        let query = format!(
            "UPDATE books SET {} WHERE id = ${} AND admin = ${} RETURNING *",
            sets.join(", "),
            idx,
            idx + 1
        );

        let mut builder = sqlx::query_as::<_, Book>(&query).bind(now);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(patch.name);
        bind_field!(patch.author);
        bind_field!(patch.press);
        bind_field!(patch.inventory);
        bind_field!(patch.date);
        bind_field!(patch.score);
        bind_field!(patch.introduction);

        let book = builder
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await?;
        Ok(book)
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
