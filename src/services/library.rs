//! Book catalogue service

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookEntry, BookQuery, CreateBook, NewBook, UpdateBook},
    repository::Repository,
};

const BOOK_NOT_FOUND: &str = "The book does not exist!";

#[derive(Clone)]
pub struct LibraryService {
    repository: Repository,
}

impl LibraryService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List books with their borrow counts.
    ///
    /// Counts come from a single batched lookup. If that lookup fails the
    /// books are still returned, each with an unknown (`None`) count.
    pub async fn list_books(&self, query: &BookQuery) -> AppResult<Vec<BookEntry>> {
        let books = self.repository.books.get_books(query).await?;
        let ids: Vec<Uuid> = books.iter().map(|b| b.id).collect();

        let counts = match self.repository.borrows.count_for_books(&ids).await {
            Ok(counts) => Some(counts),
            Err(e) => {
                tracing::warn!("Borrow counts unavailable for {} books: {}", ids.len(), e);
                None
            }
        };

        Ok(books
            .into_iter()
            .map(|book| {
                let borrow_count = counts
                    .as_ref()
                    .map(|c| c.get(&book.id).copied().unwrap_or(0));
                BookEntry { book, borrow_count }
            })
            .collect())
    }

    /// Create a book owned by `admin`
    pub async fn create_book(&self, admin: Uuid, data: CreateBook) -> AppResult<Book> {
        data.check()?;

        let book = NewBook::from_request(admin, data);
        let created = self.repository.books.create(&book).await?;

        tracing::info!("Book {} ({}) created by admin {}", created.id, created.name, admin);
        Ok(created)
    }

    /// Fetch a book for display and count the view.
    ///
    /// Fetch and increment run concurrently; the returned `pv` may or may
    /// not include this view.
    pub async fn view_book(&self, id: Uuid) -> AppResult<BookEntry> {
        let (entry, _) = tokio::try_join!(
            self.repository.books.get_book_by_id(id),
            self.repository.books.inc_pv(id),
        )?;

        entry.ok_or_else(|| AppError::NotFound(BOOK_NOT_FOUND.to_string()))
    }

    /// Delete a book owned by `admin`
    pub async fn delete_book(&self, id: Uuid, admin: Uuid) -> AppResult<()> {
        if !self.repository.books.delete_by_id(id, admin).await? {
            return Err(AppError::NotFound(format!(
                "Book {} not found among your books",
                id
            )));
        }

        tracing::info!("Book {} removed by admin {}", id, admin);
        Ok(())
    }

    /// Apply the supplied fields to a book owned by `admin`
    pub async fn edit_book(&self, id: Uuid, admin: Uuid, patch: UpdateBook) -> AppResult<Book> {
        patch.check()?;

        self.repository
            .books
            .update_by_id(id, admin, &patch)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found among your books", id)))
    }

    /// Check the backing store
    pub async fn ping(&self) -> AppResult<()> {
        self.repository.books.ping().await
    }
}
