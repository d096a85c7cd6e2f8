//! Business logic services

pub mod borrows;
pub mod library;

use crate::repository::Repository;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub library: library::LibraryService,
    pub borrows: borrows::BorrowService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> Self {
        Self {
            library: library::LibraryService::new(repository.clone()),
            borrows: borrows::BorrowService::new(repository),
        }
    }
}
