//! Data models for the library server

pub mod book;
pub mod borrow;
pub mod user;

// Re-export commonly used types
pub use book::{Book, BookEntry, BookQuery};
pub use borrow::{BorrowOutcome, BorrowRecord};
pub use user::{AccountTypeSlug, UserClaims};
