//! Book model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Order in which failing fields are reported; only the first is shown.
const CHECK_ORDER: [&str; 3] = ["name", "introduction", "inventory"];

/// Book record from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: Uuid,
    /// Id of the admin who owns (created) the record
    pub admin: Uuid,
    pub name: String,
    pub author: Option<String>,
    pub press: Option<String>,
    /// Copies available for borrowing
    pub inventory: i32,
    /// Publication date, as entered by the admin
    pub date: Option<String>,
    pub score: i32,
    /// Cover image file name
    pub cover: Option<String>,
    pub introduction: String,
    /// Page-view counter
    pub pv: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Book with the number of borrow records referencing it
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookEntry {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub book: Book,
    /// `None` when the count could not be fetched
    pub borrow_count: Option<i64>,
}

/// Query parameters for the book list
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct BookQuery {
    /// Only list books owned by this admin
    pub admin: Option<Uuid>,
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[serde(default)]
    #[validate(length(min = 1, message = "Please fill in the name!"))]
    pub name: String,
    pub author: Option<String>,
    pub press: Option<String>,
    #[validate(range(min = 0, message = "Inventory cannot be negative!"))]
    pub inventory: Option<i32>,
    pub date: Option<String>,
    pub score: Option<i32>,
    #[serde(default)]
    #[validate(length(min = 1, message = "Please fill in the introduction!"))]
    pub introduction: String,
    /// Stored path of the uploaded cover; only the file name is kept
    pub cover: Option<String>,
}

/// Update book request; absent fields are left untouched
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[validate(length(min = 1, message = "Please fill in the name!"))]
    pub name: Option<String>,
    pub author: Option<String>,
    pub press: Option<String>,
    #[validate(range(min = 0, message = "Inventory cannot be negative!"))]
    pub inventory: Option<i32>,
    pub date: Option<String>,
    pub score: Option<i32>,
    #[validate(length(min = 1, message = "Please fill in the introduction!"))]
    pub introduction: Option<String>,
}

impl CreateBook {
    pub fn check(&self) -> AppResult<()> {
        self.validate()
            .map_err(|e| AppError::first_invalid(&e, &CHECK_ORDER))
    }
}

impl UpdateBook {
    pub fn check(&self) -> AppResult<()> {
        self.validate()
            .map_err(|e| AppError::first_invalid(&e, &CHECK_ORDER))
    }
}

/// Validated book ready to be inserted
#[derive(Debug, Clone)]
pub struct NewBook {
    pub admin: Uuid,
    pub name: String,
    pub author: Option<String>,
    pub press: Option<String>,
    pub inventory: i32,
    pub date: Option<String>,
    pub score: i32,
    pub cover: Option<String>,
    pub introduction: String,
}

impl NewBook {
    pub fn from_request(admin: Uuid, data: CreateBook) -> Self {
        Self {
            admin,
            name: data.name,
            author: data.author,
            press: data.press,
            inventory: data.inventory.unwrap_or(0),
            date: data.date,
            score: data.score.unwrap_or(0),
            cover: data.cover.as_deref().and_then(cover_file_name),
            introduction: data.introduction,
        }
    }
}

/// Last path component of an uploaded file's stored path.
pub fn cover_file_name(path: &str) -> Option<String> {
    path.rsplit(['/', '\\'])
        .next()
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}
