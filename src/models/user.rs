//! Identity carried by session tokens

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::AppError;

/// Account type slug (string identifier)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AccountTypeSlug {
    Reader,
    Admin,
}

impl AccountTypeSlug {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountTypeSlug::Reader => "reader",
            AccountTypeSlug::Admin => "admin",
        }
    }
}

impl std::fmt::Display for AccountTypeSlug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// JWT Claims for authenticated users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    /// Login name
    pub sub: String,
    pub user_id: Uuid,
    pub account_type: AccountTypeSlug,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Claims valid for `hours` from now
    pub fn new(sub: impl Into<String>, user_id: Uuid, account_type: AccountTypeSlug, hours: i64) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            sub: sub.into(),
            user_id,
            account_type,
            exp: now + hours * 3600,
            iat: now,
        }
    }

    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    /// Check if user is admin (account_type = "admin")
    pub fn is_admin(&self) -> bool {
        self.account_type == AccountTypeSlug::Admin
    }

    /// Require admin privileges
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            tracing::debug!(
                "User {} ({}) denied an admin action",
                self.user_id,
                self.account_type
            );
            Err(AppError::Authorization("Administrator privileges required".to_string()))
        }
    }
}
