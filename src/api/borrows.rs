//! Borrow ledger endpoints

use axum::{extract::State, Json};

use crate::{error::AppResult, models::borrow::UserBorrow};

use super::AuthenticatedUser;

/// Borrows of the calling user, newest first
#[utoipa::path(
    get,
    path = "/borrows/me",
    tag = "borrows",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's borrows", body = Vec<UserBorrow>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn my_borrows(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<UserBorrow>>> {
    let borrows = state.services.borrows.user_borrows(claims.user_id).await?;
    Ok(Json(borrows))
}
