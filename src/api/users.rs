//! User management endpoints (admin only)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::user::{CreateUser, User},
};

use super::AuthenticatedUser;

/// List all users
#[utoipa::path(
    get,
    path = "/admin/users",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "User list", body = Vec<User>),
        (status = 403, description = "Not an administrator")
    )
)]
pub async fn list_users(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<User>>> {
    claims.require_admin()?;
    let users = state.services.users.list().await?;
    Ok(Json(users))
}

/// Create a new user
#[utoipa::path(
    post,
    path = "/admin/users",
    tag = "users",
    security(("bearer_auth" = [])),
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 403, description = "Not an administrator"),
        (status = 409, description = "Username already exists")
    )
)]
pub async fn create_user(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateUser>,
) -> AppResult<(StatusCode, Json<User>)> {
    claims.require_admin()?;
    let user = state.services.users.create_user(data).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/admin/users/{id}",
    tag = "users",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 400, description = "Cannot delete your own account"),
        (status = 403, description = "Not an administrator"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    claims.require_admin()?;
    state.services.users.delete_user(id, claims.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
