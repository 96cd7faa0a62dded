//! Notification endpoints
//!
//! The viewer identity always comes from the token claims; there is no way
//! to read or mark another viewer's set.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{error::AppResult, models::notification::AppNotification};

use super::AuthenticatedUser;

/// List notifications visible to the caller, newest first
#[utoipa::path(
    get,
    path = "/notifications",
    tag = "notifications",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Visible notifications", body = Vec<AppNotification>)
    )
)]
pub async fn list_notifications(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<AppNotification>>> {
    let notifications = state
        .services
        .notifications
        .list_for(claims.user_id, claims.role)
        .await?;
    Ok(Json(notifications))
}

/// Mark a single notification read (idempotent)
#[utoipa::path(
    post,
    path = "/notifications/{id}/read",
    tag = "notifications",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Notification ID")),
    responses(
        (status = 204, description = "Marked read")
    )
)]
pub async fn mark_read(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.services.notifications.mark_read(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Mark every notification visible to the caller read
#[utoipa::path(
    post,
    path = "/notifications/read-all",
    tag = "notifications",
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Marked read")
    )
)]
pub async fn mark_all_read(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<StatusCode> {
    state
        .services
        .notifications
        .mark_all_read(claims.user_id, claims.role)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
