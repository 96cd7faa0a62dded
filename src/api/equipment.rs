//! Equipment lifecycle endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::equipment::{
        CreateEquipment, Equipment, ReportIssueRequest, SetStatusRequest, UpdateEquipment,
    },
};

use super::AuthenticatedUser;

/// List all equipment
#[utoipa::path(
    get,
    path = "/equipment",
    tag = "equipment",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Equipment list", body = Vec<Equipment>)
    )
)]
pub async fn list_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Equipment>>> {
    let equipment = state.services.equipment.list().await?;
    Ok(Json(equipment))
}

/// Get equipment by ID
#[utoipa::path(
    get,
    path = "/equipment/{id}",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Equipment ID")),
    responses(
        (status = 200, description = "Equipment details", body = Equipment),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn get_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Equipment>> {
    let equipment = state.services.equipment.get(id).await?;
    Ok(Json(equipment))
}

/// Create equipment (admin)
#[utoipa::path(
    post,
    path = "/equipment",
    tag = "equipment",
    security(("bearer_auth" = [])),
    request_body = CreateEquipment,
    responses(
        (status = 201, description = "Equipment created", body = Equipment),
        (status = 403, description = "Not an administrator")
    )
)]
pub async fn create_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateEquipment>,
) -> AppResult<(StatusCode, Json<Equipment>)> {
    claims.require_admin()?;
    let equipment = state.services.equipment.create(data).await?;
    Ok((StatusCode::CREATED, Json(equipment)))
}

/// Update equipment fields (admin)
#[utoipa::path(
    put,
    path = "/equipment/{id}",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Equipment ID")),
    request_body = UpdateEquipment,
    responses(
        (status = 200, description = "Equipment updated", body = Equipment),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn update_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateEquipment>,
) -> AppResult<Json<Equipment>> {
    claims.require_admin()?;
    let equipment = state.services.equipment.update(id, data).await?;
    Ok(Json(equipment))
}

/// Delete equipment (admin)
#[utoipa::path(
    delete,
    path = "/equipment/{id}",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Equipment ID")),
    responses(
        (status = 204, description = "Equipment deleted"),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn delete_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    claims.require_admin()?;
    state.services.equipment.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Toggle status between available and in_use
#[utoipa::path(
    put,
    path = "/equipment/{id}/status",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Equipment ID")),
    request_body = SetStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = Equipment),
        (status = 404, description = "Equipment not found"),
        (status = 422, description = "Transition rejected by the maintenance gate")
    )
)]
pub async fn set_status(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(data): Json<SetStatusRequest>,
) -> AppResult<Json<Equipment>> {
    let equipment = state.services.equipment.set_status(id, data.status).await?;
    Ok(Json(equipment))
}

/// Report an issue, moving the item into maintenance
#[utoipa::path(
    post,
    path = "/equipment/{id}/logs",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Equipment ID")),
    request_body = ReportIssueRequest,
    responses(
        (status = 200, description = "Issue recorded", body = Equipment),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn report_issue(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(data): Json<ReportIssueRequest>,
) -> AppResult<Json<Equipment>> {
    let equipment = state
        .services
        .equipment
        .report_issue(id, data, claims.user_id, &claims.name)
        .await?;
    Ok(Json(equipment))
}

/// Resolve the open maintenance entry (admin)
#[utoipa::path(
    post,
    path = "/equipment/{id}/resolve",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Equipment ID")),
    responses(
        (status = 200, description = "Maintenance resolved", body = Equipment),
        (status = 404, description = "Equipment not found"),
        (status = 422, description = "Item is not under maintenance")
    )
)]
pub async fn resolve_maintenance(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Equipment>> {
    claims.require_admin()?;
    let equipment = state.services.equipment.resolve(id).await?;
    Ok(Json(equipment))
}
