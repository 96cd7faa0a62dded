//! Health check and client-facing configuration endpoints

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

/// Health/readiness response body
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// Current status of the service
    pub status: String,
    /// Version of the service
    pub version: String,
}

/// Client configuration response body
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfigResponse {
    /// Refresh interval polling clients should use, in seconds
    pub poll_interval_secs: u64,
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness check endpoint
#[utoipa::path(
    get,
    path = "/ready",
    tag = "health",
    responses(
        (status = 200, description = "Service is ready", body = HealthResponse)
    )
)]
pub async fn readiness_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ready".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Configuration values polling clients need
#[utoipa::path(
    get,
    path = "/client-config",
    tag = "health",
    responses(
        (status = 200, description = "Client configuration", body = ClientConfigResponse)
    )
)]
pub async fn client_config(State(state): State<crate::AppState>) -> Json<ClientConfigResponse> {
    Json(ClientConfigResponse {
        poll_interval_secs: state.config.notifications.poll_interval_secs,
    })
}
