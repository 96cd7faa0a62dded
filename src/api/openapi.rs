//! OpenAPI documentation

use axum::Router;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, equipment, health, notifications, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Backline API",
        version = "1.0.0",
        description = "Audio Equipment Inventory & Maintenance REST API",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT"),
        contact(name = "Backline Team")
    ),
    servers(
        (url = "/api", description = "API root")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        health::client_config,
        // Auth
        auth::login,
        auth::me,
        // Equipment
        equipment::list_equipment,
        equipment::get_equipment,
        equipment::create_equipment,
        equipment::update_equipment,
        equipment::delete_equipment,
        equipment::set_status,
        equipment::report_issue,
        equipment::resolve_maintenance,
        // Notifications
        notifications::list_notifications,
        notifications::mark_read,
        notifications::mark_all_read,
        // Users
        users::list_users,
        users::create_user,
        users::delete_user,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            // Equipment
            crate::models::equipment::Equipment,
            crate::models::equipment::MaintenanceLog,
            crate::models::equipment::CreateEquipment,
            crate::models::equipment::UpdateEquipment,
            crate::models::equipment::SetStatusRequest,
            crate::models::equipment::ReportIssueRequest,
            // Notifications
            crate::models::notification::AppNotification,
            // Users
            crate::models::user::User,
            crate::models::user::CreateUser,
            // Enums
            crate::models::enums::UserRole,
            crate::models::enums::EquipmentStatus,
            crate::models::enums::Category,
            crate::models::enums::NotificationKind,
            // Health
            health::HealthResponse,
            health::ClientConfigResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "equipment", description = "Equipment lifecycle management"),
        (name = "notifications", description = "Notification delivery and read state"),
        (name = "users", description = "User management")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
