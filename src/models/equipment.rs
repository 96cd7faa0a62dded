//! Equipment and maintenance-log models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::enums::{Category, EquipmentStatus};

/// A single maintenance-log entry.
///
/// Entries are append-only; the only field that ever changes after creation
/// is `resolved_at`, and only on the most recent entry of an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceLog {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub description: String,
    /// Display name of the reporter
    pub reported_by: String,
    /// Identity used for notification targeting on resolve
    pub reported_by_id: Uuid,
    pub resolved_at: Option<DateTime<Utc>>,
}

/// Equipment record with its embedded log sequence.
///
/// Invariant: `status == Maintenance` exactly when the last log entry has no
/// `resolved_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Equipment {
    pub id: Uuid,
    pub name: String,
    pub brand: String,
    pub category: Category,
    pub status: EquipmentStatus,
    pub purchase_date: NaiveDate,
    /// Insertion order = chronological order
    pub logs: Vec<MaintenanceLog>,
}

impl Equipment {
    /// The entry awaiting resolution, if the item is under maintenance.
    ///
    /// By the status invariant this is always the last entry of the sequence.
    pub fn open_log(&self) -> Option<&MaintenanceLog> {
        self.logs.last().filter(|log| log.resolved_at.is_none())
    }
}

/// Internal row structure for the equipment table (logs live in a child table)
#[derive(Debug, Clone, FromRow)]
pub struct EquipmentRow {
    pub id: Uuid,
    pub name: String,
    pub brand: String,
    pub category: Category,
    pub status: EquipmentStatus,
    pub purchase_date: NaiveDate,
}

impl EquipmentRow {
    pub fn into_equipment(self, logs: Vec<MaintenanceLog>) -> Equipment {
        Equipment {
            id: self.id,
            name: self.name,
            brand: self.brand,
            category: self.category,
            status: self.status,
            purchase_date: self.purchase_date,
            logs,
        }
    }
}

/// Internal row structure for maintenance_logs queries
#[derive(Debug, Clone, FromRow)]
pub struct MaintenanceLogRow {
    pub id: Uuid,
    pub equipment_id: Uuid,
    pub date: DateTime<Utc>,
    pub description: String,
    pub reported_by: String,
    pub reported_by_id: Uuid,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl From<MaintenanceLogRow> for MaintenanceLog {
    fn from(row: MaintenanceLogRow) -> Self {
        MaintenanceLog {
            id: row.id,
            date: row.date,
            description: row.description,
            reported_by: row.reported_by,
            reported_by_id: row.reported_by_id,
            resolved_at: row.resolved_at,
        }
    }
}

/// Create equipment request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEquipment {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: String,
    #[validate(length(min = 1, message = "Brand must not be empty"))]
    pub brand: String,
    pub category: Category,
    pub purchase_date: NaiveDate,
    /// Defaults to `available`
    pub status: Option<EquipmentStatus>,
}

/// Update equipment request (status is changed through its own endpoint)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEquipment {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "Brand must not be empty"))]
    pub brand: Option<String>,
    pub category: Option<Category>,
    pub purchase_date: Option<NaiveDate>,
}

/// Status toggle request
#[derive(Debug, Deserialize, ToSchema)]
pub struct SetStatusRequest {
    pub status: EquipmentStatus,
}

/// Issue report request. Reporter identity comes from the authenticated
/// caller, never from the body.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ReportIssueRequest {
    #[validate(length(min = 1, message = "Description must not be empty"))]
    pub description: String,
}
