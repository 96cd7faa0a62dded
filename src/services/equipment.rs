//! Equipment lifecycle manager
//!
//! Owns equipment records and enforces the status transitions:
//! `available` ↔ `in_use` freely, `maintenance` entered only by reporting an
//! issue and exited only by an explicit resolve. Reportable transitions hand
//! an event to the notification router.

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::{EquipmentStatus, NotificationKind, UserRole},
        equipment::{
            CreateEquipment, Equipment, MaintenanceLog, ReportIssueRequest, UpdateEquipment,
        },
        notification::Recipient,
    },
    store::Store,
};

use super::notifications::NotificationService;

#[derive(Clone)]
pub struct EquipmentService {
    store: Store,
    notifications: NotificationService,
}

impl EquipmentService {
    pub fn new(store: Store, notifications: NotificationService) -> Self {
        Self {
            store,
            notifications,
        }
    }

    pub async fn list(&self) -> AppResult<Vec<Equipment>> {
        self.store.equipment.list().await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Equipment> {
        self.store.equipment.get(id).await
    }

    /// Create a new record; status defaults to `available`, empty log
    /// sequence.
    pub async fn create(&self, data: CreateEquipment) -> AppResult<Equipment> {
        data.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let equipment = Equipment {
            id: Uuid::new_v4(),
            name: data.name,
            brand: data.brand,
            category: data.category,
            status: data.status.unwrap_or(EquipmentStatus::Available),
            purchase_date: data.purchase_date,
            logs: Vec::new(),
        };
        self.store.equipment.save(&equipment).await
    }

    /// Edit record fields. Status changes go through `set_status`.
    pub async fn update(&self, id: Uuid, data: UpdateEquipment) -> AppResult<Equipment> {
        data.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let mut equipment = self.store.equipment.get(id).await?;
        if let Some(name) = data.name {
            equipment.name = name;
        }
        if let Some(brand) = data.brand {
            equipment.brand = brand;
        }
        if let Some(category) = data.category {
            equipment.category = category;
        }
        if let Some(purchase_date) = data.purchase_date {
            equipment.purchase_date = purchase_date;
        }
        self.store.equipment.save(&equipment).await
    }

    /// Remove the record. Notifications that reference it keep their
    /// advisory `relatedEquipmentId`; that is non-fatal.
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.store.equipment.delete(id).await
    }

    /// Toggle between `available` and `in_use`.
    ///
    /// `maintenance` is a strict gate on both sides: it cannot be the target
    /// of a toggle, and an item under maintenance rejects toggles until it
    /// is explicitly resolved. Failures leave stored state unchanged.
    pub async fn set_status(&self, id: Uuid, target: EquipmentStatus) -> AppResult<Equipment> {
        if target == EquipmentStatus::Maintenance {
            return Err(AppError::InvalidTransition(
                "Maintenance is entered by reporting an issue, not by a status toggle".to_string(),
            ));
        }

        let current = self.store.equipment.get(id).await?;
        if current.status == EquipmentStatus::Maintenance {
            return Err(AppError::InvalidTransition(format!(
                "{} is under maintenance and must be resolved first",
                current.name
            )));
        }

        self.store.equipment.set_status(id, target).await
    }

    /// Append an unresolved log entry and force the item into maintenance,
    /// alerting the admin cohort. The reporter identity comes from the
    /// authenticated caller.
    pub async fn report_issue(
        &self,
        id: Uuid,
        data: ReportIssueRequest,
        reporter_id: Uuid,
        reporter_name: &str,
    ) -> AppResult<Equipment> {
        data.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let log = MaintenanceLog {
            id: Uuid::new_v4(),
            date: Utc::now(),
            description: data.description,
            reported_by: reporter_name.to_string(),
            reported_by_id: reporter_id,
            resolved_at: None,
        };
        let updated = self.store.equipment.append_log(id, log).await?;

        tracing::info!(
            equipment_id = %updated.id,
            "Issue reported on {} by {}",
            updated.name,
            reporter_name
        );

        self.notifications
            .emit(
                Recipient::Role(UserRole::Admin),
                format!("{} reported an issue with: {}", reporter_name, updated.name),
                NotificationKind::Alert,
                Some(updated.id),
            )
            .await?;

        Ok(updated)
    }

    /// Close the open maintenance entry: stamp `resolved_at` on the latest
    /// log, flip status back to `available` and notify the original
    /// reporter.
    pub async fn resolve(&self, id: Uuid) -> AppResult<Equipment> {
        let current = self.store.equipment.get(id).await?;
        if current.status != EquipmentStatus::Maintenance {
            return Err(AppError::InvalidTransition(format!(
                "{} is not under maintenance",
                current.name
            )));
        }

        let reporter_id = current.open_log().map(|log| log.reported_by_id);
        let updated = self.store.equipment.resolve(id, Utc::now()).await?;

        tracing::info!(equipment_id = %updated.id, "Maintenance resolved on {}", updated.name);

        if let Some(reporter_id) = reporter_id {
            self.notifications
                .emit(
                    Recipient::User(reporter_id),
                    format!(
                        "Equipment {} has been repaired and is available again.",
                        updated.name
                    ),
                    NotificationKind::Success,
                    Some(updated.id),
                )
                .await?;
        }

        Ok(updated)
    }
}
