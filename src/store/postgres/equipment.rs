//! Equipment store over Postgres

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::EquipmentStatus,
        equipment::{Equipment, EquipmentRow, MaintenanceLog, MaintenanceLogRow},
    },
    store::EquipmentStore,
};

const EQUIPMENT_COLUMNS: &str = "id, name, brand, category, status, purchase_date";

#[derive(Clone)]
pub struct PgEquipmentStore {
    pool: Pool<Postgres>,
}

impl PgEquipmentStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Log sequences for the given equipment ids, in insertion order
    async fn load_logs(&self, ids: &[Uuid]) -> AppResult<HashMap<Uuid, Vec<MaintenanceLog>>> {
        let rows = sqlx::query_as::<_, MaintenanceLogRow>(
            r#"
            SELECT id, equipment_id, date, description, reported_by, reported_by_id, resolved_at
            FROM maintenance_logs
            WHERE equipment_id = ANY($1)
            ORDER BY seq
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        let mut grouped: HashMap<Uuid, Vec<MaintenanceLog>> = HashMap::new();
        for row in rows {
            grouped
                .entry(row.equipment_id)
                .or_default()
                .push(row.into());
        }
        Ok(grouped)
    }

    async fn load_one(&self, id: Uuid) -> AppResult<Option<Equipment>> {
        let row = sqlx::query_as::<_, EquipmentRow>(&format!(
            "SELECT {} FROM equipment WHERE id = $1",
            EQUIPMENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let mut logs = self.load_logs(&[id]).await?;
                Ok(Some(row.into_equipment(logs.remove(&id).unwrap_or_default())))
            }
            None => Ok(None),
        }
    }
}

#[async_trait]
impl EquipmentStore for PgEquipmentStore {
    async fn list(&self) -> AppResult<Vec<Equipment>> {
        let rows = sqlx::query_as::<_, EquipmentRow>(&format!(
            "SELECT {} FROM equipment ORDER BY name",
            EQUIPMENT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let mut logs = self.load_logs(&ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let entry = logs.remove(&row.id).unwrap_or_default();
                row.into_equipment(entry)
            })
            .collect())
    }

    async fn get(&self, id: Uuid) -> AppResult<Equipment> {
        self.load_one(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))
    }

    async fn save(&self, equipment: &Equipment) -> AppResult<Equipment> {
        let row = sqlx::query_as::<_, EquipmentRow>(&format!(
            r#"
            INSERT INTO equipment (id, name, brand, category, status, purchase_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                brand = EXCLUDED.brand,
                category = EXCLUDED.category,
                status = EXCLUDED.status,
                purchase_date = EXCLUDED.purchase_date
            RETURNING {}
            "#,
            EQUIPMENT_COLUMNS
        ))
        .bind(equipment.id)
        .bind(&equipment.name)
        .bind(&equipment.brand)
        .bind(equipment.category)
        .bind(equipment.status)
        .bind(equipment.purchase_date)
        .fetch_one(&self.pool)
        .await?;

        let id = row.id;
        let mut logs = self.load_logs(&[id]).await?;
        Ok(row.into_equipment(logs.remove(&id).unwrap_or_default()))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM equipment WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Equipment {} not found", id)));
        }
        Ok(())
    }

    async fn set_status(&self, id: Uuid, status: EquipmentStatus) -> AppResult<Equipment> {
        let row = sqlx::query_as::<_, EquipmentRow>(&format!(
            "UPDATE equipment SET status = $2 WHERE id = $1 RETURNING {}",
            EQUIPMENT_COLUMNS
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))?;

        let mut logs = self.load_logs(&[id]).await?;
        Ok(row.into_equipment(logs.remove(&id).unwrap_or_default()))
    }

    async fn append_log(&self, id: Uuid, log: MaintenanceLog) -> AppResult<Equipment> {
        sqlx::query_as::<_, EquipmentRow>(&format!(
            "UPDATE equipment SET status = 'maintenance' WHERE id = $1 RETURNING {}",
            EQUIPMENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))?;

        sqlx::query(
            r#"
            INSERT INTO maintenance_logs
                (id, equipment_id, date, description, reported_by, reported_by_id, resolved_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(log.id)
        .bind(id)
        .bind(log.date)
        .bind(&log.description)
        .bind(&log.reported_by)
        .bind(log.reported_by_id)
        .bind(log.resolved_at)
        .execute(&self.pool)
        .await?;

        self.get(id).await
    }

    async fn resolve(&self, id: Uuid, resolved_at: DateTime<Utc>) -> AppResult<Equipment> {
        // Existence first, so absent ids report NotFound rather than a
        // transition failure.
        sqlx::query_as::<_, EquipmentRow>(&format!(
            "SELECT {} FROM equipment WHERE id = $1",
            EQUIPMENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))?;

        let stamped = sqlx::query(
            r#"
            UPDATE maintenance_logs SET resolved_at = $2
            WHERE equipment_id = $1
              AND resolved_at IS NULL
              AND seq = (SELECT MAX(seq) FROM maintenance_logs WHERE equipment_id = $1)
            "#,
        )
        .bind(id)
        .bind(resolved_at)
        .execute(&self.pool)
        .await?;

        if stamped.rows_affected() == 0 {
            return Err(AppError::InvalidTransition(format!(
                "Equipment {} has no unresolved maintenance entry",
                id
            )));
        }

        let row = sqlx::query_as::<_, EquipmentRow>(&format!(
            "UPDATE equipment SET status = 'available' WHERE id = $1 RETURNING {}",
            EQUIPMENT_COLUMNS
        ))
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        let mut logs = self.load_logs(&[id]).await?;
        Ok(row.into_equipment(logs.remove(&id).unwrap_or_default()))
    }
}
