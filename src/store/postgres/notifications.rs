//! Notification store over Postgres

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{enums::UserRole, notification::AppNotification},
    store::NotificationStore,
};

const NOTIFICATION_COLUMNS: &str =
    "id, message, kind, date, is_read, recipient_role, recipient_user_id, related_equipment_id";

#[derive(Clone)]
pub struct PgNotificationStore {
    pool: Pool<Postgres>,
}

impl PgNotificationStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationStore for PgNotificationStore {
    async fn insert(&self, notification: &AppNotification) -> AppResult<AppNotification> {
        sqlx::query(
            r#"
            INSERT INTO notifications
                (id, message, kind, date, is_read, recipient_role, recipient_user_id, related_equipment_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(notification.id)
        .bind(&notification.message)
        .bind(notification.kind)
        .bind(notification.date)
        .bind(notification.read)
        .bind(notification.recipient_role)
        .bind(notification.recipient_user_id)
        .bind(notification.related_equipment_id)
        .execute(&self.pool)
        .await?;

        Ok(notification.clone())
    }

    async fn list_for(
        &self,
        viewer_id: Uuid,
        viewer_role: UserRole,
    ) -> AppResult<Vec<AppNotification>> {
        let rows = sqlx::query_as::<_, AppNotification>(&format!(
            r#"
            SELECT {}
            FROM notifications
            WHERE recipient_user_id = $1 OR recipient_role = $2
            ORDER BY date DESC
            "#,
            NOTIFICATION_COLUMNS
        ))
        .bind(viewer_id)
        .bind(viewer_role)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn mark_read(&self, id: Uuid) -> AppResult<()> {
        // Unconditional; unknown ids affect zero rows and that is fine
        sqlx::query("UPDATE notifications SET is_read = TRUE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn mark_all_read(&self, viewer_id: Uuid, viewer_role: UserRole) -> AppResult<()> {
        sqlx::query(
            "UPDATE notifications SET is_read = TRUE WHERE recipient_user_id = $1 OR recipient_role = $2",
        )
        .bind(viewer_id)
        .bind(viewer_role)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
