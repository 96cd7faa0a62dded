//! Notification model and addressing

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::enums::{NotificationKind, UserRole};

/// Who a notification is delivered to: every holder of a role, or exactly
/// one user. Never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
    Role(UserRole),
    User(Uuid),
}

/// A persisted notification.
///
/// Exactly one of `recipient_role` / `recipient_user_id` is set (enforced by
/// a check constraint in Postgres and by construction through
/// [`AppNotification::new`]). The read flag is global per notification: one
/// member of a role cohort marking a broadcast read marks it read for all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppNotification {
    pub id: Uuid,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub date: DateTime<Utc>,
    #[sqlx(rename = "is_read")]
    pub read: bool,
    pub recipient_role: Option<UserRole>,
    pub recipient_user_id: Option<Uuid>,
    pub related_equipment_id: Option<Uuid>,
}

impl AppNotification {
    /// Build a fresh unread notification addressed to `recipient`.
    pub fn new(
        recipient: Recipient,
        message: impl Into<String>,
        kind: NotificationKind,
        related_equipment_id: Option<Uuid>,
    ) -> Self {
        let (recipient_role, recipient_user_id) = match recipient {
            Recipient::Role(role) => (Some(role), None),
            Recipient::User(id) => (None, Some(id)),
        };
        Self {
            id: Uuid::new_v4(),
            message: message.into(),
            kind,
            date: Utc::now(),
            read: false,
            recipient_role,
            recipient_user_id,
            related_equipment_id,
        }
    }

    /// Whether this notification is visible to the given viewer.
    pub fn visible_to(&self, viewer_id: Uuid, viewer_role: UserRole) -> bool {
        self.recipient_role == Some(viewer_role) || self.recipient_user_id == Some(viewer_id)
    }
}
