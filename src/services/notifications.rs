//! Notification router
//!
//! Builds and persists notification records for lifecycle events and answers
//! per-viewer reads. Delivery is pull-based: clients poll `list_for` on the
//! interval advertised in the server configuration.

use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        enums::{NotificationKind, UserRole},
        notification::{AppNotification, Recipient},
    },
    store::Store,
};

#[derive(Clone)]
pub struct NotificationService {
    store: Store,
}

impl NotificationService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Create and persist a fresh unread notification for `recipient`.
    pub async fn emit(
        &self,
        recipient: Recipient,
        message: impl Into<String>,
        kind: NotificationKind,
        related_equipment_id: Option<Uuid>,
    ) -> AppResult<AppNotification> {
        let notification = AppNotification::new(recipient, message, kind, related_equipment_id);
        tracing::info!(
            id = %notification.id,
            kind = %notification.kind,
            "Emitting notification: {}",
            notification.message
        );
        self.store.notifications.insert(&notification).await
    }

    /// Everything visible to the viewer, newest first.
    pub async fn list_for(
        &self,
        viewer_id: Uuid,
        viewer_role: UserRole,
    ) -> AppResult<Vec<AppNotification>> {
        self.store.notifications.list_for(viewer_id, viewer_role).await
    }

    /// Idempotent single mark-read; unknown ids are a no-op.
    pub async fn mark_read(&self, id: Uuid) -> AppResult<()> {
        self.store.notifications.mark_read(id).await
    }

    /// Mark read everything `list_for` would return for this viewer.
    pub async fn mark_all_read(&self, viewer_id: Uuid, viewer_role: UserRole) -> AppResult<()> {
        self.store.notifications.mark_all_read(viewer_id, viewer_role).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> NotificationService {
        NotificationService::new(Store::memory())
    }

    #[tokio::test]
    async fn emit_creates_unread_with_exactly_one_recipient() {
        let svc = service();
        let broadcast = svc
            .emit(Recipient::Role(UserRole::Admin), "hi", NotificationKind::Alert, None)
            .await
            .unwrap();
        assert!(!broadcast.read);
        assert_eq!(broadcast.recipient_role, Some(UserRole::Admin));
        assert_eq!(broadcast.recipient_user_id, None);

        let target = Uuid::new_v4();
        let direct = svc
            .emit(Recipient::User(target), "hi", NotificationKind::Success, None)
            .await
            .unwrap();
        assert_eq!(direct.recipient_role, None);
        assert_eq!(direct.recipient_user_id, Some(target));
    }

    #[tokio::test]
    async fn visibility_is_role_or_identity() {
        let svc = service();
        let viewer = Uuid::new_v4();

        let a = svc
            .emit(Recipient::Role(UserRole::Admin), "a", NotificationKind::Alert, None)
            .await
            .unwrap();
        let b = svc
            .emit(Recipient::User(viewer), "b", NotificationKind::Success, None)
            .await
            .unwrap();
        let c = svc
            .emit(Recipient::Role(UserRole::User), "c", NotificationKind::Info, None)
            .await
            .unwrap();

        let visible = svc.list_for(viewer, UserRole::User).await.unwrap();
        let ids: Vec<Uuid> = visible.iter().map(|n| n.id).collect();
        // Newest first; the admin broadcast is not visible
        assert_eq!(ids, vec![c.id, b.id]);
        assert!(!ids.contains(&a.id));
    }

    #[tokio::test]
    async fn mark_read_twice_equals_once() {
        let svc = service();
        let viewer = Uuid::new_v4();
        let n = svc
            .emit(Recipient::User(viewer), "hi", NotificationKind::Info, None)
            .await
            .unwrap();

        svc.mark_read(n.id).await.unwrap();
        let after_once = svc.list_for(viewer, UserRole::User).await.unwrap();
        svc.mark_read(n.id).await.unwrap();
        let after_twice = svc.list_for(viewer, UserRole::User).await.unwrap();

        assert_eq!(after_once, after_twice);
        assert!(after_twice[0].read);
    }

    #[tokio::test]
    async fn mark_all_read_covers_exactly_the_visible_set() {
        let svc = service();
        let viewer = Uuid::new_v4();

        svc.emit(Recipient::User(viewer), "mine", NotificationKind::Info, None)
            .await
            .unwrap();
        svc.emit(Recipient::Role(UserRole::User), "cohort", NotificationKind::Info, None)
            .await
            .unwrap();
        let foreign = svc
            .emit(Recipient::Role(UserRole::Admin), "admins", NotificationKind::Alert, None)
            .await
            .unwrap();

        svc.mark_all_read(viewer, UserRole::User).await.unwrap();

        let visible = svc.list_for(viewer, UserRole::User).await.unwrap();
        assert_eq!(visible.len(), 2);
        assert!(visible.iter().all(|n| n.read));

        let admin_view = svc.list_for(Uuid::new_v4(), UserRole::Admin).await.unwrap();
        assert_eq!(admin_view[0].id, foreign.id);
        assert!(!admin_view[0].read);
    }
}
