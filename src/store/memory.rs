//! In-process store for offline/demo operation
//!
//! Semantics mirror the Postgres implementation, ordering included: the
//! equipment listing is name-ordered, log sequences keep insertion order,
//! and notification reads are newest-first.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::{EquipmentStatus, UserRole},
        equipment::{Equipment, MaintenanceLog},
        notification::AppNotification,
        user::User,
    },
};

use super::{EquipmentStore, NotificationStore, UserStore};

#[derive(Default)]
struct MemoryState {
    equipment: Vec<Equipment>,
    notifications: Vec<AppNotification>,
    users: Vec<User>,
}

pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(MemoryState::default()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EquipmentStore for MemoryStore {
    async fn list(&self) -> AppResult<Vec<Equipment>> {
        let state = self.state.read().await;
        let mut items = state.equipment.clone();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(items)
    }

    async fn get(&self, id: Uuid) -> AppResult<Equipment> {
        let state = self.state.read().await;
        state
            .equipment
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))
    }

    async fn save(&self, equipment: &Equipment) -> AppResult<Equipment> {
        let mut state = self.state.write().await;
        if let Some(existing) = state.equipment.iter_mut().find(|e| e.id == equipment.id) {
            existing.name = equipment.name.clone();
            existing.brand = equipment.brand.clone();
            existing.category = equipment.category;
            existing.status = equipment.status;
            existing.purchase_date = equipment.purchase_date;
            Ok(existing.clone())
        } else {
            let stored = Equipment {
                logs: Vec::new(),
                ..equipment.clone()
            };
            state.equipment.push(stored.clone());
            Ok(stored)
        }
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut state = self.state.write().await;
        let before = state.equipment.len();
        state.equipment.retain(|e| e.id != id);
        if state.equipment.len() == before {
            return Err(AppError::NotFound(format!("Equipment {} not found", id)));
        }
        Ok(())
    }

    async fn set_status(&self, id: Uuid, status: EquipmentStatus) -> AppResult<Equipment> {
        let mut state = self.state.write().await;
        let item = state
            .equipment
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))?;
        item.status = status;
        Ok(item.clone())
    }

    async fn append_log(&self, id: Uuid, log: MaintenanceLog) -> AppResult<Equipment> {
        let mut state = self.state.write().await;
        let item = state
            .equipment
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))?;
        item.logs.push(log);
        item.status = EquipmentStatus::Maintenance;
        Ok(item.clone())
    }

    async fn resolve(&self, id: Uuid, resolved_at: DateTime<Utc>) -> AppResult<Equipment> {
        let mut state = self.state.write().await;
        let item = state
            .equipment
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))?;

        match item.logs.last_mut() {
            Some(last) if last.resolved_at.is_none() => {
                last.resolved_at = Some(resolved_at);
            }
            _ => {
                return Err(AppError::InvalidTransition(format!(
                    "Equipment {} has no unresolved maintenance entry",
                    id
                )))
            }
        }
        item.status = EquipmentStatus::Available;
        Ok(item.clone())
    }
}

#[async_trait]
impl NotificationStore for MemoryStore {
    async fn insert(&self, notification: &AppNotification) -> AppResult<AppNotification> {
        let mut state = self.state.write().await;
        state.notifications.insert(0, notification.clone());
        Ok(notification.clone())
    }

    async fn list_for(
        &self,
        viewer_id: Uuid,
        viewer_role: UserRole,
    ) -> AppResult<Vec<AppNotification>> {
        let state = self.state.read().await;
        let mut visible: Vec<AppNotification> = state
            .notifications
            .iter()
            .filter(|n| n.visible_to(viewer_id, viewer_role))
            .cloned()
            .collect();
        // Storage is already newest-first; re-sort defensively. The sort is
        // stable, so same-timestamp entries keep their stored order.
        visible.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(visible)
    }

    async fn mark_read(&self, id: Uuid) -> AppResult<()> {
        let mut state = self.state.write().await;
        if let Some(n) = state.notifications.iter_mut().find(|n| n.id == id) {
            n.read = true;
        }
        Ok(())
    }

    async fn mark_all_read(&self, viewer_id: Uuid, viewer_role: UserRole) -> AppResult<()> {
        let mut state = self.state.write().await;
        for n in state
            .notifications
            .iter_mut()
            .filter(|n| n.visible_to(viewer_id, viewer_role))
        {
            n.read = true;
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn list(&self) -> AppResult<Vec<User>> {
        let state = self.state.read().await;
        let mut users = state.users.clone();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(users)
    }

    async fn get(&self, id: Uuid) -> AppResult<User> {
        let state = self.state.read().await;
        state
            .users
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.iter().find(|u| u.username == username).cloned())
    }

    async fn insert(&self, user: &User) -> AppResult<User> {
        let mut state = self.state.write().await;
        if state.users.iter().any(|u| u.username == user.username) {
            return Err(AppError::Conflict("Username already exists".to_string()));
        }
        state.users.push(user.clone());
        Ok(user.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut state = self.state.write().await;
        let before = state.users.len();
        state.users.retain(|u| u.id != id);
        if state.users.len() == before {
            return Err(AppError::NotFound(format!("User {} not found", id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone};

    use super::*;
    use crate::models::enums::{Category, NotificationKind};
    use crate::models::notification::Recipient;

    fn mic(name: &str) -> Equipment {
        Equipment {
            id: Uuid::new_v4(),
            name: name.to_string(),
            brand: "Shure".to_string(),
            category: Category::Microphones,
            status: EquipmentStatus::Available,
            purchase_date: NaiveDate::from_ymd_opt(2023, 1, 15).unwrap(),
            logs: Vec::new(),
        }
    }

    fn log_by(reporter_id: Uuid) -> MaintenanceLog {
        MaintenanceLog {
            id: Uuid::new_v4(),
            date: Utc::now(),
            description: "Crackling output".to_string(),
            reported_by: "Sam Reyes".to_string(),
            reported_by_id: reporter_id,
            resolved_at: None,
        }
    }

    fn notification_at(recipient: Recipient, secs: i64) -> AppNotification {
        let mut n = AppNotification::new(recipient, "hello", NotificationKind::Info, None);
        n.date = Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap();
        n
    }

    #[tokio::test]
    async fn save_then_list_round_trips() {
        let store = MemoryStore::new();
        let item = mic("Shure SM58");
        let saved = EquipmentStore::save(&store, &item).await.unwrap();
        assert_eq!(saved, item);

        let listed = EquipmentStore::list(&store).await.unwrap();
        assert_eq!(listed, vec![item]);
    }

    #[tokio::test]
    async fn list_is_name_ordered() {
        let store = MemoryStore::new();
        EquipmentStore::save(&store, &mic("Zoom H4n")).await.unwrap();
        EquipmentStore::save(&store, &mic("AKG C414")).await.unwrap();

        let listed = EquipmentStore::list(&store).await.unwrap();
        let names: Vec<&str> = listed.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["AKG C414", "Zoom H4n"]);
    }

    #[tokio::test]
    async fn save_updates_fields_but_preserves_logs() {
        let store = MemoryStore::new();
        let item = mic("SM58");
        EquipmentStore::save(&store, &item).await.unwrap();
        EquipmentStore::append_log(&store, item.id, log_by(Uuid::new_v4()))
            .await
            .unwrap();

        let mut renamed = item.clone();
        renamed.name = "SM58 (stage left)".to_string();
        renamed.logs = Vec::new();
        let saved = EquipmentStore::save(&store, &renamed).await.unwrap();

        assert_eq!(saved.name, "SM58 (stage left)");
        assert_eq!(saved.logs.len(), 1);
        // save never touches status either way
        assert_eq!(saved.status, EquipmentStatus::Maintenance);
    }

    #[tokio::test]
    async fn append_log_forces_maintenance() {
        let store = MemoryStore::new();
        let item = mic("SM57");
        EquipmentStore::save(&store, &item).await.unwrap();

        let updated = EquipmentStore::append_log(&store, item.id, log_by(Uuid::new_v4()))
            .await
            .unwrap();
        assert_eq!(updated.status, EquipmentStatus::Maintenance);
        assert_eq!(updated.logs.len(), 1);
        assert!(updated.logs[0].resolved_at.is_none());
    }

    #[tokio::test]
    async fn resolve_without_open_entry_is_invalid() {
        let store = MemoryStore::new();
        let item = mic("SM57");
        EquipmentStore::save(&store, &item).await.unwrap();

        let err = EquipmentStore::resolve(&store, item.id, Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition(_)));
    }

    #[tokio::test]
    async fn unknown_equipment_is_not_found() {
        let store = MemoryStore::new();
        let err = EquipmentStore::set_status(&store, Uuid::new_v4(), EquipmentStatus::InUse)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn list_for_filters_by_role_or_identity_newest_first() {
        let store = MemoryStore::new();
        let viewer = Uuid::new_v4();

        let a = notification_at(Recipient::Role(UserRole::Admin), 0);
        let b = notification_at(Recipient::User(viewer), 10);
        let c = notification_at(Recipient::Role(UserRole::User), 20);
        for n in [&a, &b, &c] {
            NotificationStore::insert(&store, n).await.unwrap();
        }

        let visible = NotificationStore::list_for(&store, viewer, UserRole::User)
            .await
            .unwrap();
        let ids: Vec<Uuid> = visible.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![c.id, b.id]);
    }

    #[tokio::test]
    async fn mark_read_is_idempotent_and_ignores_unknown_ids() {
        let store = MemoryStore::new();
        let n = notification_at(Recipient::Role(UserRole::Admin), 0);
        NotificationStore::insert(&store, &n).await.unwrap();

        NotificationStore::mark_read(&store, n.id).await.unwrap();
        NotificationStore::mark_read(&store, n.id).await.unwrap();
        NotificationStore::mark_read(&store, Uuid::new_v4()).await.unwrap();

        let visible = NotificationStore::list_for(&store, Uuid::new_v4(), UserRole::Admin)
            .await
            .unwrap();
        assert!(visible[0].read);
    }

    #[tokio::test]
    async fn mark_all_read_touches_only_the_viewers_set() {
        let store = MemoryStore::new();
        let viewer = Uuid::new_v4();

        let mine = notification_at(Recipient::User(viewer), 0);
        let broadcast = notification_at(Recipient::Role(UserRole::User), 10);
        let admins_only = notification_at(Recipient::Role(UserRole::Admin), 20);
        for n in [&mine, &broadcast, &admins_only] {
            NotificationStore::insert(&store, n).await.unwrap();
        }

        NotificationStore::mark_all_read(&store, viewer, UserRole::User)
            .await
            .unwrap();

        let visible = NotificationStore::list_for(&store, viewer, UserRole::User)
            .await
            .unwrap();
        assert!(visible.iter().all(|n| n.read));

        let admin_view = NotificationStore::list_for(&store, Uuid::new_v4(), UserRole::Admin)
            .await
            .unwrap();
        assert!(!admin_view[0].read);
    }

    #[tokio::test]
    async fn duplicate_username_conflicts() {
        let store = MemoryStore::new();
        let user = User {
            id: Uuid::new_v4(),
            username: "sam".to_string(),
            name: "Sam Reyes".to_string(),
            role: UserRole::User,
            password: None,
        };
        UserStore::insert(&store, &user).await.unwrap();

        let dup = User {
            id: Uuid::new_v4(),
            ..user.clone()
        };
        let err = UserStore::insert(&store, &dup).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }
}
