//! Storage contract and backing implementations
//!
//! One abstract capability, two concrete implementations selected at
//! startup: [`postgres`] (network-backed) and [`memory`] (in-process, for
//! offline/demo operation). Both must satisfy the same semantics, including
//! ordering; they differ only in persistence medium.

pub mod memory;
pub mod postgres;
pub mod seed;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        enums::{EquipmentStatus, UserRole},
        equipment::{Equipment, MaintenanceLog},
        notification::AppNotification,
        user::User,
    },
};

/// Equipment records and their embedded log sequences
#[async_trait]
pub trait EquipmentStore: Send + Sync {
    /// All equipment, ordered by name
    async fn list(&self) -> AppResult<Vec<Equipment>>;

    /// Single record; `NotFound` for absent ids
    async fn get(&self, id: Uuid) -> AppResult<Equipment>;

    /// Upsert of the record fields. The log sequence is managed exclusively
    /// through `append_log`/`resolve`; logs carried on the passed record are
    /// ignored and existing entries are preserved.
    async fn save(&self, equipment: &Equipment) -> AppResult<Equipment>;

    /// Remove the record. Notifications referencing it are left orphaned.
    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// Overwrite the stored status; `NotFound` for absent ids. Transition
    /// legality is the caller's concern.
    async fn set_status(&self, id: Uuid, status: EquipmentStatus) -> AppResult<Equipment>;

    /// Append a log entry and force status to `maintenance`
    async fn append_log(&self, id: Uuid, log: MaintenanceLog) -> AppResult<Equipment>;

    /// Stamp `resolved_at` on the last unresolved log entry and flip status
    /// back to `available`. `InvalidTransition` when no unresolved entry
    /// exists.
    async fn resolve(&self, id: Uuid, resolved_at: DateTime<Utc>) -> AppResult<Equipment>;
}

/// Notification records and read state
#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// Persist a notification, newest-first at the storage level
    async fn insert(&self, notification: &AppNotification) -> AppResult<AppNotification>;

    /// Everything addressed to the viewer's role or identity, newest first
    async fn list_for(&self, viewer_id: Uuid, viewer_role: UserRole)
        -> AppResult<Vec<AppNotification>>;

    /// Idempotent; unknown ids are a no-op
    async fn mark_read(&self, id: Uuid) -> AppResult<()>;

    /// Mark read exactly the set `list_for` would return for this viewer
    async fn mark_all_read(&self, viewer_id: Uuid, viewer_role: UserRole) -> AppResult<()>;
}

/// User accounts
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn list(&self) -> AppResult<Vec<User>>;

    async fn get(&self, id: Uuid) -> AppResult<User>;

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    async fn insert(&self, user: &User) -> AppResult<User>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// Aggregate handed to services (dependency injection; constructed once in
/// `main`, no ambient global).
#[derive(Clone)]
pub struct Store {
    pub equipment: Arc<dyn EquipmentStore>,
    pub notifications: Arc<dyn NotificationStore>,
    pub users: Arc<dyn UserStore>,
}

impl Store {
    /// Network-backed store over a Postgres pool
    pub fn postgres(pool: Pool<Postgres>) -> Self {
        let equipment: Arc<dyn EquipmentStore> =
            Arc::new(postgres::PgEquipmentStore::new(pool.clone()));
        let notifications: Arc<dyn NotificationStore> =
            Arc::new(postgres::PgNotificationStore::new(pool.clone()));
        let users: Arc<dyn UserStore> = Arc::new(postgres::PgUserStore::new(pool));
        Self {
            equipment,
            notifications,
            users,
        }
    }

    /// In-process store for offline/demo operation
    pub fn memory() -> Self {
        let inner = Arc::new(memory::MemoryStore::new());
        let equipment: Arc<dyn EquipmentStore> = inner.clone();
        let notifications: Arc<dyn NotificationStore> = inner.clone();
        let users: Arc<dyn UserStore> = inner;
        Self {
            equipment,
            notifications,
            users,
        }
    }
}
