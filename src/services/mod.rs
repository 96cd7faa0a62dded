//! Business logic services

pub mod equipment;
pub mod notifications;
pub mod users;

use crate::{config::AuthConfig, store::Store};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub equipment: equipment::EquipmentService,
    pub notifications: notifications::NotificationService,
    pub users: users::UsersService,
}

impl Services {
    /// Create all services against the given store
    pub fn new(store: Store, auth_config: AuthConfig) -> Self {
        let notifications = notifications::NotificationService::new(store.clone());
        Self {
            equipment: equipment::EquipmentService::new(store.clone(), notifications.clone()),
            users: users::UsersService::new(store, auth_config),
            notifications,
        }
    }
}
