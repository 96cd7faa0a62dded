//! Postgres-backed store implementations, one per domain

mod equipment;
mod notifications;
mod users;

pub use equipment::PgEquipmentStore;
pub use notifications::PgNotificationStore;
pub use users::PgUserStore;
