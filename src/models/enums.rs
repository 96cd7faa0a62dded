//! Shared domain enums
//!
//! All of these are stored as Postgres enum types (see migrations) and
//! travel on the wire as their snake_case string form.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ---------------------------------------------------------------------------
// UserRole
// ---------------------------------------------------------------------------

/// Account roles. Admins manage equipment, resolve maintenance and manage
/// users; regular members browse, toggle status and report issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    User,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::User => "user",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(UserRole::Admin),
            "user" => Ok(UserRole::User),
            _ => Err(format!("Invalid user role: {}", s)),
        }
    }
}

// ---------------------------------------------------------------------------
// EquipmentStatus
// ---------------------------------------------------------------------------

/// Equipment lifecycle status.
///
/// `available` and `in_use` toggle freely; `maintenance` is a gate that is
/// entered by reporting an issue and exited only by an explicit resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "equipment_status", rename_all = "snake_case")]
pub enum EquipmentStatus {
    Available,
    InUse,
    Maintenance,
}

impl EquipmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EquipmentStatus::Available => "available",
            EquipmentStatus::InUse => "in_use",
            EquipmentStatus::Maintenance => "maintenance",
        }
    }
}

impl std::fmt::Display for EquipmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// Equipment categories (closed set)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "equipment_category", rename_all = "snake_case")]
pub enum Category {
    Microphones,
    Mixers,
    Cables,
    Speakers,
    Instruments,
    Amplifiers,
    Accessories,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Microphones => "microphones",
            Category::Mixers => "mixers",
            Category::Cables => "cables",
            Category::Speakers => "speakers",
            Category::Instruments => "instruments",
            Category::Amplifiers => "amplifiers",
            Category::Accessories => "accessories",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Category::Microphones => "Microphones",
            Category::Mixers => "Mixers",
            Category::Cables => "Cables",
            Category::Speakers => "Speakers",
            Category::Instruments => "Instruments",
            Category::Amplifiers => "Amplifiers",
            Category::Accessories => "Accessories",
        };
        write!(f, "{}", label)
    }
}

// ---------------------------------------------------------------------------
// NotificationKind
// ---------------------------------------------------------------------------

/// Notification severity/flavor shown by clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "notification_kind", rename_all = "snake_case")]
pub enum NotificationKind {
    Alert,
    Success,
    Info,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Alert => "alert",
            NotificationKind::Success => "success",
            NotificationKind::Info => "info",
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
