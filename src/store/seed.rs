//! Demo data seeding
//!
//! Runs through the storage contract, so it works against either backend.
//! Only seeds an empty store; an existing installation is left untouched.

use chrono::{NaiveDate, TimeZone, Utc};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        enums::{Category, EquipmentStatus, UserRole},
        equipment::{Equipment, MaintenanceLog},
        user::User,
    },
};

use super::Store;

pub async fn seed_demo_data(store: &Store) -> AppResult<()> {
    if !store.users.list().await?.is_empty() {
        tracing::debug!("Store already has users, skipping demo seed");
        return Ok(());
    }

    tracing::info!("Seeding demo data");

    let admin = User {
        id: Uuid::new_v4(),
        username: "admin".to_string(),
        name: "Administrator".to_string(),
        role: UserRole::Admin,
        password: None,
    };
    let member = User {
        id: Uuid::new_v4(),
        username: "sam".to_string(),
        name: "Sam Reyes".to_string(),
        role: UserRole::User,
        password: None,
    };
    store.users.insert(&admin).await?;
    store.users.insert(&member).await?;

    let items = [
        (
            "Shure SM58",
            "Shure",
            Category::Microphones,
            EquipmentStatus::Available,
            NaiveDate::from_ymd_opt(2023, 1, 15),
        ),
        (
            "Behringer X32",
            "Behringer",
            Category::Mixers,
            EquipmentStatus::InUse,
            NaiveDate::from_ymd_opt(2022, 5, 20),
        ),
        (
            "XLR Cable 10m",
            "Santo Angelo",
            Category::Cables,
            EquipmentStatus::Available,
            NaiveDate::from_ymd_opt(2023, 8, 10),
        ),
        (
            "Yamaha DBR10",
            "Yamaha",
            Category::Speakers,
            EquipmentStatus::Available,
            NaiveDate::from_ymd_opt(2021, 11, 5),
        ),
    ];

    let mut cable_id = None;
    for (name, brand, category, status, purchase_date) in items {
        let equipment = Equipment {
            id: Uuid::new_v4(),
            name: name.to_string(),
            brand: brand.to_string(),
            category,
            status,
            purchase_date: purchase_date.expect("valid seed date"),
            logs: Vec::new(),
        };
        store.equipment.save(&equipment).await?;
        if name == "XLR Cable 10m" {
            cable_id = Some(equipment.id);
        }
    }

    // The cable ships with an open issue; appending the log also moves it
    // into maintenance, same as a live report would.
    if let Some(id) = cable_id {
        store
            .equipment
            .append_log(
                id,
                MaintenanceLog {
                    id: Uuid::new_v4(),
                    date: Utc
                        .with_ymd_and_hms(2023, 10, 25, 14, 0, 0)
                        .single()
                        .expect("valid seed timestamp"),
                    description: "Loose connector, intermittent signal".to_string(),
                    reported_by: member.name.clone(),
                    reported_by_id: member.id,
                    resolved_at: None,
                },
            )
            .await?;
    }

    Ok(())
}
